use crate::infra::{
    parse_date, InMemoryAdminDirectory, InMemoryStaffDirectory, InMemoryStudentDirectory,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use clearance::{
    Admin, AdminId, ClearanceService, Department, NewStaff, NewStudent, ReviewDecision,
    StaffMember, SubmissionFile,
};
use clearance::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) type DemoService =
    ClearanceService<InMemoryStudentDirectory, InMemoryStaffDirectory, InMemoryAdminDirectory>;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Registration date used by the scripted walkthrough (defaults to today).
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct StatsArgs {
    /// Registration date used for the seeded roster (defaults to today).
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn build_demo_service() -> (Arc<DemoService>, InMemoryAdminDirectory) {
    let students = Arc::new(InMemoryStudentDirectory::default());
    let staff = Arc::new(InMemoryStaffDirectory::default());
    let admins = InMemoryAdminDirectory::default();
    let service = Arc::new(ClearanceService::new(
        students,
        staff,
        Arc::new(admins.clone()),
    ));
    (service, admins)
}

fn attachment(file_name: &str) -> SubmissionFile {
    let content_type = mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string();
    SubmissionFile {
        file_name: file_name.to_string(),
        content_type,
        data: format!("data:;base64,demo-{file_name}"),
    }
}

/// Preload the roster the original demo data ships with: one staff member
/// per department, one admin, and three students in varied clearance
/// states, all driven through the normal service operations.
pub(crate) fn seed_roster(
    service: &DemoService,
    admins: &InMemoryAdminDirectory,
    today: NaiveDate,
) -> Result<HashMap<Department, StaffMember>, AppError> {
    let fixtures = [
        (Department::Library, "Dr. Ana Garcia", "ana.garcia@university.edu", "Librarian"),
        (Department::Laboratory, "Engr. Mark Lopez", "mark.lopez@university.edu", "Lab Technician"),
        (Department::Finance, "Ms. Rose Tan", "rose.tan@university.edu", "Accountant"),
        (Department::Registrar, "Mr. John Cruz", "john.cruz@university.edu", "Registrar Staff"),
        (
            Department::StudentAffairs,
            "Ms. Lisa Mendoza",
            "lisa.mendoza@university.edu",
            "Student Affairs Officer",
        ),
        (
            Department::Department,
            "Dr. Carlos Ramos",
            "carlos.ramos@university.edu",
            "Department Head",
        ),
    ];

    let mut staff = HashMap::new();
    for (department, name, email, role) in fixtures {
        let member = service.add_staff(NewStaff {
            name: name.to_string(),
            email: email.to_string(),
            credential: "staff123".to_string(),
            department,
            role: role.to_string(),
        })?;
        staff.insert(department, member);
    }

    admins.push(Admin {
        id: AdminId("ADMIN-001".to_string()),
        name: "System Administrator".to_string(),
        email: "admin@university.edu".to_string(),
        credential: "admin123".to_string(),
        role: "Super Admin".to_string(),
    });

    let student = |name: &str, email: &str, course: &str| NewStudent {
        name: name.to_string(),
        email: email.to_string(),
        course: course.to_string(),
        year_level: "4th Year".to_string(),
        credential: "password123".to_string(),
    };

    let approve = |student_id, requirement_id, department: Department, file: &str, remarks: &str| {
        service.submit_requirement_on(student_id, requirement_id, attachment(file), today)?;
        service.review_requirement(
            &staff[&department].id,
            student_id,
            requirement_id,
            ReviewDecision::Approved,
            remarks,
            None,
        )?;
        Ok::<(), AppError>(())
    };

    // Juan: two departments signed off, the rest untouched.
    let juan = service.register_student_on(
        student("Juan Dela Cruz", "juan.delacruz@university.edu", "BS Computer Science"),
        today,
    )?;
    approve(&juan.id, 2, Department::Laboratory, "lab_clearance.jpg", "All equipment returned")?;
    approve(&juan.id, 5, Department::StudentAffairs, "id_return_receipt.pdf", "ID returned")?;

    // Maria: a mix of approved, awaiting review, and rejected.
    let maria = service.register_student_on(
        student("Maria Santos", "maria.santos@university.edu", "BS Information Technology"),
        today,
    )?;
    approve(&maria.id, 1, Department::Library, "library_receipt.jpg", "Cleared")?;
    service.submit_requirement_on(&maria.id, 2, attachment("lab_form.pdf"), today)?;
    service.submit_requirement_on(&maria.id, 3, attachment("partial_payment.jpg"), today)?;
    service.review_requirement(
        &staff[&Department::Finance].id,
        &maria.id,
        3,
        ReviewDecision::Rejected,
        "Outstanding balance. Please settle and resubmit receipt.",
        None,
    )?;
    service.submit_requirement_on(&maria.id, 4, attachment("grad_docs.pdf"), today)?;
    approve(&maria.id, 6, Department::Department, "thesis_approval.pdf", "Passed")?;

    // Pedro: fully cleared.
    let pedro = service.register_student_on(
        student("Pedro Reyes", "pedro.reyes@university.edu", "BS Computer Engineering"),
        today,
    )?;
    for (index, department) in Department::ALL.iter().enumerate() {
        approve(
            &pedro.id,
            index as u32 + 1,
            *department,
            "clearance_proof.pdf",
            "Cleared",
        )?;
    }

    Ok(staff)
}

/// Scripted end-to-end walkthrough: registration, submission, rejection,
/// resubmission, approval, and the aggregate report.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let (service, admins) = build_demo_service();
    let staff = seed_roster(&service, &admins, today)?;

    println!("Clearance workflow demo ({today})");

    let jane = service.register_student_on(
        NewStudent {
            name: "Jane Doe".to_string(),
            email: "jane.doe@university.edu".to_string(),
            course: "BS Computer Science".to_string(),
            year_level: "4th Year".to_string(),
            credential: "password123".to_string(),
        },
        today,
    )?;
    println!("registered {} as {}", jane.name, jane.id);

    let submitted = service.submit_requirement_on(&jane.id, 1, attachment("scan.jpg"), today)?;
    println!("library requirement -> {}", submitted.status);

    let librarian = &staff[&Department::Library];
    let rejected = service.review_requirement(
        &librarian.id,
        &jane.id,
        1,
        ReviewDecision::Rejected,
        "blurry scan",
        None,
    )?;
    println!(
        "{} rejected the scan -> {} ({})",
        librarian.name, rejected.status, rejected.remarks
    );

    let resubmitted =
        service.submit_requirement_on(&jane.id, 1, attachment("scan_sharp.jpg"), today)?;
    println!("resubmitted -> {} (remarks cleared)", resubmitted.status);

    let approved = service.review_requirement(
        &librarian.id,
        &jane.id,
        1,
        ReviewDecision::Approved,
        "Cleared",
        None,
    )?;
    let jane = service.get_student(&jane.id)?;
    println!(
        "approved -> {}; overall clearance {}",
        approved.status,
        jane.clearance_status.label()
    );

    println!();
    print_statistics(&service)
}

pub(crate) fn run_stats(args: StatsArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let (service, admins) = build_demo_service();
    seed_roster(&service, &admins, today)?;
    print_statistics(&service)
}

fn print_statistics(service: &DemoService) -> Result<(), AppError> {
    let stats = service.statistics()?;
    println!(
        "Students: {} total, {} completed, {} in progress",
        stats.total_students, stats.completed, stats.in_progress
    );
    for entry in &stats.departments {
        println!(
            "  {:<15} approved {:>2}  pending {:>2}  rejected {:>2}",
            entry.department.label(),
            entry.approved,
            entry.pending,
            entry.rejected
        );
    }
    Ok(())
}
