use super::common::*;
use crate::domain::{Department, RequirementStatus, ReviewDecision};
use crate::service::ClearanceError;

#[test]
fn rejecting_without_remarks_fails_and_leaves_the_requirement_submitted() {
    let (service, _, _, _) = build_service();
    let staff = seed_staff(&service);
    let student = register(&service, "Jane Doe", "jane.doe@university.edu");
    service
        .submit_requirement_on(&student.id, 1, scan_file("scan.jpg"), today())
        .expect("submission accepted");

    let result = service.review_requirement(
        &staff[&Department::Library].id,
        &student.id,
        1,
        ReviewDecision::Rejected,
        "   ",
        None,
    );
    assert!(matches!(result, Err(ClearanceError::RemarksRequired)));

    let stored = service.get_student(&student.id).expect("student exists");
    let requirement = stored.requirement(1).expect("requirement exists");
    assert_eq!(requirement.status, RequirementStatus::Submitted);
    assert_eq!(requirement.version, 1);
}

#[test]
fn staff_of_another_department_cannot_review() {
    let (service, _, _, _) = build_service();
    let staff = seed_staff(&service);
    let student = register(&service, "Jane Doe", "jane.doe@university.edu");
    service
        .submit_requirement_on(&student.id, 1, scan_file("scan.jpg"), today())
        .expect("submission accepted");

    let result = service.review_requirement(
        &staff[&Department::Finance].id,
        &student.id,
        1,
        ReviewDecision::Approved,
        "",
        None,
    );
    assert!(matches!(
        result,
        Err(ClearanceError::DepartmentMismatch {
            assigned: Department::Finance,
            required: Department::Library,
        })
    ));
}

#[test]
fn reviewing_a_pending_requirement_is_an_invalid_transition() {
    let (service, _, _, _) = build_service();
    let staff = seed_staff(&service);
    let student = register(&service, "Jane Doe", "jane.doe@university.edu");

    let result = service.review_requirement(
        &staff[&Department::Library].id,
        &student.id,
        1,
        ReviewDecision::Approved,
        "",
        None,
    );
    assert!(matches!(
        result,
        Err(ClearanceError::InvalidTransition {
            from: RequirementStatus::Pending,
            ..
        })
    ));
}

#[test]
fn stale_version_blocks_a_concurrent_review() {
    let (service, _, _, _) = build_service();
    let staff = seed_staff(&service);
    let student = register(&service, "Jane Doe", "jane.doe@university.edu");
    let submitted = service
        .submit_requirement_on(&student.id, 1, scan_file("scan.jpg"), today())
        .expect("submission accepted");

    // A second reviewer acts on the version the first reviewer already
    // consumed.
    let approved = service
        .review_requirement(
            &staff[&Department::Library].id,
            &student.id,
            1,
            ReviewDecision::Approved,
            "Cleared",
            Some(submitted.version),
        )
        .expect("first review lands");
    assert_eq!(approved.version, submitted.version + 1);

    let result = service.review_requirement(
        &staff[&Department::Library].id,
        &student.id,
        1,
        ReviewDecision::Rejected,
        "changed my mind",
        Some(submitted.version),
    );
    // Approved is terminal, so the transition guard fires first; the stale
    // token is what a reviewer racing on a still-submitted requirement sees.
    assert!(matches!(
        result,
        Err(ClearanceError::InvalidTransition { .. })
    ));

    let student2 = register(&service, "Maria Santos", "maria.santos@university.edu");
    let submitted2 = service
        .submit_requirement_on(&student2.id, 1, scan_file("scan.jpg"), today())
        .expect("submission accepted");
    let result = service.review_requirement(
        &staff[&Department::Library].id,
        &student2.id,
        1,
        ReviewDecision::Approved,
        "",
        Some(submitted2.version + 5),
    );
    assert!(matches!(
        result,
        Err(ClearanceError::StaleRequirement { .. })
    ));
}

#[test]
fn approval_remarks_are_optional_and_stored() {
    let (service, _, _, _) = build_service();
    let staff = seed_staff(&service);
    let student = register(&service, "Jane Doe", "jane.doe@university.edu");
    service
        .submit_requirement_on(&student.id, 2, scan_file("lab_form.pdf"), today())
        .expect("submission accepted");

    let approved = service
        .review_requirement(
            &staff[&Department::Laboratory].id,
            &student.id,
            2,
            ReviewDecision::Approved,
            "All equipment returned",
            None,
        )
        .expect("approval succeeds");
    assert_eq!(approved.status, RequirementStatus::Approved);
    assert_eq!(approved.remarks, "All equipment returned");
}

#[test]
fn unknown_reviewer_is_not_found() {
    let (service, _, _, _) = build_service();
    seed_staff(&service);
    let student = register(&service, "Jane Doe", "jane.doe@university.edu");
    service
        .submit_requirement_on(&student.id, 1, scan_file("scan.jpg"), today())
        .expect("submission accepted");

    let result = service.review_requirement(
        &crate::domain::StaffId("STAFF-999".to_string()),
        &student.id,
        1,
        ReviewDecision::Approved,
        "",
        None,
    );
    assert!(matches!(result, Err(ClearanceError::NotFound)));
}
