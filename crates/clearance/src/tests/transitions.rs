use super::common::*;
use crate::domain::{Department, RequirementStatus, ReviewDecision};
use crate::service::ClearanceError;

#[test]
fn submitting_a_pending_requirement_records_the_file() {
    let (service, _, _, _) = build_service();
    let student = register(&service, "Jane Doe", "jane.doe@university.edu");

    let requirement = service
        .submit_requirement_on(&student.id, 1, scan_file("library_receipt.jpg"), today())
        .expect("submission accepted");

    assert_eq!(requirement.status, RequirementStatus::Submitted);
    assert_eq!(requirement.version, 1);
    let submission = requirement.submission.expect("submission stored");
    assert_eq!(submission.file_name, "library_receipt.jpg");
    assert_eq!(submission.content_type, "image/jpeg");
    assert_eq!(submission.submitted_on, today());
}

#[test]
fn submitting_twice_without_review_is_an_invalid_transition() {
    let (service, _, _, _) = build_service();
    let student = register(&service, "Jane Doe", "jane.doe@university.edu");
    service
        .submit_requirement_on(&student.id, 1, scan_file("scan.jpg"), today())
        .expect("first submission accepted");

    let result = service.submit_requirement_on(&student.id, 1, scan_file("scan2.jpg"), today());
    assert!(matches!(
        result,
        Err(ClearanceError::InvalidTransition {
            from: RequirementStatus::Submitted,
            ..
        })
    ));
}

#[test]
fn submitting_to_an_approved_requirement_is_rejected() {
    let (service, _, _, _) = build_service();
    let staff = seed_staff(&service);
    let student = register(&service, "Jane Doe", "jane.doe@university.edu");
    service
        .submit_requirement_on(&student.id, 1, scan_file("scan.jpg"), today())
        .expect("submission accepted");
    service
        .review_requirement(
            &staff[&Department::Library].id,
            &student.id,
            1,
            ReviewDecision::Approved,
            "Cleared",
            None,
        )
        .expect("approval succeeds");

    let result = service.submit_requirement_on(&student.id, 1, scan_file("again.jpg"), today());
    assert!(matches!(
        result,
        Err(ClearanceError::InvalidTransition {
            from: RequirementStatus::Approved,
            ..
        })
    ));

    let stored = service.get_student(&student.id).expect("student exists");
    let requirement = stored.requirement(1).expect("requirement exists");
    assert_eq!(requirement.status, RequirementStatus::Approved);
}

#[test]
fn resubmission_after_rejection_clears_reviewer_remarks() {
    let (service, _, _, _) = build_service();
    let staff = seed_staff(&service);
    let student = register(&service, "Jane Doe", "jane.doe@university.edu");
    service
        .submit_requirement_on(&student.id, 1, scan_file("scan.jpg"), today())
        .expect("submission accepted");
    let rejected = service
        .review_requirement(
            &staff[&Department::Library].id,
            &student.id,
            1,
            ReviewDecision::Rejected,
            "blurry scan",
            None,
        )
        .expect("rejection succeeds");
    assert_eq!(rejected.status, RequirementStatus::Rejected);
    assert_eq!(rejected.remarks, "blurry scan");

    let resubmitted = service
        .submit_requirement_on(&student.id, 1, scan_file("scan_sharp.jpg"), today())
        .expect("resubmission accepted");
    assert_eq!(resubmitted.status, RequirementStatus::Submitted);
    assert!(resubmitted.remarks.is_empty());
    assert_eq!(
        resubmitted.submission.expect("file stored").file_name,
        "scan_sharp.jpg"
    );
}

#[test]
fn unparseable_content_types_are_rejected() {
    let (service, _, _, _) = build_service();
    let student = register(&service, "Jane Doe", "jane.doe@university.edu");

    let mut file = scan_file("scan.jpg");
    file.content_type = "not a mime type".to_string();

    let result = service.submit_requirement_on(&student.id, 1, file, today());
    assert!(matches!(
        result,
        Err(ClearanceError::UnsupportedFileType(_))
    ));

    let stored = service.get_student(&student.id).expect("student exists");
    assert_eq!(
        stored.requirement(1).expect("requirement").status,
        RequirementStatus::Pending
    );
}

#[test]
fn unknown_student_or_requirement_is_not_found() {
    let (service, _, _, _) = build_service();
    let student = register(&service, "Jane Doe", "jane.doe@university.edu");

    let missing_student = crate::domain::StudentId("STU-2026-999".to_string());
    let result = service.submit_requirement_on(&missing_student, 1, scan_file("a.jpg"), today());
    assert!(matches!(result, Err(ClearanceError::NotFound)));

    let result = service.submit_requirement_on(&student.id, 99, scan_file("a.jpg"), today());
    assert!(matches!(result, Err(ClearanceError::NotFound)));
}
