mod common;

use common::{YEAR, course, enroll, enroll_approved, head, lecturer, setup, student};
use database::{
    ServiceError,
    services::{
        course::{CourseService, NewCourse},
        enrollment::{Approver, EnrollmentService, NewEnrollment},
        student::StudentService,
    },
};
use models::{
    approval::ApprovalAction,
    pagination::PageRequest,
    role::Role,
    status::{ApprovalStatus, EnrollmentStatus},
};
use uuid::Uuid;

fn krs(course_id: Uuid) -> NewEnrollment {
    NewEnrollment {
        course_id,
        semester: 1,
        academic_year: YEAR.to_string(),
    }
}

#[tokio::test]
async fn test_concurrent_duplicate_enrollment() {
    let db = setup().await;
    let budi = student(&db, "2025000001", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, None).await;

    let (first, second) = tokio::join!(
        EnrollmentService::add(&db, &budi, krs(basis_data.id)),
        EnrollmentService::add(&db, &budi, krs(basis_data.id)),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|result| matches!(result, Err(ServiceError::Conflict(_))))
            .count(),
        1
    );
}

#[tokio::test]
async fn test_add_validates_input() {
    let db = setup().await;
    let budi = student(&db, "2025000001", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, None).await;

    let bad_year = NewEnrollment {
        academic_year: "2025/2027".to_string(),
        ..krs(basis_data.id)
    };
    assert!(matches!(
        EnrollmentService::add(&db, &budi, bad_year).await,
        Err(ServiceError::InvalidArgument(_))
    ));

    let bad_semester = NewEnrollment {
        semester: 15,
        ..krs(basis_data.id)
    };
    assert!(matches!(
        EnrollmentService::add(&db, &budi, bad_semester).await,
        Err(ServiceError::InvalidArgument(_))
    ));

    assert!(matches!(
        EnrollmentService::add(&db, &budi, krs(Uuid::new_v4())).await,
        Err(ServiceError::NotFound(_))
    ));

    let entry = EnrollmentService::add(&db, &budi, krs(basis_data.id))
        .await
        .unwrap();
    assert_eq!(entry.approval_status, ApprovalStatus::Pending);
    assert_eq!(entry.status, EnrollmentStatus::Pending);
}

#[tokio::test]
async fn test_decided_entries_are_terminal() {
    let db = setup().await;
    let kajur = head(&db, "9900000001", "Informatika").await;
    let budi = student(&db, "2025000001", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, None).await;

    let approved = enroll_approved(&db, &budi, &basis_data, &kajur).await;
    assert_eq!(approved.approval_status, ApprovalStatus::Approved);
    assert_eq!(approved.status, EnrollmentStatus::Diambil);
    assert_eq!(approved.approved_by, Some(kajur.user_id));
    assert!(approved.approved_at.is_some());

    for action in [ApprovalAction::Approve, ApprovalAction::Reject] {
        let result = EnrollmentService::process_approval(
            &db,
            Approver::DepartmentHead(&kajur),
            approved.id,
            action,
            Some("kuota penuh"),
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }
}

#[tokio::test]
async fn test_rejection_needs_a_reason() {
    let db = setup().await;
    let kajur = head(&db, "9900000001", "Informatika").await;
    let budi = student(&db, "2025000001", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, None).await;
    let entry = enroll(&db, &budi, &basis_data).await;

    let blank = EnrollmentService::process_approval(
        &db,
        Approver::DepartmentHead(&kajur),
        entry.id,
        ApprovalAction::Reject,
        Some("   "),
    )
    .await;
    assert!(matches!(blank, Err(ServiceError::InvalidArgument(_))));

    let rejected = EnrollmentService::process_approval(
        &db,
        Approver::DepartmentHead(&kajur),
        entry.id,
        ApprovalAction::Reject,
        Some("prasyarat belum terpenuhi"),
    )
    .await
    .unwrap()
    .enrollment;
    assert_eq!(rejected.approval_status, ApprovalStatus::Rejected);
    assert_eq!(rejected.status, EnrollmentStatus::Ditolak);
    assert_eq!(
        rejected.rejection_reason.as_deref(),
        Some("prasyarat belum terpenuhi")
    );
}

#[tokio::test]
async fn test_only_the_advisor_or_department_head_decides() {
    let db = setup().await;
    let kajur = head(&db, "9900000001", "Informatika").await;
    let other_kajur = head(&db, "9900000002", "Sistem Informasi").await;
    let advisor = lecturer(&db, "0011223344", "Informatika").await;
    let stranger = lecturer(&db, "0011223355", "Informatika").await;
    let budi = student(&db, "2025000001", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, None).await;
    let entry = enroll(&db, &budi, &basis_data).await;

    StudentService::assign_advisor(&db, &kajur, budi.id, advisor.id)
        .await
        .unwrap();

    for approver in [
        Approver::Advisor(&stranger),
        Approver::DepartmentHead(&other_kajur),
    ] {
        let result = EnrollmentService::process_approval(
            &db,
            approver,
            entry.id,
            ApprovalAction::Approve,
            None,
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    assert!(matches!(
        EnrollmentService::process_approval(
            &db,
            Approver::Advisor(&advisor),
            Uuid::new_v4(),
            ApprovalAction::Approve,
            None,
        )
        .await,
        Err(ServiceError::NotFound(_))
    ));

    let pending = EnrollmentService::pending_for_advisor(&db, &advisor)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].student_nim, "2025000001");
    assert_eq!(pending[0].course_code, "IF101");

    let decided = EnrollmentService::process_approval(
        &db,
        Approver::Advisor(&advisor),
        entry.id,
        ApprovalAction::Approve,
        None,
    )
    .await
    .unwrap();
    assert_eq!(decided.enrollment.approved_by, Some(advisor.user_id));
    assert!(
        EnrollmentService::pending_for_advisor(&db, &advisor)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_withdrawal() {
    let db = setup().await;
    let kajur = head(&db, "9900000001", "Informatika").await;
    let budi = student(&db, "2025000001", "Informatika").await;
    let ani = student(&db, "2025000002", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, None).await;
    let jaringan = course(&db, "IF102", 2, None).await;

    let approved = enroll_approved(&db, &budi, &basis_data, &kajur).await;
    assert!(matches!(
        EnrollmentService::withdraw(&db, &budi, approved.id).await,
        Err(ServiceError::Conflict(_))
    ));

    let pending = enroll(&db, &budi, &jaringan).await;
    assert!(matches!(
        EnrollmentService::withdraw(&db, &ani, pending.id).await,
        Err(ServiceError::Forbidden(_))
    ));
    EnrollmentService::withdraw(&db, &budi, pending.id)
        .await
        .unwrap();
    assert!(matches!(
        EnrollmentService::withdraw(&db, &budi, pending.id).await,
        Err(ServiceError::NotFound(_))
    ));

    let mine = EnrollmentService::list_mine(&db, &budi, None, None)
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].course_code, "IF101");
    assert_eq!(mine[0].credits, 3);
}

#[tokio::test]
async fn test_available_courses_skip_taken_and_later_semesters() {
    let db = setup().await;
    let budi = student(&db, "2025000001", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, None).await;
    course(&db, "IF102", 2, None).await;
    CourseService::create(
        &db,
        Role::Rektor,
        NewCourse {
            code: "IF501".to_string(),
            name: "Kecerdasan Buatan".to_string(),
            credits: 3,
            semester: Some(5),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    enroll(&db, &budi, &basis_data).await;

    let available = EnrollmentService::available_courses(&db, &budi, 1, YEAR)
        .await
        .unwrap();
    let codes: Vec<_> = available.iter().map(|course| course.code.as_str()).collect();
    assert_eq!(codes, vec!["IF102"]);

    let later = EnrollmentService::available_courses(&db, &budi, 5, YEAR)
        .await
        .unwrap();
    assert_eq!(later.len(), 2);
}

#[tokio::test]
async fn test_department_pending_list_is_paginated() {
    let db = setup().await;
    let kajur = head(&db, "9900000001", "Informatika").await;
    let budi = student(&db, "2025000001", "Informatika").await;
    let outsider = student(&db, "2025000002", "Sistem Informasi").await;

    for code in ["IF101", "IF102", "IF103"] {
        let offered = course(&db, code, 2, None).await;
        enroll(&db, &budi, &offered).await;
        enroll(&db, &outsider, &offered).await;
    }

    let first = EnrollmentService::pending_for_department(
        &db,
        &kajur,
        None,
        None,
        PageRequest::new(Some(1), Some(2)),
    )
    .await
    .unwrap();
    assert_eq!(first.total, 3);
    assert_eq!(first.items.len(), 2);
    assert!(first.items.iter().all(|entry| entry.student_nim == "2025000001"));

    let second = EnrollmentService::pending_for_department(
        &db,
        &kajur,
        Some(1),
        Some(YEAR),
        PageRequest::new(Some(2), Some(2)),
    )
    .await
    .unwrap();
    assert_eq!(second.items.len(), 1);

    let clamped = PageRequest::new(Some(0), Some(500));
    assert_eq!((clamped.page, clamped.limit), (1, 100));
}
