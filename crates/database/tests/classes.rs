mod common;

use chrono::NaiveTime;
use common::{course, enroll, enroll_approved, head, lecturer, setup, student};
use database::{
    ServiceError,
    services::{
        course::{CourseChanges, CourseService, NewCourse},
        enrollment::{Approver, EnrollmentService},
        lecturer::{LecturerFilter, LecturerService},
        material::{MaterialInput, MaterialService},
        schedule::{ScheduleFilter, ScheduleService},
        student::{StudentFilter, StudentService},
    },
};
use models::{
    academic_year::current_academic_year,
    approval::ApprovalAction,
    days::Day,
    pagination::PageRequest,
    role::Role,
    status::{ClassAction, MaterialType},
};
use uuid::Uuid;

fn material(title: &str, meeting: i32) -> MaterialInput {
    MaterialInput {
        title: title.to_string(),
        description: Some("Slide kuliah".to_string()),
        meeting,
        material_type: MaterialType::Slide,
        url: None,
    }
}

#[tokio::test]
async fn test_course_catalog_management() {
    let db = setup().await;
    let sari = lecturer(&db, "0011223344", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, Some(&sari)).await;
    course(&db, "IF102", 2, None).await;

    let new = NewCourse {
        code: "IF103".to_string(),
        name: "Algoritma".to_string(),
        credits: 3,
        ..Default::default()
    };
    assert!(matches!(
        CourseService::create(&db, Role::Dosen, new.clone()).await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        CourseService::create(
            &db,
            Role::Kajur,
            NewCourse {
                credits: 7,
                ..new.clone()
            }
        )
        .await,
        Err(ServiceError::InvalidArgument(_))
    ));
    match CourseService::create(
        &db,
        Role::Kajur,
        NewCourse {
            code: "IF101".to_string(),
            ..new.clone()
        },
    )
    .await
    {
        Err(ServiceError::Conflict(message)) => assert_eq!(message, "course code already exists"),
        other => panic!("expected conflict, got {other:?}"),
    }

    let updated = CourseService::update(
        &db,
        Role::Rektor,
        basis_data.id,
        CourseChanges {
            name: Some("Basis Data Lanjut".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.name, "Basis Data Lanjut");
    assert_eq!(updated.code, "IF101");

    let found = CourseService::list(&db, PageRequest::default(), Some("lanjut"))
        .await
        .unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.items[0].id, basis_data.id);

    CourseService::delete(&db, Role::Kajur, basis_data.id)
        .await
        .unwrap();
    assert!(matches!(
        CourseService::delete(&db, Role::Kajur, basis_data.id).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_open_and_close_class() {
    let db = setup().await;
    let kajur = head(&db, "9900000001", "Informatika").await;
    let other_kajur = head(&db, "9900000002", "Sistem Informasi").await;
    let sari = lecturer(&db, "0011223344", "Informatika").await;
    let budi = student(&db, "2025000001", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, Some(&sari)).await;
    let unassigned = course(&db, "IF102", 2, None).await;
    enroll_approved(&db, &budi, &basis_data, &kajur).await;

    assert!(matches!(
        ScheduleService::set_class_status(&db, &other_kajur, basis_data.id, ClassAction::Buka)
            .await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        ScheduleService::set_class_status(&db, &kajur, unassigned.id, ClassAction::Buka).await,
        Err(ServiceError::Forbidden(_))
    ));

    let opened = ScheduleService::set_class_status(&db, &kajur, basis_data.id, ClassAction::Buka)
        .await
        .unwrap();
    assert!(opened.open);
    assert_eq!(opened.academic_year, current_academic_year());
    assert_eq!(opened.schedules.len(), 1);
    let schedule = &opened.schedules[0];
    assert_eq!(schedule.day, Day::Senin);
    assert_eq!(schedule.start_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    assert_eq!(schedule.end_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    assert_eq!(schedule.room, "TBD");
    assert_eq!(schedule.lecturer_name, sari.name);

    // Opening again keeps the existing schedule
    let reopened = ScheduleService::set_class_status(&db, &kajur, basis_data.id, ClassAction::Buka)
        .await
        .unwrap();
    assert_eq!(reopened.schedules, opened.schedules);

    let weekly = ScheduleService::weekly(&db, &budi).await.unwrap();
    assert_eq!(weekly.len(), 1);
    assert_eq!(weekly[0].label, "Senin");
    assert_eq!(weekly[0].classes[0].course_code, "IF101");

    let monday = ScheduleService::by_day(&db, &budi, "SENIN").await.unwrap();
    assert_eq!(monday.len(), 1);
    assert!(ScheduleService::by_day(&db, &budi, "selasa").await.unwrap().is_empty());
    assert!(matches!(
        ScheduleService::by_day(&db, &budi, "monday").await,
        Err(ServiceError::InvalidArgument(_))
    ));

    let closed = ScheduleService::set_class_status(&db, &kajur, basis_data.id, ClassAction::Tutup)
        .await
        .unwrap();
    assert!(!closed.open);
    assert!(closed.schedules.is_empty());
    assert!(
        ScheduleService::mine(&db, &budi, ScheduleFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_rejected_courses_leave_the_schedule() {
    let db = setup().await;
    let kajur = head(&db, "9900000001", "Informatika").await;
    let sari = lecturer(&db, "0011223344", "Informatika").await;
    let budi = student(&db, "2025000001", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, Some(&sari)).await;
    let entry = enroll(&db, &budi, &basis_data).await;
    ScheduleService::set_class_status(&db, &kajur, basis_data.id, ClassAction::Buka)
        .await
        .unwrap();

    let pending = ScheduleService::mine(&db, &budi, ScheduleFilter::default())
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);

    EnrollmentService::process_approval(
        &db,
        Approver::DepartmentHead(&kajur),
        entry.id,
        ApprovalAction::Reject,
        Some("kelas penuh"),
    )
    .await
    .unwrap();

    let filter = ScheduleFilter {
        day: Some("senin".to_string()),
        ..Default::default()
    };
    assert!(ScheduleService::mine(&db, &budi, filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_materials_are_soft_deleted() {
    let db = setup().await;
    let sari = lecturer(&db, "0011223344", "Informatika").await;
    let joko = lecturer(&db, "0011223355", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, Some(&sari)).await;

    assert!(matches!(
        MaterialService::create(&db, &joko, basis_data.id, material("Pengantar", 1)).await,
        Err(ServiceError::Forbidden(_))
    ));

    let intro = MaterialService::create(&db, &sari, basis_data.id, material("Pengantar", 1))
        .await
        .unwrap();
    assert_eq!(intro.course_code, "IF101");
    MaterialService::create(&db, &sari, basis_data.id, material("Normalisasi", 2))
        .await
        .unwrap();
    assert!(matches!(
        MaterialService::create(&db, &sari, basis_data.id, material("Pengantar", 1)).await,
        Err(ServiceError::Conflict(_))
    ));

    assert!(matches!(
        MaterialService::delete(&db, &joko, intro.material.id).await,
        Err(ServiceError::Forbidden(_))
    ));
    MaterialService::delete(&db, &sari, intro.material.id)
        .await
        .unwrap();

    let listed = MaterialService::list_by_course(&db, &sari, basis_data.id, None)
        .await
        .unwrap();
    assert_eq!(listed.total_materials, 1);
    assert_eq!(listed.materials[0].title, "Normalisasi");
    assert!(
        MaterialService::list_by_course(&db, &sari, basis_data.id, Some(1))
            .await
            .unwrap()
            .materials
            .is_empty()
    );

    assert!(matches!(
        MaterialService::update(&db, &sari, intro.material.id, material("Pengantar Ulang", 1))
            .await,
        Err(ServiceError::NotFound(_))
    ));

    let taught = CourseService::taught_by(&db, &sari).await.unwrap();
    assert_eq!(taught[0].material_count, 1);

    // The deleted title can be added again
    let again = MaterialService::create(&db, &sari, basis_data.id, material("Pengantar", 1))
        .await
        .unwrap();
    assert_eq!(again.material.title, "Pengantar");
    let listed = MaterialService::list_by_course(&db, &sari, basis_data.id, Some(1))
        .await
        .unwrap();
    assert_eq!(listed.total_materials, 1);
    assert!(matches!(
        MaterialService::create(&db, &sari, basis_data.id, material("Pengantar", 1)).await,
        Err(ServiceError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_department_views() {
    let db = setup().await;
    let kajur = head(&db, "9900000001", "Informatika").await;
    let sari = lecturer(&db, "0011223344", "Informatika").await;
    let outsider = lecturer(&db, "0011223355", "Sistem Informasi").await;
    let budi = student(&db, "2025000001", "Informatika").await;
    student(&db, "2025000002", "Informatika").await;
    let rina = student(&db, "2025000003", "Sistem Informasi").await;
    course(&db, "IF101", 3, Some(&sari)).await;
    course(&db, "SI101", 3, Some(&outsider)).await;

    StudentService::assign_advisor(&db, &kajur, budi.id, sari.id)
        .await
        .unwrap();
    assert!(matches!(
        StudentService::assign_advisor(&db, &kajur, rina.id, sari.id).await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        StudentService::assign_advisor(&db, &kajur, budi.id, Uuid::new_v4()).await,
        Err(ServiceError::NotFound(_))
    ));

    let students = StudentService::in_department(
        &db,
        &kajur,
        StudentFilter {
            search: Some("0001".to_string()),
            ..Default::default()
        },
        PageRequest::default(),
    )
    .await
    .unwrap();
    assert_eq!(students.total, 1);
    assert_eq!(students.items[0].id, budi.id);

    let lecturers = LecturerService::in_department(
        &db,
        &kajur,
        LecturerFilter::default(),
        PageRequest::default(),
    )
    .await
    .unwrap();
    assert_eq!(lecturers.total, 1);
    assert_eq!(lecturers.items[0].advisee_count, 1);

    let courses = CourseService::in_department(&db, &kajur).await.unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].course.code, "IF101");
    assert_eq!(courses[0].lecturer_name.as_deref(), Some(sari.name.as_str()));
}
