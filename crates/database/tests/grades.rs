mod common;

use common::{course, enroll, enroll_approved, head, lecturer, setup, student};
use database::{
    ServiceError,
    entities::grades,
    services::{course::CourseService, grade::GradeService, student::StudentService},
};
use models::{
    grade::{LetterGrade, Scores},
    role::Role,
};
use sea_orm::{EntityTrait, PaginatorTrait};

#[tokio::test]
async fn test_grading_requires_teaching_and_approved_enrollment() {
    let db = setup().await;
    let kajur = head(&db, "9900000001", "Informatika").await;
    let sari = lecturer(&db, "0011223344", "Informatika").await;
    let joko = lecturer(&db, "0011223355", "Informatika").await;
    let budi = student(&db, "2025000001", "Informatika").await;
    let ani = student(&db, "2025000002", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, Some(&sari)).await;
    enroll_approved(&db, &budi, &basis_data, &kajur).await;
    enroll(&db, &ani, &basis_data).await;

    let scores = Scores::new(90.0, 88.0, 92.0);

    assert!(matches!(
        GradeService::post(&db, &joko, basis_data.id, budi.id, scores).await,
        Err(ServiceError::Forbidden(_))
    ));
    // A pending entry does not count as enrolled
    assert!(matches!(
        GradeService::post(&db, &sari, basis_data.id, ani.id, scores).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        GradeService::post(&db, &sari, basis_data.id, budi.id, Scores::new(101.0, 80.0, 80.0))
            .await,
        Err(ServiceError::InvalidArgument(_))
    ));
    assert_eq!(grades::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_posting_a_grade_twice_keeps_one_row() {
    let db = setup().await;
    let kajur = head(&db, "9900000001", "Informatika").await;
    let sari = lecturer(&db, "0011223344", "Informatika").await;
    let budi = student(&db, "2025000001", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, Some(&sari)).await;
    let enrollment = enroll_approved(&db, &budi, &basis_data, &kajur).await;

    let scores = Scores::new(85.0, 80.0, 78.0);
    let first = GradeService::post(&db, &sari, basis_data.id, budi.id, scores)
        .await
        .unwrap();
    let second = GradeService::post(&db, &sari, basis_data.id, budi.id, scores)
        .await
        .unwrap();

    assert_eq!(grades::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(first.grade, second.grade);
    assert_eq!(second.grade.letter, LetterGrade::AB);
    assert_eq!(second.grade.semester, enrollment.semester);
    assert_eq!(second.grade.academic_year, enrollment.academic_year);

    // Re-grading replaces the scores in place
    let regraded = GradeService::post(&db, &sari, basis_data.id, budi.id, Scores::new(40.0, 40.0, 40.0))
        .await
        .unwrap();
    assert_eq!(regraded.grade.id, first.grade.id);
    assert_eq!(regraded.grade.letter, LetterGrade::E);
    assert!(regraded.grade.updated_at >= first.grade.updated_at);
    assert_eq!(grades::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_transcript_and_cached_gpa() {
    let db = setup().await;
    let kajur = head(&db, "9900000001", "Informatika").await;
    let sari = lecturer(&db, "0011223344", "Informatika").await;
    let budi = student(&db, "2025000001", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, Some(&sari)).await;
    let jaringan = course(&db, "IF102", 2, Some(&sari)).await;
    enroll_approved(&db, &budi, &basis_data, &kajur).await;
    enroll_approved(&db, &budi, &jaringan, &kajur).await;

    GradeService::post(&db, &sari, basis_data.id, budi.id, Scores::new(90.0, 90.0, 90.0))
        .await
        .unwrap();
    GradeService::post(&db, &sari, jaringan.id, budi.id, Scores::new(76.0, 76.0, 76.0))
        .await
        .unwrap();

    let budi = StudentService::get(&db, budi.id).await.unwrap();
    assert_eq!(budi.gpa, 3.6);

    let transcript = GradeService::transcript(&db, &budi).await.unwrap();
    assert_eq!(transcript.totals.total_credits, 5);
    assert_eq!(transcript.totals.total_credits_passed, 5);
    assert!((transcript.totals.gpa - 3.6).abs() < 1e-9);
    assert_eq!(transcript.grades.len(), 2);
    assert_eq!(transcript.grades[0].course_code, "IF101");
    assert_eq!(transcript.graduation_status, "Aktif");

    let statistics = GradeService::statistics(&db, &budi).await.unwrap();
    assert_eq!(statistics.total_courses, 2);

    let mine = GradeService::list_mine(&db, &budi, Some(1), Some("2024/2025"))
        .await
        .unwrap();
    assert!(mine.is_empty());
}

#[tokio::test]
async fn test_graded_course_cannot_be_deleted() {
    let db = setup().await;
    let kajur = head(&db, "9900000001", "Informatika").await;
    let sari = lecturer(&db, "0011223344", "Informatika").await;
    let budi = student(&db, "2025000001", "Informatika").await;
    let basis_data = course(&db, "IF101", 3, Some(&sari)).await;
    let jaringan = course(&db, "IF102", 2, Some(&sari)).await;
    enroll_approved(&db, &budi, &basis_data, &kajur).await;
    enroll_approved(&db, &budi, &jaringan, &kajur).await;
    GradeService::post(&db, &sari, basis_data.id, budi.id, Scores::new(90.0, 90.0, 90.0))
        .await
        .unwrap();
    GradeService::post(&db, &sari, jaringan.id, budi.id, Scores::new(76.0, 76.0, 76.0))
        .await
        .unwrap();

    assert!(matches!(
        CourseService::delete(&db, Role::Kajur, basis_data.id).await,
        Err(ServiceError::Conflict(_))
    ));
    assert!(CourseService::get(&db, basis_data.id).await.is_ok());

    let budi = StudentService::get(&db, budi.id).await.unwrap();
    let transcript = GradeService::transcript(&db, &budi).await.unwrap();
    assert_eq!(budi.gpa, 3.6);
    assert!((transcript.totals.gpa - budi.gpa).abs() < 1e-9);
    assert_eq!(grades::Entity::find().count(&db).await.unwrap(), 2);
}
