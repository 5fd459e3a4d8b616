#![allow(dead_code)]

use database::{
    entities::{courses, department_heads, enrollments, lecturers, students},
    services::{
        account::{Account, AccountService, NewAccount},
        course::{CourseService, NewCourse},
        enrollment::{Approver, EnrollmentService, NewEnrollment},
    },
};
use migration::{Migrator, MigratorTrait};
use models::{approval::ApprovalAction, role::Role};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub const YEAR: &str = "2025/2026";

/// Fresh in-memory database with every migration applied. A single
/// connection keeps all queries on the same in-memory database.
pub async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn new_account(role: Role, username: &str) -> NewAccount {
    NewAccount {
        username: username.to_string(),
        name: format!("User {username}"),
        email: format!("{username}@kampus.ac.id"),
        password_hash: "$2b$12$hash".to_string(),
        role: Some(role),
        department: Some("Informatika".to_string()),
        ..Default::default()
    }
}

pub async fn register(db: &DatabaseConnection, new: NewAccount) -> Account {
    AccountService::register(db, new).await.unwrap()
}

pub async fn student(db: &DatabaseConnection, nim: &str, department: &str) -> students::Model {
    let account = register(
        db,
        NewAccount {
            nim: Some(nim.to_string()),
            department: Some(department.to_string()),
            ..new_account(Role::Mahasiswa, &format!("mhs{nim}"))
        },
    )
    .await;
    account.profile.student().unwrap().clone()
}

pub async fn lecturer(db: &DatabaseConnection, nidn: &str, department: &str) -> lecturers::Model {
    let account = register(
        db,
        NewAccount {
            nidn: Some(nidn.to_string()),
            department: Some(department.to_string()),
            ..new_account(Role::Dosen, &format!("dosen{nidn}"))
        },
    )
    .await;
    account.profile.lecturer().unwrap().clone()
}

pub async fn head(
    db: &DatabaseConnection,
    nidn: &str,
    department: &str,
) -> department_heads::Model {
    let account = register(
        db,
        NewAccount {
            nidn: Some(nidn.to_string()),
            department: Some(department.to_string()),
            ..new_account(Role::Kajur, &format!("kajur{nidn}"))
        },
    )
    .await;
    account.profile.department_head().unwrap().clone()
}

pub async fn course(
    db: &DatabaseConnection,
    code: &str,
    credits: i32,
    lecturer: Option<&lecturers::Model>,
) -> courses::Model {
    CourseService::create(
        db,
        Role::Kajur,
        NewCourse {
            code: code.to_string(),
            name: format!("Course {code}"),
            credits,
            semester: Some(1),
            lecturer_id: lecturer.map(|lecturer| lecturer.id),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

pub async fn enroll(
    db: &DatabaseConnection,
    student: &students::Model,
    course: &courses::Model,
) -> enrollments::Model {
    EnrollmentService::add(
        db,
        student,
        NewEnrollment {
            course_id: course.id,
            semester: 1,
            academic_year: YEAR.to_string(),
        },
    )
    .await
    .unwrap()
}

/// Enrolls the student and has the department head approve the entry
pub async fn enroll_approved(
    db: &DatabaseConnection,
    student: &students::Model,
    course: &courses::Model,
    head: &department_heads::Model,
) -> enrollments::Model {
    let enrollment = enroll(db, student, course).await;
    EnrollmentService::process_approval(
        db,
        Approver::DepartmentHead(head),
        enrollment.id,
        ApprovalAction::Approve,
        None,
    )
    .await
    .unwrap()
    .enrollment
}
