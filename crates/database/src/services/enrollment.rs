use super::{access::AccessService, course::CourseService};
use crate::{
    entities::{courses, department_heads, enrollments, lecturers, students},
    error::{ServiceError, ServiceResult},
};
use chrono::Utc;
use models::{
    academic_year::{is_valid_academic_year, is_valid_semester},
    approval::{ApprovalAction, decide},
    pagination::{Page, PageRequest},
    status::{ApprovalStatus, EnrollmentStatus},
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, prelude::Expr,
    sea_query::JoinType,
};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct NewEnrollment {
    pub course_id: Uuid,
    pub semester: i32,
    pub academic_year: String,
}

/// A KRS entry with the course details a student sees
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnrollmentEntry {
    #[serde(flatten)]
    pub enrollment: enrollments::Model,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
}

/// A KRS entry awaiting a decision, with who and what it is for
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PendingEnrollment {
    #[serde(flatten)]
    pub enrollment: enrollments::Model,
    pub student_nim: String,
    pub student_name: String,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
}

/// Who is deciding a KRS entry
#[derive(Clone, Copy, Debug)]
pub enum Approver<'a> {
    /// The student's dosen wali
    Advisor(&'a lecturers::Model),
    /// Head of the student's department
    DepartmentHead(&'a department_heads::Model),
}

impl Approver<'_> {
    /// Account id recorded as `approved_by`
    pub fn user_id(&self) -> Uuid {
        match self {
            Self::Advisor(lecturer) => lecturer.user_id,
            Self::DepartmentHead(head) => head.user_id,
        }
    }

    pub fn may_decide_for(&self, student: &students::Model) -> bool {
        match self {
            Self::Advisor(lecturer) => AccessService::is_advisor_of(lecturer, student),
            Self::DepartmentHead(head) => {
                AccessService::is_department_head_of(head, &student.department)
            }
        }
    }
}

/// Outcome of an approval action, with the records a notification needs
#[derive(Clone, Debug, PartialEq)]
pub struct DecidedEnrollment {
    pub enrollment: enrollments::Model,
    pub student: students::Model,
    pub course: courses::Model,
}

fn validate_term(semester: i32, academic_year: &str) -> ServiceResult<()> {
    if !is_valid_semester(semester) {
        return Err(ServiceError::invalid("semester must be between 1 and 14"));
    }
    if !is_valid_academic_year(academic_year) {
        return Err(ServiceError::invalid(
            "academic_year must be two consecutive years, e.g. 2025/2026",
        ));
    }
    Ok(())
}

pub struct EnrollmentService;

impl EnrollmentService {
    /// Adds a course to the student's KRS as a pending entry. Prerequisites
    /// and credit limits are left to the approver. The unique index on
    /// (student, course, semester, academic year) rejects duplicates.
    pub async fn add(
        db: &DatabaseConnection,
        student: &students::Model,
        new: NewEnrollment,
    ) -> ServiceResult<enrollments::Model> {
        let academic_year = new.academic_year.trim();
        validate_term(new.semester, academic_year)?;
        let course = CourseService::get(db, new.course_id).await?;

        let now = Utc::now();
        let enrollment = enrollments::Entity::insert(enrollments::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student.id),
            course_id: Set(course.id),
            semester: Set(new.semester),
            academic_year: Set(academic_year.to_string()),
            status: Set(EnrollmentStatus::Pending),
            approval_status: Set(ApprovalStatus::Pending),
            approved_by: Set(None),
            approved_at: Set(None),
            rejection_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .exec_with_returning(db)
        .await?;

        log::info!(
            "Student {} added {} to KRS {} semester {}",
            student.nim,
            course.code,
            enrollment.academic_year,
            enrollment.semester
        );
        Ok(enrollment)
    }

    /// Removes a KRS entry that has not been approved
    pub async fn withdraw(
        db: &DatabaseConnection,
        student: &students::Model,
        enrollment_id: Uuid,
    ) -> ServiceResult<()> {
        let enrollment = enrollments::Entity::find_by_id(enrollment_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("KRS entry not found"))?;

        if enrollment.student_id != student.id {
            return Err(ServiceError::forbidden("this KRS entry belongs to another student"));
        }
        if enrollment.approval_status == ApprovalStatus::Approved {
            return Err(ServiceError::conflict(
                "approved KRS entries cannot be withdrawn",
            ));
        }

        // Conditional so an approval landing in between wins
        let result = enrollments::Entity::delete_many()
            .filter(enrollments::Column::Id.eq(enrollment_id))
            .filter(enrollments::Column::ApprovalStatus.ne(ApprovalStatus::Approved))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::conflict(
                "approved KRS entries cannot be withdrawn",
            ));
        }

        log::info!("Student {} withdrew KRS entry {enrollment_id}", student.nim);
        Ok(())
    }

    pub async fn list_mine(
        db: &DatabaseConnection,
        student: &students::Model,
        semester: Option<i32>,
        academic_year: Option<&str>,
    ) -> ServiceResult<Vec<EnrollmentEntry>> {
        let mut query = enrollments::Entity::find()
            .find_also_related(courses::Entity)
            .filter(enrollments::Column::StudentId.eq(student.id));

        if let Some(semester) = semester {
            query = query.filter(enrollments::Column::Semester.eq(semester));
        }
        if let Some(academic_year) = academic_year {
            query = query.filter(enrollments::Column::AcademicYear.eq(academic_year));
        }

        let rows = query
            .order_by_desc(enrollments::Column::AcademicYear)
            .order_by_desc(enrollments::Column::Semester)
            .order_by_asc(enrollments::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, course)| {
                course.map(|course| EnrollmentEntry {
                    enrollment,
                    course_code: course.code,
                    course_name: course.name,
                    credits: course.credits,
                })
            })
            .collect())
    }

    /// Courses open to the student's semester that are not yet in their KRS
    /// for that term
    pub async fn available_courses(
        db: &DatabaseConnection,
        student: &students::Model,
        semester: i32,
        academic_year: &str,
    ) -> ServiceResult<Vec<courses::Model>> {
        let academic_year = academic_year.trim();
        validate_term(semester, academic_year)?;

        let taken: Vec<Uuid> = enrollments::Entity::find()
            .select_only()
            .column(enrollments::Column::CourseId)
            .filter(enrollments::Column::StudentId.eq(student.id))
            .filter(enrollments::Column::Semester.eq(semester))
            .filter(enrollments::Column::AcademicYear.eq(academic_year))
            .into_tuple()
            .all(db)
            .await?;

        let mut query = courses::Entity::find().filter(courses::Column::Semester.lte(semester));
        if !taken.is_empty() {
            query = query.filter(courses::Column::Id.is_not_in(taken));
        }

        Ok(query
            .order_by_asc(courses::Column::Semester)
            .order_by_asc(courses::Column::Code)
            .all(db)
            .await?)
    }

    /// Every pending entry of the lecturer's advisees
    pub async fn pending_for_advisor(
        db: &DatabaseConnection,
        lecturer: &lecturers::Model,
    ) -> ServiceResult<Vec<PendingEnrollment>> {
        let pending = enrollments::Entity::find()
            .join(JoinType::InnerJoin, enrollments::Relation::Students.def())
            .filter(students::Column::AdvisorId.eq(lecturer.id))
            .filter(enrollments::Column::ApprovalStatus.eq(ApprovalStatus::Pending))
            .order_by_asc(enrollments::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(Self::with_details(db, pending).await?)
    }

    /// Pending entries of students in the head's department, one page at a
    /// time
    pub async fn pending_for_department(
        db: &DatabaseConnection,
        head: &department_heads::Model,
        semester: Option<i32>,
        academic_year: Option<&str>,
        page: PageRequest,
    ) -> ServiceResult<Page<PendingEnrollment>> {
        let mut query = enrollments::Entity::find()
            .join(JoinType::InnerJoin, enrollments::Relation::Students.def())
            .filter(students::Column::Department.eq(head.department.as_str()))
            .filter(enrollments::Column::ApprovalStatus.eq(ApprovalStatus::Pending));

        if let Some(semester) = semester {
            query = query.filter(enrollments::Column::Semester.eq(semester));
        }
        if let Some(academic_year) = academic_year {
            query = query.filter(enrollments::Column::AcademicYear.eq(academic_year));
        }

        let query = query.order_by_asc(enrollments::Column::CreatedAt);
        let total = query.clone().count(db).await?;
        let pending = query.paginate(db, page.limit).fetch_page(page.index()).await?;

        Ok(Page {
            items: Self::with_details(db, pending).await?,
            request: page,
            total,
        })
    }

    /// Batch-loads the students and courses of a set of entries
    async fn with_details(
        db: &impl ConnectionTrait,
        pending: Vec<enrollments::Model>,
    ) -> Result<Vec<PendingEnrollment>, DbErr> {
        if pending.is_empty() {
            return Ok(vec![]);
        }

        let student_ids: Vec<Uuid> = pending.iter().map(|e| e.student_id).collect();
        let course_ids: Vec<Uuid> = pending.iter().map(|e| e.course_id).collect();

        let students: HashMap<Uuid, students::Model> = students::Entity::find()
            .filter(students::Column::Id.is_in(student_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|student| (student.id, student))
            .collect();

        let courses: HashMap<Uuid, courses::Model> = courses::Entity::find()
            .filter(courses::Column::Id.is_in(course_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|course| (course.id, course))
            .collect();

        Ok(pending
            .into_iter()
            .filter_map(|enrollment| {
                let student = students.get(&enrollment.student_id)?;
                let course = courses.get(&enrollment.course_id)?;
                Some(PendingEnrollment {
                    student_nim: student.nim.clone(),
                    student_name: student.name.clone(),
                    course_code: course.code.clone(),
                    course_name: course.name.clone(),
                    credits: course.credits,
                    enrollment,
                })
            })
            .collect())
    }

    /// Approves or rejects a pending KRS entry. Decided entries are terminal;
    /// the update only applies while the entry is still pending, so of two
    /// concurrent decisions exactly one wins and the other gets `Conflict`.
    pub async fn process_approval(
        db: &DatabaseConnection,
        approver: Approver<'_>,
        enrollment_id: Uuid,
        action: ApprovalAction,
        rejection_reason: Option<&str>,
    ) -> ServiceResult<DecidedEnrollment> {
        let (enrollment, student) = enrollments::Entity::find_by_id(enrollment_id)
            .find_also_related(students::Entity)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("KRS entry not found"))?;
        let student = student.ok_or_else(|| ServiceError::not_found("student not found"))?;

        if !approver.may_decide_for(&student) {
            return Err(ServiceError::forbidden(match approver {
                Approver::Advisor(_) => "you are not the advisor of this student",
                Approver::DepartmentHead(_) => "this student is not in your department",
            }));
        }

        let decision = decide(enrollment.approval_status, action, rejection_reason)?;
        let now = Utc::now();

        let result = enrollments::Entity::update_many()
            .col_expr(enrollments::Column::Status, Expr::value(decision.status))
            .col_expr(
                enrollments::Column::ApprovalStatus,
                Expr::value(decision.approval_status),
            )
            .col_expr(enrollments::Column::ApprovedBy, Expr::value(approver.user_id()))
            .col_expr(enrollments::Column::ApprovedAt, Expr::value(now))
            .col_expr(
                enrollments::Column::RejectionReason,
                Expr::value(decision.rejection_reason),
            )
            .col_expr(enrollments::Column::UpdatedAt, Expr::value(now))
            .filter(enrollments::Column::Id.eq(enrollment_id))
            .filter(enrollments::Column::ApprovalStatus.eq(ApprovalStatus::Pending))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::conflict("KRS entry has already been decided"));
        }

        let enrollment = enrollments::Entity::find_by_id(enrollment_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("KRS entry not found"))?;
        let course = CourseService::get(db, enrollment.course_id).await?;

        log::info!(
            "KRS entry {} of {} for {} {}",
            enrollment.id,
            student.nim,
            course.code,
            action
        );

        Ok(DecidedEnrollment {
            enrollment,
            student,
            course,
        })
    }

    /// Students holding an approved entry for the course, ordered by NIM
    pub async fn approved_students(
        db: &DatabaseConnection,
        course_id: Uuid,
    ) -> ServiceResult<Vec<students::Model>> {
        let student_ids: Vec<Uuid> = enrollments::Entity::find()
            .select_only()
            .column(enrollments::Column::StudentId)
            .filter(enrollments::Column::CourseId.eq(course_id))
            .filter(enrollments::Column::ApprovalStatus.eq(ApprovalStatus::Approved))
            .distinct()
            .into_tuple()
            .all(db)
            .await?;

        if student_ids.is_empty() {
            return Ok(vec![]);
        }

        Ok(students::Entity::find()
            .filter(students::Column::Id.is_in(student_ids))
            .order_by_asc(students::Column::Nim)
            .all(db)
            .await?)
    }

    /// Students in a class the lecturer teaches
    pub async fn class_students(
        db: &DatabaseConnection,
        lecturer: &lecturers::Model,
        course_id: Uuid,
    ) -> ServiceResult<Vec<students::Model>> {
        let course = AccessService::teaching_course(db, lecturer, course_id).await?;
        Self::approved_students(db, course.id).await
    }

    /// Most recent approved entry of the student for the course
    pub async fn latest_approved(
        db: &DatabaseConnection,
        student_id: Uuid,
        course_id: Uuid,
    ) -> ServiceResult<Option<enrollments::Model>> {
        Ok(enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::CourseId.eq(course_id))
            .filter(enrollments::Column::ApprovalStatus.eq(ApprovalStatus::Approved))
            .order_by_desc(enrollments::Column::AcademicYear)
            .order_by_desc(enrollments::Column::Semester)
            .one(db)
            .await?)
    }
}
