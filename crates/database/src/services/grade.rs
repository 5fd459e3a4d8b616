use super::{access::AccessService, enrollment::EnrollmentService, student::StudentService};
use crate::{
    entities::{courses, grades, lecturers, students},
    error::{ServiceError, ServiceResult},
};
use chrono::Utc;
use models::{
    grade::{GradeStatistics, GradedCredit, Scores, TranscriptTotals},
    status::GradeStatus,
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    prelude::Expr, sea_query::OnConflict,
};
use serde::Serialize;
use uuid::Uuid;

/// A grade with the course details shown in grade lists and transcripts
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GradeEntry {
    #[serde(flatten)]
    pub grade: grades::Model,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
}

impl GradeEntry {
    fn graded_credit(&self) -> GradedCredit {
        GradedCredit {
            credits: self.credits,
            letter: self.grade.letter,
            point: self.grade.point,
            final_score: self.grade.final_score,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transcript {
    pub student: students::Model,
    pub grades: Vec<GradeEntry>,
    #[serde(flatten)]
    pub totals: TranscriptTotals,
    /// "Aktif", "Lulus" or "Drop Out"
    pub graduation_status: &'static str,
}

/// A posted grade with the records a notification needs
#[derive(Clone, Debug, PartialEq)]
pub struct PostedGrade {
    pub grade: grades::Model,
    pub student: students::Model,
    pub course: courses::Model,
}

/// Rounds to two decimals, the precision the GPA is reported with
fn round_gpa(gpa: f64) -> f64 {
    (gpa * 100.0).round() / 100.0
}

pub struct GradeService;

impl GradeService {
    /// Grades a student in a course the lecturer teaches. The grade is keyed
    /// by the term of the student's latest approved KRS entry for the course
    /// and written with a single upsert, so posting the same scores twice
    /// leaves one unchanged row.
    pub async fn post(
        db: &DatabaseConnection,
        lecturer: &lecturers::Model,
        course_id: Uuid,
        student_id: Uuid,
        scores: Scores,
    ) -> ServiceResult<PostedGrade> {
        let course = AccessService::teaching_course(db, lecturer, course_id).await?;
        let computed = scores.compute()?;
        let student = StudentService::get(db, student_id).await?;

        let enrollment = EnrollmentService::latest_approved(db, student.id, course.id)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found("student has no approved enrollment in this course")
            })?;

        let now = Utc::now();
        grades::Entity::insert(grades::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student.id),
            course_id: Set(course.id),
            semester: Set(enrollment.semester),
            academic_year: Set(enrollment.academic_year.clone()),
            task_score: Set(scores.task),
            midterm_score: Set(scores.midterm),
            final_exam_score: Set(scores.final_exam),
            final_score: Set(computed.final_score),
            letter: Set(computed.letter),
            point: Set(computed.point),
            status: Set(GradeStatus::SudahDinilai),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .on_conflict(
            OnConflict::columns([
                grades::Column::StudentId,
                grades::Column::CourseId,
                grades::Column::Semester,
                grades::Column::AcademicYear,
            ])
            .update_columns([
                grades::Column::TaskScore,
                grades::Column::MidtermScore,
                grades::Column::FinalExamScore,
                grades::Column::FinalScore,
                grades::Column::Letter,
                grades::Column::Point,
                grades::Column::Status,
                grades::Column::UpdatedAt,
            ])
            // Identical scores leave the stored row untouched
            .action_and_where(
                Expr::col((grades::Entity, grades::Column::TaskScore))
                    .ne(scores.task)
                    .or(Expr::col((grades::Entity, grades::Column::MidtermScore)).ne(scores.midterm))
                    .or(Expr::col((grades::Entity, grades::Column::FinalExamScore))
                        .ne(scores.final_exam))
                    .or(Expr::col((grades::Entity, grades::Column::Status))
                        .ne(GradeStatus::SudahDinilai)),
            )
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

        let grade = grades::Entity::find()
            .filter(grades::Column::StudentId.eq(student.id))
            .filter(grades::Column::CourseId.eq(course.id))
            .filter(grades::Column::Semester.eq(enrollment.semester))
            .filter(grades::Column::AcademicYear.eq(enrollment.academic_year.as_str()))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::Internal("grade missing after upsert".to_string()))?;

        let gpa = Self::refresh_gpa(db, student.id).await?;
        log::info!(
            "Graded {} in {}: {:.2} ({}), GPA now {gpa:.2}",
            student.nim,
            course.code,
            grade.final_score,
            grade.letter
        );

        Ok(PostedGrade {
            grade,
            student,
            course,
        })
    }

    /// Recomputes and stores the student's cumulative GPA
    pub async fn refresh_gpa(db: &DatabaseConnection, student_id: Uuid) -> ServiceResult<f64> {
        let entries = Self::entries(db, student_id, None, None).await?;
        let credits: Vec<GradedCredit> = entries.iter().map(GradeEntry::graded_credit).collect();
        let gpa = round_gpa(TranscriptTotals::from_grades(&credits).gpa);

        students::Entity::update_many()
            .col_expr(students::Column::Gpa, Expr::value(gpa))
            .col_expr(students::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(students::Column::Id.eq(student_id))
            .exec(db)
            .await?;

        Ok(gpa)
    }

    async fn entries(
        db: &DatabaseConnection,
        student_id: Uuid,
        semester: Option<i32>,
        academic_year: Option<&str>,
    ) -> ServiceResult<Vec<GradeEntry>> {
        let mut query = grades::Entity::find()
            .find_also_related(courses::Entity)
            .filter(grades::Column::StudentId.eq(student_id))
            .filter(grades::Column::Status.eq(GradeStatus::SudahDinilai));

        if let Some(semester) = semester {
            query = query.filter(grades::Column::Semester.eq(semester));
        }
        if let Some(academic_year) = academic_year {
            query = query.filter(grades::Column::AcademicYear.eq(academic_year));
        }

        let rows = query
            .order_by_asc(grades::Column::AcademicYear)
            .order_by_asc(grades::Column::Semester)
            .order_by_asc(courses::Column::Code)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(grade, course)| {
                course.map(|course| GradeEntry {
                    grade,
                    course_code: course.code,
                    course_name: course.name,
                    credits: course.credits,
                })
            })
            .collect())
    }

    pub async fn list_mine(
        db: &DatabaseConnection,
        student: &students::Model,
        semester: Option<i32>,
        academic_year: Option<&str>,
    ) -> ServiceResult<Vec<GradeEntry>> {
        Self::entries(db, student.id, semester, academic_year).await
    }

    pub async fn transcript(
        db: &DatabaseConnection,
        student: &students::Model,
    ) -> ServiceResult<Transcript> {
        let grades = Self::entries(db, student.id, None, None).await?;
        let credits: Vec<GradedCredit> = grades.iter().map(GradeEntry::graded_credit).collect();

        Ok(Transcript {
            student: student.clone(),
            totals: TranscriptTotals::from_grades(&credits),
            graduation_status: student.academic_status.graduation_label(),
            grades,
        })
    }

    pub async fn statistics(
        db: &DatabaseConnection,
        student: &students::Model,
    ) -> ServiceResult<GradeStatistics> {
        let grades = Self::entries(db, student.id, None, None).await?;
        let credits: Vec<GradedCredit> = grades.iter().map(GradeEntry::graded_credit).collect();

        Ok(GradeStatistics::from_grades(&credits))
    }
}
