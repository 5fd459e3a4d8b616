use super::{access::AccessService, enrollment::EnrollmentService};
use crate::{
    entities::{attendances, lecturers, students},
    error::{ServiceError, ServiceResult},
};
use chrono::{NaiveDate, Utc};
use models::{
    attendance::{AttendanceTally, is_valid_meeting},
    status::AttendanceStatus,
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::OnConflict,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct AttendanceInput {
    pub student_id: Uuid,
    pub status: AttendanceStatus,
    pub remark: Option<String>,
}

/// Attendance of a whole class for one meeting
#[derive(Clone, Debug)]
pub struct AttendanceBatch {
    pub course_id: Uuid,
    pub meeting: i32,
    /// `YYYY-MM-DD`
    pub date: String,
    pub entries: Vec<AttendanceInput>,
}

/// Per-entry results of a batch; entries fail independently
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub success_count: usize,
    pub total_count: usize,
    pub errors: Vec<String>,
}

impl BatchOutcome {
    /// There were entries and none of them were recorded
    pub fn all_failed(&self) -> bool {
        self.total_count > 0 && self.success_count == 0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttendanceRecord {
    #[serde(flatten)]
    pub attendance: attendances::Model,
    pub nim: String,
    pub student_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttendanceRecap {
    pub student_id: Uuid,
    pub nim: String,
    pub student_name: String,
    #[serde(flatten)]
    pub tally: AttendanceTally,
    /// Meetings recorded for this student
    pub total_meetings: u32,
    pub present_percentage: f64,
}

pub struct AttendanceService;

impl AttendanceService {
    /// Records a meeting's attendance. Each entry is upserted on (course,
    /// student, meeting); entries for students without an approved enrollment
    /// are reported and skipped.
    pub async fn record(
        db: &DatabaseConnection,
        lecturer: &lecturers::Model,
        batch: AttendanceBatch,
    ) -> ServiceResult<BatchOutcome> {
        let course = AccessService::teaching_course(db, lecturer, batch.course_id).await?;

        if !is_valid_meeting(batch.meeting) {
            return Err(ServiceError::invalid("meeting must be between 1 and 16"));
        }
        let date = NaiveDate::parse_from_str(batch.date.trim(), "%Y-%m-%d")
            .map_err(|_| ServiceError::invalid("date must be formatted as YYYY-MM-DD"))?;

        let enrolled: HashSet<Uuid> = EnrollmentService::approved_students(db, course.id)
            .await?
            .into_iter()
            .map(|student| student.id)
            .collect();

        let mut outcome = BatchOutcome {
            total_count: batch.entries.len(),
            ..Default::default()
        };

        for entry in batch.entries {
            if !enrolled.contains(&entry.student_id) {
                outcome.errors.push(format!(
                    "student {} is not enrolled in this course",
                    entry.student_id
                ));
                continue;
            }

            let now = Utc::now();
            let result = attendances::Entity::insert(attendances::ActiveModel {
                id: Set(Uuid::new_v4()),
                course_id: Set(course.id),
                student_id: Set(entry.student_id),
                meeting: Set(batch.meeting),
                date: Set(date),
                status: Set(entry.status),
                remark: Set(entry.remark),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .on_conflict(
                OnConflict::columns([
                    attendances::Column::CourseId,
                    attendances::Column::StudentId,
                    attendances::Column::Meeting,
                ])
                .update_columns([
                    attendances::Column::Date,
                    attendances::Column::Status,
                    attendances::Column::Remark,
                    attendances::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(db)
            .await;

            match result {
                Ok(_) => outcome.success_count += 1,
                Err(err) => {
                    log::warn!(
                        "Failed to record attendance of {} in {}: {err}",
                        entry.student_id,
                        course.code
                    );
                    outcome.errors.push(format!(
                        "failed to record attendance for student {}",
                        entry.student_id
                    ));
                }
            }
        }

        log::info!(
            "Recorded meeting {} of {}: {}/{} entries",
            batch.meeting,
            course.code,
            outcome.success_count,
            outcome.total_count
        );
        Ok(outcome)
    }

    pub async fn list(
        db: &DatabaseConnection,
        lecturer: &lecturers::Model,
        course_id: Uuid,
        meeting: Option<i32>,
    ) -> ServiceResult<Vec<AttendanceRecord>> {
        let course = AccessService::teaching_course(db, lecturer, course_id).await?;

        let mut query = attendances::Entity::find()
            .find_also_related(students::Entity)
            .filter(attendances::Column::CourseId.eq(course.id));
        if let Some(meeting) = meeting {
            query = query.filter(attendances::Column::Meeting.eq(meeting));
        }

        let rows = query
            .order_by_asc(attendances::Column::Meeting)
            .order_by_asc(students::Column::Nim)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(attendance, student)| {
                student.map(|student| AttendanceRecord {
                    attendance,
                    nim: student.nim,
                    student_name: student.name,
                })
            })
            .collect())
    }

    /// Per-student tally over the meetings recorded so far
    pub async fn recap(
        db: &DatabaseConnection,
        lecturer: &lecturers::Model,
        course_id: Uuid,
    ) -> ServiceResult<Vec<AttendanceRecap>> {
        let course = AccessService::teaching_course(db, lecturer, course_id).await?;
        let students = EnrollmentService::approved_students(db, course.id).await?;

        let mut tallies: HashMap<Uuid, AttendanceTally> = HashMap::new();
        for attendance in attendances::Entity::find()
            .filter(attendances::Column::CourseId.eq(course.id))
            .all(db)
            .await?
        {
            tallies
                .entry(attendance.student_id)
                .or_default()
                .record(attendance.status);
        }

        Ok(students
            .into_iter()
            .map(|student| {
                let tally = tallies.remove(&student.id).unwrap_or_default();
                AttendanceRecap {
                    student_id: student.id,
                    nim: student.nim,
                    student_name: student.name,
                    total_meetings: tally.total(),
                    present_percentage: tally.present_percentage(),
                    tally,
                }
            })
            .collect())
    }
}
