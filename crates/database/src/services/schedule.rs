use super::access::AccessService;
use crate::{
    entities::{courses, department_heads, enrollments, schedules, students},
    error::{ServiceError, ServiceResult},
};
use chrono::{NaiveTime, Utc};
use models::{
    academic_year::current_academic_year,
    days::Day,
    status::{ApprovalStatus, ClassAction, ClassType},
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone, Debug, Default)]
pub struct ScheduleFilter {
    pub semester: Option<i32>,
    pub academic_year: Option<String>,
    pub day: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScheduleEntry {
    #[serde(flatten)]
    pub schedule: schedules::Model,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
}

/// The classes of one day in the weekly view
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DaySchedule {
    pub day: Day,
    pub label: &'static str,
    pub classes: Vec<ScheduleEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassStatus {
    pub course_id: Uuid,
    pub course_name: String,
    pub academic_year: String,
    pub open: bool,
    /// Schedules of the course for the academic year after the change
    pub schedules: Vec<schedules::Model>,
}

fn parse_day(day: &str) -> ServiceResult<Day> {
    Day::from_str(day.trim()).map_err(|_| {
        ServiceError::invalid("invalid day, use: senin, selasa, rabu, kamis, jumat, sabtu, minggu")
    })
}

fn time(hour: u32) -> ServiceResult<NaiveTime> {
    NaiveTime::from_hms_opt(hour, 0, 0)
        .ok_or_else(|| ServiceError::Internal(format!("invalid hour {hour}")))
}

pub struct ScheduleService;

impl ScheduleService {
    /// Courses in the student's KRS that have not been rejected
    async fn enrolled_course_ids(
        db: &DatabaseConnection,
        student: &students::Model,
        semester: Option<i32>,
        academic_year: Option<&str>,
    ) -> ServiceResult<Vec<Uuid>> {
        let mut query = enrollments::Entity::find()
            .select_only()
            .column(enrollments::Column::CourseId)
            .distinct()
            .filter(enrollments::Column::StudentId.eq(student.id))
            .filter(enrollments::Column::ApprovalStatus.ne(ApprovalStatus::Rejected));

        if let Some(semester) = semester {
            query = query.filter(enrollments::Column::Semester.eq(semester));
        }
        if let Some(academic_year) = academic_year {
            query = query.filter(enrollments::Column::AcademicYear.eq(academic_year));
        }

        Ok(query.into_tuple::<Uuid>().all(db).await?)
    }

    async fn entries(
        db: &DatabaseConnection,
        course_ids: Vec<Uuid>,
        day: Option<Day>,
    ) -> ServiceResult<Vec<ScheduleEntry>> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = schedules::Entity::find()
            .find_also_related(courses::Entity)
            .filter(schedules::Column::CourseId.is_in(course_ids));
        if let Some(day) = day {
            query = query.filter(schedules::Column::Day.eq(day));
        }

        let rows = query
            .order_by_asc(schedules::Column::StartTime)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(schedule, course)| {
                course.map(|course| ScheduleEntry {
                    schedule,
                    course_code: course.code,
                    course_name: course.name,
                    credits: course.credits,
                })
            })
            .collect())
    }

    pub async fn mine(
        db: &DatabaseConnection,
        student: &students::Model,
        filter: ScheduleFilter,
    ) -> ServiceResult<Vec<ScheduleEntry>> {
        let day = filter.day.as_deref().map(parse_day).transpose()?;
        let course_ids = Self::enrolled_course_ids(
            db,
            student,
            filter.semester,
            filter.academic_year.as_deref(),
        )
        .await?;

        Self::entries(db, course_ids, day).await
    }

    /// One day's classes ordered by start time
    pub async fn by_day(
        db: &DatabaseConnection,
        student: &students::Model,
        day: &str,
    ) -> ServiceResult<Vec<ScheduleEntry>> {
        let day = parse_day(day)?;
        let course_ids = Self::enrolled_course_ids(db, student, None, None).await?;

        Self::entries(db, course_ids, Some(day)).await
    }

    /// Classes grouped by day in calendar order; days without classes are left
    /// out
    pub async fn weekly(
        db: &DatabaseConnection,
        student: &students::Model,
    ) -> ServiceResult<Vec<DaySchedule>> {
        let course_ids = Self::enrolled_course_ids(db, student, None, None).await?;
        let mut entries = Self::entries(db, course_ids, None).await?;

        Ok(Day::WEEK
            .into_iter()
            .filter_map(|day| {
                let (classes, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut entries)
                    .into_iter()
                    .partition(|entry| entry.schedule.day == day);
                entries = rest;

                (!classes.is_empty()).then(|| DaySchedule {
                    day,
                    label: day.label(),
                    classes,
                })
            })
            .collect())
    }

    async fn current_schedules(
        db: &DatabaseConnection,
        course_id: Uuid,
        academic_year: &str,
    ) -> ServiceResult<Vec<schedules::Model>> {
        Ok(schedules::Entity::find()
            .filter(schedules::Column::CourseId.eq(course_id))
            .filter(schedules::Column::AcademicYear.eq(academic_year))
            .order_by_asc(schedules::Column::StartTime)
            .all(db)
            .await?)
    }

    /// Opens or closes a class for the current academic year. Opening a
    /// class without schedules creates a default Monday 08:00-10:00 lecture
    /// in room TBD; closing removes the year's schedules.
    pub async fn set_class_status(
        db: &DatabaseConnection,
        head: &department_heads::Model,
        course_id: Uuid,
        action: ClassAction,
    ) -> ServiceResult<ClassStatus> {
        let (course, lecturer) = AccessService::department_course(db, head, course_id).await?;
        let academic_year = current_academic_year();

        match action {
            ClassAction::Buka => {
                if Self::current_schedules(db, course.id, &academic_year)
                    .await?
                    .is_empty()
                {
                    let now = Utc::now();
                    schedules::Entity::insert(schedules::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        course_id: Set(course.id),
                        day: Set(Day::Senin),
                        start_time: Set(time(8)?),
                        end_time: Set(time(10)?),
                        room: Set("TBD".to_string()),
                        lecturer_name: Set(lecturer.name.clone()),
                        class_type: Set(ClassType::Kuliah),
                        semester: Set(course.semester),
                        academic_year: Set(academic_year.clone()),
                        created_at: Set(now),
                        updated_at: Set(now),
                    })
                    .exec_without_returning(db)
                    .await?;
                }
                log::info!("Opened {} for {academic_year}", course.code);
            }
            ClassAction::Tutup => {
                let removed = schedules::Entity::delete_many()
                    .filter(schedules::Column::CourseId.eq(course.id))
                    .filter(schedules::Column::AcademicYear.eq(academic_year.as_str()))
                    .exec(db)
                    .await?
                    .rows_affected;
                log::info!(
                    "Closed {} for {academic_year}, removed {removed} schedules",
                    course.code
                );
            }
        }

        let schedules = Self::current_schedules(db, course.id, &academic_year).await?;
        Ok(ClassStatus {
            course_id: course.id,
            course_name: course.name,
            academic_year,
            open: !schedules.is_empty(),
            schedules,
        })
    }
}
