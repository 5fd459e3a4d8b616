use super::contains_ignore_case;
use crate::{
    entities::{courses, department_heads, enrollments, lecturers, materials},
    error::{ServiceError, ServiceResult},
};
use chrono::Utc;
use futures::future::try_join_all;
use models::{
    academic_year::is_valid_semester,
    pagination::{Page, PageRequest},
    role::Role,
    status::{ApprovalStatus, RecordStatus},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, Default)]
pub struct NewCourse {
    pub code: String,
    pub name: String,
    pub credits: i32,
    pub semester: Option<i32>,
    pub prerequisites: Option<String>,
    pub description: Option<String>,
    pub lecturer_id: Option<Uuid>,
}

/// Partial update; `None` leaves a field unchanged
#[derive(Clone, Debug, Default)]
pub struct CourseChanges {
    pub code: Option<String>,
    pub name: Option<String>,
    pub credits: Option<i32>,
    pub semester: Option<i32>,
    pub prerequisites: Option<String>,
    pub description: Option<String>,
    pub lecturer_id: Option<Uuid>,
}

/// A course in a lecturer's teaching load
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaughtCourse {
    #[serde(flatten)]
    pub course: courses::Model,
    /// Students with an approved KRS entry
    pub student_count: u64,
    /// Materials that have not been deleted
    pub material_count: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DepartmentCourse {
    #[serde(flatten)]
    pub course: courses::Model,
    pub lecturer_name: Option<String>,
}

fn validate_code(code: &str) -> ServiceResult<()> {
    if (3..=10).contains(&code.chars().count()) {
        Ok(())
    } else {
        Err(ServiceError::invalid("code must be between 3 and 10 characters"))
    }
}

fn validate_name(name: &str) -> ServiceResult<()> {
    if (3..=100).contains(&name.chars().count()) {
        Ok(())
    } else {
        Err(ServiceError::invalid("name must be between 3 and 100 characters"))
    }
}

fn validate_credits(credits: i32) -> ServiceResult<()> {
    if (1..=6).contains(&credits) {
        Ok(())
    } else {
        Err(ServiceError::invalid("credits must be between 1 and 6"))
    }
}

fn validate_semester(semester: i32) -> ServiceResult<()> {
    if is_valid_semester(semester) {
        Ok(())
    } else {
        Err(ServiceError::invalid("semester must be between 1 and 14"))
    }
}

pub struct CourseService;

impl CourseService {
    fn ensure_catalog_manager(role: Role) -> ServiceResult<()> {
        if role.manages_catalog() {
            Ok(())
        } else {
            Err(ServiceError::forbidden(
                "only department heads and rectors can manage courses",
            ))
        }
    }

    async fn ensure_lecturer_exists(db: &DatabaseConnection, lecturer_id: Uuid) -> ServiceResult<()> {
        lecturers::Entity::find_by_id(lecturer_id)
            .one(db)
            .await?
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found("lecturer not found"))
    }

    /// Lists courses ordered by code, optionally filtered by a
    /// case-insensitive substring of the code or name
    pub async fn list(
        db: &DatabaseConnection,
        page: PageRequest,
        search: Option<&str>,
    ) -> ServiceResult<Page<courses::Model>> {
        let mut query = courses::Entity::find().order_by_asc(courses::Column::Code);

        if let Some(search) = search.map(str::trim).filter(|search| !search.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(contains_ignore_case((courses::Entity, courses::Column::Code), search))
                    .add(contains_ignore_case((courses::Entity, courses::Column::Name), search)),
            );
        }

        let total = query.clone().count(db).await?;
        let items = query.paginate(db, page.limit).fetch_page(page.index()).await?;

        Ok(Page {
            items,
            request: page,
            total,
        })
    }

    pub async fn get(db: &DatabaseConnection, course_id: Uuid) -> ServiceResult<courses::Model> {
        courses::Entity::find_by_id(course_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("course not found"))
    }

    pub async fn create(
        db: &DatabaseConnection,
        role: Role,
        new: NewCourse,
    ) -> ServiceResult<courses::Model> {
        Self::ensure_catalog_manager(role)?;

        let code = new.code.trim().to_string();
        let name = new.name.trim().to_string();
        let semester = new.semester.unwrap_or(1);
        validate_code(&code)?;
        validate_name(&name)?;
        validate_credits(new.credits)?;
        validate_semester(semester)?;

        if let Some(lecturer_id) = new.lecturer_id {
            Self::ensure_lecturer_exists(db, lecturer_id).await?;
        }

        let now = Utc::now();
        let course = courses::Entity::insert(courses::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(name),
            credits: Set(new.credits),
            semester: Set(semester),
            prerequisites: Set(new.prerequisites),
            description: Set(new.description),
            lecturer_id: Set(new.lecturer_id),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .exec_with_returning(db)
        .await?;

        log::info!("Created course {} ({})", course.code, course.id);
        Ok(course)
    }

    pub async fn update(
        db: &DatabaseConnection,
        role: Role,
        course_id: Uuid,
        changes: CourseChanges,
    ) -> ServiceResult<courses::Model> {
        Self::ensure_catalog_manager(role)?;
        let course = Self::get(db, course_id).await?;
        let mut active: courses::ActiveModel = course.into();

        if let Some(code) = changes.code {
            let code = code.trim().to_string();
            validate_code(&code)?;
            active.code = Set(code);
        }
        if let Some(name) = changes.name {
            let name = name.trim().to_string();
            validate_name(&name)?;
            active.name = Set(name);
        }
        if let Some(credits) = changes.credits {
            validate_credits(credits)?;
            active.credits = Set(credits);
        }
        if let Some(semester) = changes.semester {
            validate_semester(semester)?;
            active.semester = Set(semester);
        }
        if let Some(prerequisites) = changes.prerequisites {
            active.prerequisites = Set(Some(prerequisites));
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(lecturer_id) = changes.lecturer_id {
            Self::ensure_lecturer_exists(db, lecturer_id).await?;
            active.lecturer_id = Set(Some(lecturer_id));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    pub async fn delete(db: &DatabaseConnection, role: Role, course_id: Uuid) -> ServiceResult<()> {
        Self::ensure_catalog_manager(role)?;

        // KRS entries and grades restrict the delete so transcripts stay intact
        let result = courses::Entity::delete_by_id(course_id)
            .exec(db)
            .await
            .map_err(|err| match err.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => ServiceError::conflict(
                    "course has KRS entries or grades and cannot be deleted",
                ),
                _ => err.into(),
            })?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("course not found"));
        }

        log::info!("Deleted course {course_id}");
        Ok(())
    }

    /// Courses taught by the lecturer with their enrolled-student and
    /// material counts
    pub async fn taught_by(
        db: &DatabaseConnection,
        lecturer: &lecturers::Model,
    ) -> ServiceResult<Vec<TaughtCourse>> {
        let courses = courses::Entity::find()
            .filter(courses::Column::LecturerId.eq(lecturer.id))
            .order_by_asc(courses::Column::Code)
            .all(db)
            .await?;

        let counts = courses.into_iter().map(|course| async move {
            let student_count = enrollments::Entity::find()
                .filter(enrollments::Column::CourseId.eq(course.id))
                .filter(enrollments::Column::ApprovalStatus.eq(ApprovalStatus::Approved))
                .count(db)
                .await?;
            let material_count = materials::Entity::find()
                .filter(materials::Column::CourseId.eq(course.id))
                .filter(materials::Column::Status.eq(RecordStatus::Aktif))
                .count(db)
                .await?;

            Ok::<_, DbErr>(TaughtCourse {
                course,
                student_count,
                material_count,
            })
        });

        Ok(try_join_all(counts).await?)
    }

    /// Courses taught by lecturers of the head's department
    pub async fn in_department(
        db: &DatabaseConnection,
        head: &department_heads::Model,
    ) -> ServiceResult<Vec<DepartmentCourse>> {
        let rows = courses::Entity::find()
            .find_also_related(lecturers::Entity)
            .filter(lecturers::Column::Department.eq(head.department.as_str()))
            .order_by_asc(courses::Column::Code)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(course, lecturer)| DepartmentCourse {
                course,
                lecturer_name: lecturer.map(|lecturer| lecturer.name),
            })
            .collect())
    }
}
