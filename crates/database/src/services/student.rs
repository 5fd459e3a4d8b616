use super::{access::AccessService, contains_ignore_case};
use crate::{
    entities::{department_heads, lecturers, students, users},
    error::{ServiceError, ServiceResult},
};
use chrono::Utc;
use models::{
    pagination::{Page, PageRequest},
    status::{AcademicStatus, RecordStatus},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, prelude::Expr,
};
use uuid::Uuid;

/// Fields a student may change on their own record
#[derive(Clone, Debug, Default)]
pub struct StudentChanges {
    pub name: Option<String>,
    pub department: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct StudentFilter {
    pub semester: Option<i32>,
    pub academic_status: Option<AcademicStatus>,
    /// Substring of the name or NIM
    pub search: Option<String>,
}

/// Accepts 10 to 15 digits with an optional leading `+`
pub(crate) fn normalize_phone(phone: &str) -> ServiceResult<String> {
    let phone = phone.trim();
    let digits = phone.strip_prefix('+').unwrap_or(phone);

    if (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(phone.to_string())
    } else {
        Err(ServiceError::invalid(
            "phone_number must be 10 to 15 digits, optionally starting with +",
        ))
    }
}

pub struct StudentService;

impl StudentService {
    pub async fn list(
        db: &DatabaseConnection,
        page: PageRequest,
    ) -> ServiceResult<Page<students::Model>> {
        let query = students::Entity::find().order_by_asc(students::Column::Nim);

        let total = query.clone().count(db).await?;
        let items = query.paginate(db, page.limit).fetch_page(page.index()).await?;

        Ok(Page {
            items,
            request: page,
            total,
        })
    }

    pub async fn get(db: &DatabaseConnection, student_id: Uuid) -> ServiceResult<students::Model> {
        students::Entity::find_by_id(student_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("student not found"))
    }

    pub async fn by_nim(db: &DatabaseConnection, nim: &str) -> ServiceResult<students::Model> {
        students::Entity::find()
            .filter(students::Column::Nim.eq(nim.trim()))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("student not found"))
    }

    /// Links a phone number to the student so the messaging bot can reach
    /// them. A number can belong to one student only.
    pub async fn bind_phone(
        db: &DatabaseConnection,
        nim: &str,
        phone: &str,
    ) -> ServiceResult<students::Model> {
        let phone = normalize_phone(phone)?;
        let student = Self::by_nim(db, nim).await?;

        // The unique index on `students.phone` turns a taken number into a conflict
        let mut active: students::ActiveModel = student.into();
        active.phone = Set(Some(phone));
        active.updated_at = Set(Utc::now());

        let student = active.update(db).await?;
        log::info!("Bound phone number to student {}", student.nim);
        Ok(student)
    }

    pub async fn unbind_phone(db: &DatabaseConnection, nim: &str) -> ServiceResult<students::Model> {
        let student = Self::by_nim(db, nim).await?;

        let mut active: students::ActiveModel = student.into();
        active.phone = Set(None);
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    pub async fn update_self(
        db: &DatabaseConnection,
        actor: &students::Model,
        target_id: Uuid,
        changes: StudentChanges,
    ) -> ServiceResult<students::Model> {
        AccessService::ensure_self(actor, target_id)?;
        let student = Self::get(db, target_id).await?;
        let mut active: students::ActiveModel = student.into();

        if let Some(name) = changes.name {
            let name = name.trim().to_string();
            if !(2..=100).contains(&name.chars().count()) {
                return Err(ServiceError::invalid(
                    "name must be between 2 and 100 characters",
                ));
            }
            active.name = Set(name);
        }
        if let Some(department) = changes.department {
            let department = department.trim().to_string();
            if !(2..=100).contains(&department.chars().count()) {
                return Err(ServiceError::invalid(
                    "department must be between 2 and 100 characters",
                ));
            }
            active.department = Set(department);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    /// Soft delete: the student row stays, the account can no longer log in
    pub async fn deactivate_self(
        db: &DatabaseConnection,
        actor: &students::Model,
        target_id: Uuid,
    ) -> ServiceResult<()> {
        AccessService::ensure_self(actor, target_id)?;

        users::Entity::update_many()
            .col_expr(users::Column::Status, Expr::value(RecordStatus::Nonaktif))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(actor.user_id))
            .exec(db)
            .await?;

        log::info!("Deactivated account of student {}", actor.nim);
        Ok(())
    }

    /// Assigns a dosen wali. Student and lecturer must both belong to the
    /// head's department.
    pub async fn assign_advisor(
        db: &DatabaseConnection,
        head: &department_heads::Model,
        student_id: Uuid,
        lecturer_id: Uuid,
    ) -> ServiceResult<students::Model> {
        let student = Self::get(db, student_id).await?;
        let lecturer = lecturers::Entity::find_by_id(lecturer_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("lecturer not found"))?;

        if !AccessService::is_department_head_of(head, &student.department)
            || !AccessService::is_department_head_of(head, &lecturer.department)
        {
            return Err(ServiceError::forbidden(
                "student and lecturer must belong to your department",
            ));
        }

        let mut active: students::ActiveModel = student.into();
        active.advisor_id = Set(Some(lecturer.id));
        active.updated_at = Set(Utc::now());

        let student = active.update(db).await?;
        log::info!("Assigned {} as advisor of {}", lecturer.nidn, student.nim);
        Ok(student)
    }

    /// Students of the head's department, ordered by NIM
    pub async fn in_department(
        db: &DatabaseConnection,
        head: &department_heads::Model,
        filter: StudentFilter,
        page: PageRequest,
    ) -> ServiceResult<Page<students::Model>> {
        let mut condition =
            Condition::all().add(students::Column::Department.eq(head.department.as_str()));

        if let Some(semester) = filter.semester {
            condition = condition.add(students::Column::Semester.eq(semester));
        }
        if let Some(academic_status) = filter.academic_status {
            condition = condition.add(students::Column::AcademicStatus.eq(academic_status));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            condition = condition.add(
                Condition::any()
                    .add(contains_ignore_case((students::Entity, students::Column::Name), search))
                    .add(contains_ignore_case((students::Entity, students::Column::Nim), search)),
            );
        }

        let query = students::Entity::find()
            .filter(condition)
            .order_by_asc(students::Column::Nim);

        let total = query.clone().count(db).await?;
        let items = query.paginate(db, page.limit).fetch_page(page.index()).await?;

        Ok(Page {
            items,
            request: page,
            total,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_phone_number_format() {
        assert_eq!(normalize_phone(" 081234567890 ").unwrap(), "081234567890");
        assert_eq!(normalize_phone("+6281234567890").unwrap(), "+6281234567890");
        assert!(normalize_phone("12345").is_err());
        assert!(normalize_phone("0812-3456-7890").is_err());
        assert!(normalize_phone("+62812345678901234").is_err());
    }
}
