use super::access::AccessService;
use crate::{
    entities::{courses, lecturers, materials},
    error::{ServiceError, ServiceResult},
};
use chrono::Utc;
use models::{
    attendance::is_valid_meeting,
    status::{MaterialType, RecordStatus},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, prelude::Expr, sea_query::OnConflict,
};
use serde::Serialize;
use uuid::Uuid;

/// Contents of a material, used both to create and to replace one
#[derive(Clone, Debug)]
pub struct MaterialInput {
    pub title: String,
    pub description: Option<String>,
    pub meeting: i32,
    pub material_type: MaterialType,
    pub url: Option<String>,
}

impl MaterialInput {
    fn validate(&self) -> ServiceResult<()> {
        if !(3..=200).contains(&self.title.trim().chars().count()) {
            return Err(ServiceError::invalid(
                "title must be between 3 and 200 characters",
            ));
        }
        if !is_valid_meeting(self.meeting) {
            return Err(ServiceError::invalid("meeting must be between 1 and 16"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MaterialEntry {
    #[serde(flatten)]
    pub material: materials::Model,
    pub course_code: String,
    pub course_name: String,
}

impl MaterialEntry {
    fn new(material: materials::Model, course: &courses::Model) -> Self {
        Self {
            material,
            course_code: course.code.clone(),
            course_name: course.name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CourseMaterials {
    pub course_id: Uuid,
    pub course_code: String,
    pub course_name: String,
    pub total_materials: usize,
    pub materials: Vec<materials::Model>,
}

pub struct MaterialService;

impl MaterialService {
    /// Loads an active material of a course the lecturer teaches
    async fn owned(
        db: &DatabaseConnection,
        lecturer: &lecturers::Model,
        material_id: Uuid,
    ) -> ServiceResult<(materials::Model, courses::Model)> {
        let (material, course) = materials::Entity::find_by_id(material_id)
            .find_also_related(courses::Entity)
            .filter(materials::Column::Status.eq(RecordStatus::Aktif))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("material not found"))?;

        match course {
            Some(course) if AccessService::is_teaching(lecturer, &course) => Ok((material, course)),
            _ => Err(ServiceError::forbidden("you are not teaching this course")),
        }
    }

    pub async fn create(
        db: &DatabaseConnection,
        lecturer: &lecturers::Model,
        course_id: Uuid,
        input: MaterialInput,
    ) -> ServiceResult<MaterialEntry> {
        let course = AccessService::teaching_course(db, lecturer, course_id).await?;
        input.validate()?;

        let title = input.title.trim().to_string();
        let now = Utc::now();
        // A soft-deleted material with the same title comes back in place of a new row
        let written = materials::Entity::insert(materials::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course.id),
            title: Set(title.clone()),
            description: Set(input.description),
            meeting: Set(input.meeting),
            material_type: Set(input.material_type),
            file_path: Set(None),
            file_size: Set(0),
            url: Set(input.url),
            status: Set(RecordStatus::Aktif),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .on_conflict(
            OnConflict::columns([
                materials::Column::CourseId,
                materials::Column::Meeting,
                materials::Column::Title,
            ])
            .update_columns([
                materials::Column::Description,
                materials::Column::MaterialType,
                materials::Column::FilePath,
                materials::Column::FileSize,
                materials::Column::Url,
                materials::Column::Status,
                materials::Column::CreatedAt,
                materials::Column::UpdatedAt,
            ])
            .action_and_where(
                Expr::col((materials::Entity, materials::Column::Status))
                    .eq(RecordStatus::Nonaktif),
            )
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
        if written == 0 {
            return Err(ServiceError::conflict(
                "a material with this title already exists for this meeting",
            ));
        }

        let material = materials::Entity::find()
            .filter(materials::Column::CourseId.eq(course.id))
            .filter(materials::Column::Meeting.eq(input.meeting))
            .filter(materials::Column::Title.eq(title))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::Internal("material missing after insert".to_string()))?;

        log::info!(
            "Added material \"{}\" to {} meeting {}",
            material.title,
            course.code,
            material.meeting
        );
        Ok(MaterialEntry::new(material, &course))
    }

    /// Active materials ordered by meeting, then by creation time
    pub async fn list_by_course(
        db: &DatabaseConnection,
        lecturer: &lecturers::Model,
        course_id: Uuid,
        meeting: Option<i32>,
    ) -> ServiceResult<CourseMaterials> {
        let course = AccessService::teaching_course(db, lecturer, course_id).await?;

        let mut query = materials::Entity::find()
            .filter(materials::Column::CourseId.eq(course.id))
            .filter(materials::Column::Status.eq(RecordStatus::Aktif));
        if let Some(meeting) = meeting {
            query = query.filter(materials::Column::Meeting.eq(meeting));
        }

        let materials = query
            .order_by_asc(materials::Column::Meeting)
            .order_by_asc(materials::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(CourseMaterials {
            course_id: course.id,
            course_code: course.code,
            course_name: course.name,
            total_materials: materials.len(),
            materials,
        })
    }

    pub async fn update(
        db: &DatabaseConnection,
        lecturer: &lecturers::Model,
        material_id: Uuid,
        input: MaterialInput,
    ) -> ServiceResult<MaterialEntry> {
        let (material, course) = Self::owned(db, lecturer, material_id).await?;
        input.validate()?;

        let mut active: materials::ActiveModel = material.into();
        active.title = Set(input.title.trim().to_string());
        active.description = Set(input.description);
        active.meeting = Set(input.meeting);
        active.material_type = Set(input.material_type);
        active.url = Set(input.url);
        active.updated_at = Set(Utc::now());

        Ok(MaterialEntry::new(active.update(db).await?, &course))
    }

    /// Soft delete; the row stays as `nonaktif` and is hidden from listings
    pub async fn delete(
        db: &DatabaseConnection,
        lecturer: &lecturers::Model,
        material_id: Uuid,
    ) -> ServiceResult<()> {
        let (material, course) = Self::owned(db, lecturer, material_id).await?;

        let mut active: materials::ActiveModel = material.into();
        active.status = Set(RecordStatus::Nonaktif);
        active.updated_at = Set(Utc::now());
        let material = active.update(db).await?;

        log::info!("Removed material \"{}\" from {}", material.title, course.code);
        Ok(())
    }
}
