use database::services::course::{CourseChanges, NewCourse};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Substring of the course code or name
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CourseRequest {
    pub code: String,
    pub name: String,
    /// Credit hours (SKS), 1 to 6
    pub credits: i32,
    pub semester: Option<i32>,
    pub prerequisites: Option<String>,
    pub description: Option<String>,
    pub lecturer_id: Option<Uuid>,
}

impl From<CourseRequest> for NewCourse {
    fn from(request: CourseRequest) -> Self {
        Self {
            code: request.code,
            name: request.name,
            credits: request.credits,
            semester: request.semester,
            prerequisites: request.prerequisites,
            description: request.description,
            lecturer_id: request.lecturer_id,
        }
    }
}

/// Partial update; absent fields keep their value
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CourseUpdateRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub credits: Option<i32>,
    pub semester: Option<i32>,
    pub prerequisites: Option<String>,
    pub description: Option<String>,
    pub lecturer_id: Option<Uuid>,
}

impl From<CourseUpdateRequest> for CourseChanges {
    fn from(request: CourseUpdateRequest) -> Self {
        Self {
            code: request.code,
            name: request.name,
            credits: request.credits,
            semester: request.semester,
            prerequisites: request.prerequisites,
            description: request.description,
            lecturer_id: request.lecturer_id,
        }
    }
}
