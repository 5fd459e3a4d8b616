use database::services::{
    attendance::{AttendanceBatch, AttendanceInput},
    material::MaterialInput,
};
use models::status::{AttendanceStatus, MaterialType};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceEntryRequest {
    pub student_id: Uuid,
    /// `hadir`, `izin`, `sakit` or `alfa`
    #[schema(value_type = String)]
    pub status: AttendanceStatus,
    pub remark: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceRequest {
    pub course_id: Uuid,
    /// 1 to 16
    pub meeting: i32,
    /// `YYYY-MM-DD`
    pub date: String,
    pub entries: Vec<AttendanceEntryRequest>,
}

impl From<AttendanceRequest> for AttendanceBatch {
    fn from(request: AttendanceRequest) -> Self {
        Self {
            course_id: request.course_id,
            meeting: request.meeting,
            date: request.date,
            entries: request
                .entries
                .into_iter()
                .map(|entry| AttendanceInput {
                    student_id: entry.student_id,
                    status: entry.status,
                    remark: entry.remark,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MeetingQuery {
    pub meeting: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MaterialRequest {
    pub title: String,
    pub description: Option<String>,
    pub meeting: i32,
    /// `slide`, `video`, `document` or `link`
    #[schema(value_type = String)]
    pub material_type: MaterialType,
    pub url: Option<String>,
}

impl From<MaterialRequest> for MaterialInput {
    fn from(request: MaterialRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            meeting: request.meeting,
            material_type: request.material_type,
            url: request.url,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewMaterialRequest {
    pub course_id: Uuid,
    #[serde(flatten)]
    pub material: MaterialRequest,
}
