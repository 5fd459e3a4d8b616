use database::services::student::StudentChanges;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StudentUpdateRequest {
    pub name: Option<String>,
    pub department: Option<String>,
}

impl From<StudentUpdateRequest> for StudentChanges {
    fn from(request: StudentUpdateRequest) -> Self {
        Self {
            name: request.name,
            department: request.department,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BindPhoneRequest {
    pub nim: String,
    pub phone_number: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UnbindPhoneRequest {
    pub nim: String,
}
