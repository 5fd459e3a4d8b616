use database::{
    entities::users,
    services::account::{NewAccount, Profile},
};
use models::{role::Role, status::AcademicStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
    /// One of `mahasiswa`, `dosen`, `kajur`, `rektor`
    #[schema(value_type = String)]
    pub role: Option<Role>,
    /// Required for `mahasiswa`
    pub nim: Option<String>,
    /// Required for `dosen`, `kajur` and `rektor`
    pub nidn: Option<String>,
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub semester: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub academic_status: Option<AcademicStatus>,
}

impl RegisterRequest {
    /// Moves the request into service input, swapping the plain password for
    /// its digest
    pub fn into_new_account(self, password_hash: String) -> NewAccount {
        NewAccount {
            username: self.username,
            name: self.name,
            email: self.email,
            password_hash,
            role: self.role,
            nim: self.nim,
            nidn: self.nidn,
            phone: self.phone_number,
            department: self.department,
            semester: self.semester,
            academic_status: self.academic_status,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username, email, NIM or NIDN
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: users::Model,
    pub profile: Profile,
}
