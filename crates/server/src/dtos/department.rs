use super::PageQuery;
use database::services::{lecturer::LecturerFilter, student::StudentFilter};
use models::status::{AcademicStatus, ClassAction, RecordStatus};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DepartmentStudentQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub semester: Option<i32>,
    #[param(value_type = Option<String>)]
    pub academic_status: Option<AcademicStatus>,
    /// Substring of the name or NIM
    pub search: Option<String>,
}

impl DepartmentStudentQuery {
    pub fn split(self) -> (StudentFilter, PageQuery) {
        let filter = StudentFilter {
            semester: self.semester,
            academic_status: self.academic_status,
            search: self.search,
        };
        let page = PageQuery {
            page: self.page,
            limit: self.limit,
        };
        (filter, page)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DepartmentLecturerQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    #[param(value_type = Option<String>)]
    pub status: Option<RecordStatus>,
    /// Substring of the name, NIDN or email
    pub search: Option<String>,
}

impl DepartmentLecturerQuery {
    pub fn split(self) -> (LecturerFilter, PageQuery) {
        let filter = LecturerFilter {
            status: self.status,
            search: self.search,
        };
        let page = PageQuery {
            page: self.page,
            limit: self.limit,
        };
        (filter, page)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PendingQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub semester: Option<i32>,
    pub academic_year: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClassStatusRequest {
    /// `buka` opens the class, `tutup` closes it
    #[schema(value_type = String)]
    pub action: ClassAction,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignAdvisorRequest {
    pub lecturer_id: Uuid,
}
