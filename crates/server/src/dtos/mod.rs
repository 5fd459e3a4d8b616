use models::pagination::PageRequest;
use serde::Deserialize;
use utoipa::IntoParams;

pub mod academic;
pub mod auth;
pub mod classroom;
pub mod course;
pub mod department;
pub mod student;

/// `page`/`limit` query pair; out of range values are clamped
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, starting at 1
    pub page: Option<u64>,
    /// Page size, 1 to 100
    pub limit: Option<u64>,
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        PageRequest::new(query.page, query.limit)
    }
}
