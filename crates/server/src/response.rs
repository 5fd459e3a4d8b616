use crate::error::ApiError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use models::pagination::Page;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, ToSchema)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// The envelope every endpoint answers with
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            pagination: None,
        }
    }
}

/// Successful response body plus its status code
#[derive(Debug)]
pub struct ApiJson<T> {
    status: StatusCode,
    body: ApiResponse<T>,
}

impl<T> ApiJson<T> {
    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, data)
    }

    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, data)
    }

    fn with_status(status: StatusCode, data: T) -> Self {
        Self {
            status,
            body: ApiResponse {
                success: true,
                data: Some(data),
                error: None,
                pagination: None,
            },
        }
    }

    /// A failed operation that still reports what it did
    pub fn rejected(status: StatusCode, data: T, error: String) -> Self {
        Self {
            status,
            body: ApiResponse {
                success: false,
                data: Some(data),
                error: Some(error),
                pagination: None,
            },
        }
    }
}

impl<T> ApiJson<Vec<T>> {
    pub fn page(page: Page<T>) -> Self {
        let mut response = Self::ok(page.items);
        response.body.pagination = Some(Pagination {
            page: page.request.page,
            limit: page.request.limit,
            total: page.total,
            total_pages: page.request.total_pages(page.total),
        });
        response
    }
}

impl<T: Serialize> IntoResponse for ApiJson<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Plain acknowledgement payload
#[derive(Debug, Serialize, ToSchema)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type ApiResult<T> = Result<ApiJson<T>, ApiError>;
