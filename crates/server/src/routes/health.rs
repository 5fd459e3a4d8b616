use crate::{
    error::ApiError,
    response::{ApiJson, ApiResult},
    state::AppState,
};
use axum::extract::State;
use database::ServiceError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

/// Returns "ok" when the service and its database are reachable
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthStatus),
        (status = 500, description = "Database unreachable")
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> ApiResult<HealthStatus> {
    state
        .db
        .ping()
        .await
        .map_err(|err| ApiError::Service(ServiceError::Database(err)))?;

    Ok(ApiJson::ok(HealthStatus {
        status: "ok",
        database: "ok",
    }))
}
