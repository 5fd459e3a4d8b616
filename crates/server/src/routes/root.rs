use crate::response::{ApiJson, ApiResult};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub docs: &'static str,
}

/// Names the service and where its API document lives
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "Health"
)]
pub async fn root() -> ApiResult<ServiceInfo> {
    Ok(ApiJson::ok(ServiceInfo {
        name: "SIAku API",
        version: env!("CARGO_PKG_VERSION"),
        docs: "/swagger-ui",
    }))
}
