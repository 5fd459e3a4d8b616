use crate::{doc::ApiDoc, state::AppState};
use axum::{Router, routing::get};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod attendance;
pub mod auth;
pub mod course;
pub mod department;
pub mod grade;
pub mod health;
pub mod krs;
pub mod lecturer;
pub mod material;
pub mod root;
pub mod schedule;
pub mod student;

/// Every route of the service
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(auth::router())
        .merge(student::router())
        .merge(course::router())
        .merge(krs::router())
        .merge(grade::router())
        .merge(schedule::router())
        .merge(lecturer::router())
        .merge(attendance::router())
        .merge(material::router())
        .merge(department::router())
}
