pub mod config;
pub mod doc;
pub mod dtos;
pub mod error;
pub mod extractors;
pub mod notify;
pub mod response;
pub mod routes;
pub mod security;
pub mod state;
pub mod utils;

use axum::{Router, http::HeaderValue, middleware};
use state::AppState;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};

fn cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                log::warn!("Ignoring malformed CORS origin {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the application with its middleware stack
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(middleware::from_fn(utils::logging::log_request))
        .layer(CompressionLayer::new())
        .layer(cors(&state.config.cors_origins))
        .layer(TimeoutLayer::new(state.config.request_timeout));

    routes::router().layer(middleware).with_state(state)
}
