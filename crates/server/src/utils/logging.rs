use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Logs method, path, status and latency of every request
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed = started.elapsed();

    if status.is_server_error() {
        log::warn!("{method} {path} {} {elapsed:?}", status.as_u16());
    } else {
        log::info!("{method} {path} {} {elapsed:?}", status.as_u16());
    }

    response
}
