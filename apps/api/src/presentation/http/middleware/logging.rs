use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    tracing::info!("Request: {} {}", method, path);
    let response = next.run(request).await;
    tracing::info!(
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "Response: {} {}",
        method,
        path
    );
    response
}
