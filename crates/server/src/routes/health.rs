use axum::http::StatusCode;

/// Liveness probe: answers as soon as the reservation backend accepts requests
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Reservation backend is up", content_type = "text/plain", body = String)
    ),
    tag = "Health"
)]
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "reservation backend up")
}
