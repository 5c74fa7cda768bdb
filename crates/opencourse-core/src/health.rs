use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthReport {
    pub status: &'static str,
}

/// Handler for `GET /healthz`, process liveness.
pub async fn healthz() -> Json<HealthReport> {
    Json(HealthReport { status: "ok" })
}

/// Handler for `GET /readyz`. The api binary only starts serving after its
/// database connection is established, so a flat ok is accurate.
pub async fn readyz() -> Json<HealthReport> {
    Json(HealthReport { status: "ok" })
}
