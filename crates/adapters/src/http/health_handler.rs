use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use super::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// `"ok"`, or `"degraded"` when the audit store cannot be read.
    #[schema(value_type = String)]
    pub status: &'static str,
    #[schema(value_type = String)]
    pub version: &'static str,
    pub uptime_seconds: u64,
    /// Durably stored audit events, if the store answered.
    pub audit_events: Option<u64>,
}

/// Liveness probe. Always 200 while the process runs.
#[utoipa::path(
    get, path = "/healthz",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse),
    )
)]
pub async fn healthz(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let audit_events = match state.audit_query.stored_event_count() {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = %e, "audit store count failed");
            None
        }
    };
    Json(HealthResponse {
        status: if audit_events.is_some() { "ok" } else { "degraded" },
        version: state.version,
        uptime_seconds: state.start_time.elapsed().as_secs(),
        audit_events,
    })
}
