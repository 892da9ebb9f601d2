use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use domain::audit::entity::AuditEvent;
use domain::audit::query::AuditFilter;

use super::error::{ApiError, ErrorBody};
use super::pagination::{PageParams, PageResponse};
use super::state::AppState;

const DEFAULT_AUDIT_SORT: &str = r#"[{"field":"timestamp","direction":"DESC"}]"#;

// ── Query parameters DTO ────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AuditSearchParams {
    /// Exact principal match.
    pub principal: Option<String>,
    /// Only events at or after this time (nanoseconds since epoch).
    pub after: Option<u64>,
    /// Exact event type match (e.g. `CREATE_CUSTOMER`).
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

impl From<AuditSearchParams> for AuditFilter {
    fn from(params: AuditSearchParams) -> Self {
        Self {
            principal: params.principal,
            after_ns: params.after,
            event_type: params.event_type,
        }
    }
}

// ── Response DTOs ───────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditEventResponse {
    pub id: Option<u64>,
    pub principal: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub timestamp_ns: u64,
    /// Event details: `entity_id`, `request_payload`, `status`.
    #[schema(value_type = Object)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl From<AuditEvent> for AuditEventResponse {
    fn from(e: AuditEvent) -> Self {
        Self {
            id: e.id,
            principal: e.principal,
            event_type: e.event_type,
            timestamp_ns: e.timestamp_ns,
            data: e.data,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditEventListResponse {
    pub events: Vec<AuditEventResponse>,
    pub count: usize,
}

impl AuditEventListResponse {
    fn from_events(events: Vec<AuditEvent>) -> Self {
        let events: Vec<AuditEventResponse> = events.into_iter().map(Into::into).collect();
        Self {
            count: events.len(),
            events,
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

/// `GET /api/v1/audit/events`: one sorted page of the durable audit log.
#[utoipa::path(
    get, path = "/api/v1/audit/events",
    tag = "Audit",
    params(PageParams),
    responses(
        (status = 200, description = "Paginated audit events", body = PageResponse<AuditEventResponse>),
        (status = 400, description = "Malformed sort or page size", body = ErrorBody),
        (status = 500, description = "Audit store failure", body = ErrorBody),
    )
)]
pub async fn list_audit_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<PageResponse<AuditEventResponse>>, ApiError> {
    let size = state
        .paging
        .clamp(params.size, state.paging.audit_page_size);
    let page = state.audit_query.query(
        Some(params.sort_or(DEFAULT_AUDIT_SORT)),
        params.page.unwrap_or(0),
        size,
    )?;
    Ok(Json(PageResponse::from_result(page, Into::into)))
}

/// `GET /api/v1/audit/events/search`: filtered lookup, newest first.
#[utoipa::path(
    get, path = "/api/v1/audit/events/search",
    tag = "Audit",
    params(AuditSearchParams),
    responses(
        (status = 200, description = "Matching audit events", body = AuditEventListResponse),
        (status = 500, description = "Audit store failure", body = ErrorBody),
    )
)]
pub async fn search_audit_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuditSearchParams>,
) -> Result<Json<AuditEventListResponse>, ApiError> {
    let events = state.audit_query.search(&params.into())?;
    Ok(Json(AuditEventListResponse::from_events(events)))
}

/// `GET /api/v1/audit/events/live`: filtered lookup over the in-memory
/// ring of recent events, oldest first.
#[utoipa::path(
    get, path = "/api/v1/audit/events/live",
    tag = "Audit",
    params(AuditSearchParams),
    responses(
        (status = 200, description = "Matching recent audit events", body = AuditEventListResponse),
        (status = 503, description = "Live cache not configured", body = ErrorBody),
    )
)]
pub async fn live_audit_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuditSearchParams>,
) -> Result<Json<AuditEventListResponse>, ApiError> {
    let events = state
        .audit_query
        .live(&params.into())
        .map_err(|e| ApiError::ServiceUnavailable {
            message: e.to_string(),
        })?;
    Ok(Json(AuditEventListResponse::from_events(events)))
}
