use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Maximum request body size for API endpoints (64 KiB).
const MAX_BODY_SIZE: usize = 64 * 1024;

use super::audit_handler::{list_audit_events, live_audit_events, search_audit_events};
use super::customer_handler::{
    create_customer, delete_customer, get_customer, list_customers, update_customer,
};
use super::health_handler::healthz;
use super::metrics_handler::metrics;
use super::openapi::ApiDoc;
use super::state::AppState;

/// Build the main Axum router with all REST API routes.
///
/// 1. **Public**: `/healthz`, `/metrics`
/// 2. **API**: `/api/v1/*`, body size limited
pub fn build_router(state: Arc<AppState>, swagger_ui: bool) -> Router {
    let public_routes = Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics));

    let api_routes = Router::new()
        .route("/api/v1/audit/events", get(list_audit_events))
        .route("/api/v1/audit/events/search", get(search_audit_events))
        .route("/api/v1/audit/events/live", get(live_audit_events))
        .route(
            "/api/v1/customers",
            get(list_customers).post(create_customer),
        )
        .route(
            "/api/v1/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE));

    let router = public_routes.merge(api_routes);

    let router = if swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    router.with_state(state)
}
