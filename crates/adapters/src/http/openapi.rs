use utoipa::OpenApi;

use super::audit_handler::{AuditEventListResponse, AuditEventResponse};
use super::customer_handler::{CustomerRequest, CustomerResponse};
use super::error::{ErrorBody, ErrorDetail};
use super::health_handler::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    info(title = "trailkeeper", description = "Audit trail and customer management API"),
    paths(
        super::health_handler::healthz,
        super::metrics_handler::metrics,
        super::audit_handler::list_audit_events,
        super::audit_handler::search_audit_events,
        super::audit_handler::live_audit_events,
        super::customer_handler::list_customers,
        super::customer_handler::get_customer,
        super::customer_handler::create_customer,
        super::customer_handler::update_customer,
        super::customer_handler::delete_customer,
    ),
    components(schemas(
        ErrorBody,
        ErrorDetail,
        HealthResponse,
        AuditEventResponse,
        AuditEventListResponse,
        CustomerRequest,
        CustomerResponse,
    )),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Observability", description = "Prometheus metrics"),
        (name = "Audit", description = "Audit trail queries"),
        (name = "Customers", description = "Audited customer management"),
    )
)]
pub struct ApiDoc;
