use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use domain::common::entity::EntityId;
use domain::customer::entity::{Customer, CustomerCommand};

use super::error::{ApiError, ErrorBody};
use super::pagination::{PageParams, PageResponse};
use super::state::AppState;

const DEFAULT_CUSTOMER_SORT: &str = r#"[{"field":"name","direction":"ASC"}]"#;

// ── Request DTO ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerRequest {
    pub name: String,
    pub age: Option<u32>,
    /// `YYYY-MM-DD`, must be in the past.
    pub date_of_birth: String,
    pub address: Option<String>,
    /// `M` or `F`.
    pub gender: Option<String>,
}

impl From<CustomerRequest> for CustomerCommand {
    fn from(req: CustomerRequest) -> Self {
        Self {
            name: req.name,
            age: req.age,
            date_of_birth: req.date_of_birth,
            address: req.address,
            gender: req.gender,
        }
    }
}

// ── Response DTO ────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    pub id: u64,
    pub name: String,
    pub age: Option<u32>,
    pub date_of_birth: String,
    pub address: Option<String>,
    pub gender: Option<String>,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id.value(),
            name: c.name,
            age: c.age,
            date_of_birth: c.date_of_birth,
            address: c.address,
            gender: c.gender,
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

/// `GET /api/v1/customers`: one sorted page of customers.
#[utoipa::path(
    get, path = "/api/v1/customers",
    tag = "Customers",
    params(PageParams),
    responses(
        (status = 200, description = "Paginated customers", body = PageResponse<CustomerResponse>),
        (status = 400, description = "Malformed sort or page size", body = ErrorBody),
    )
)]
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<PageResponse<CustomerResponse>>, ApiError> {
    let size = state
        .paging
        .clamp(params.size, state.paging.customer_page_size);
    let page = state.customers.get_customers(
        Some(params.sort_or(DEFAULT_CUSTOMER_SORT)),
        params.page.unwrap_or(0),
        size,
    )?;
    Ok(Json(PageResponse::from_result(page, Into::into)))
}

/// `GET /api/v1/customers/{id}`
#[utoipa::path(
    get, path = "/api/v1/customers/{id}",
    tag = "Customers",
    params(("id" = u64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer", body = CustomerResponse),
        (status = 404, description = "No such customer", body = ErrorBody),
    )
)]
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state.customers.get_customer(EntityId(id))?;
    Ok(Json(customer.into()))
}

/// `POST /api/v1/customers`: create a customer. Audited.
#[utoipa::path(
    post, path = "/api/v1/customers",
    tag = "Customers",
    request_body = CustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Validation failed or body is not valid JSON", body = ErrorBody),
    )
)]
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CustomerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let Json(body) = body?;
    let customer = state.customers.create_customer(body.into())?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// `PUT /api/v1/customers/{id}`: replace a customer. Audited.
#[utoipa::path(
    put, path = "/api/v1/customers/{id}",
    tag = "Customers",
    params(("id" = u64, Path, description = "Customer id")),
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 404, description = "No such customer", body = ErrorBody),
    )
)]
pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    body: Result<Json<CustomerRequest>, JsonRejection>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let Json(body) = body?;
    let customer = state
        .customers
        .update_customer(EntityId(id), body.into())?;
    Ok(Json(customer.into()))
}

/// `DELETE /api/v1/customers/{id}`: delete a customer. Audited.
#[utoipa::path(
    delete, path = "/api/v1/customers/{id}",
    tag = "Customers",
    params(("id" = u64, Path, description = "Customer id")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "No such customer", body = ErrorBody),
    )
)]
pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.customers.delete_customer(EntityId(id))?;
    Ok(StatusCode::NO_CONTENT)
}
