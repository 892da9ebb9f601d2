use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::common::error::DomainError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub(crate) struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize, ToSchema)]
pub(crate) struct ErrorDetail {
    /// Machine-readable error code (e.g. `CUSTOMER_NOT_FOUND`).
    #[schema(value_type = String)]
    code: &'static str,
    /// Human-readable description of the error.
    message: String,
}

/// Standard API error type.
///
/// All variants produce a JSON response matching:
/// `{"error":{"code":"SCREAMING_SNAKE","message":"human-readable"}}`.
#[derive(Debug)]
pub enum ApiError {
    NotFound { code: &'static str, message: String },
    BadRequest { code: &'static str, message: String },
    Internal { message: String },
    ServiceUnavailable { message: String },
    PayloadTooLarge { message: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, code, message),
            Self::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            Self::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
            }
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                message,
            ),
            Self::PayloadTooLarge { message } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", message)
            }
        };

        (
            status,
            Json(ErrorBody {
                error: ErrorDetail { code, message },
            }),
        )
            .into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::NotFound(_) => Self::NotFound {
                code: "NOT_FOUND",
                message: err.to_string(),
            },
            DomainError::Validation(_) => Self::BadRequest {
                code: "VALIDATION_ERROR",
                message: err.to_string(),
            },
            DomainError::MalformedQuery(_) => Self::BadRequest {
                code: "MALFORMED_QUERY",
                message: err.to_string(),
            },
            DomainError::StorageFailure(_) => {
                tracing::warn!(error = %err, "storage failure surfaced to API");
                Self::Internal {
                    message: err.to_string(),
                }
            }
            DomainError::General(_) => Self::Internal {
                message: err.to_string(),
            },
        }
    }
}

/// Request bodies that are not acceptable JSON keep the standard error shape.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::PayloadTooLarge {
                message: rejection.body_text(),
            };
        }
        Self::BadRequest {
            code: "JSON_PARSE_ERROR",
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn response_body(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_produces_correct_json() {
        let err = ApiError::NotFound {
            code: "NOT_FOUND",
            message: "customer 9 not found".to_string(),
        };
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = response_body(resp).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "customer 9 not found");
    }

    #[tokio::test]
    async fn internal_error_produces_correct_json() {
        let err = ApiError::Internal {
            message: "unexpected failure".to_string(),
        };
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response_body(resp).await;
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn domain_not_found_maps_to_404() {
        let resp = ApiError::from(DomainError::NotFound("customer 3".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn domain_validation_maps_to_400() {
        let resp =
            ApiError::from(DomainError::Validation("name must not be blank".to_string()))
                .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = response_body(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn domain_malformed_query_maps_to_400() {
        let resp = ApiError::from(DomainError::MalformedQuery("sort".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = response_body(resp).await;
        assert_eq!(body["error"]["code"], "MALFORMED_QUERY");
    }

    #[tokio::test]
    async fn domain_storage_failure_maps_to_500() {
        let resp =
            ApiError::from(DomainError::StorageFailure("disk".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = ApiError::from(DomainError::General("boom".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn service_unavailable_produces_correct_json() {
        let err = ApiError::ServiceUnavailable {
            message: "live cache not configured".to_string(),
        };
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = response_body(resp).await;
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn payload_too_large_produces_correct_json() {
        let resp = ApiError::PayloadTooLarge {
            message: "length limit exceeded".to_string(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let body = response_body(resp).await;
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    }
}
