//! HTTP-facing error type and the error-kind to status table.
//!
//! Every handler returns [`AppError`]. Domain errors ([`TrackingError`],
//! [`CouponError`]) convert into it through `From`, which is where internal
//! detail is dropped: the response body only carries a sanitized message, a
//! stable `code`, and optional caller-safe `details`.
//!
//! # Response Body
//!
//! ```json
//! { "error": "Coupon has expired", "code": "coupon_inactive", "details": { "reason": "expired" } }
//! ```

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::errors::{CouponError, TrackingError};

/// Seconds a client should wait before retrying a carrier lookup.
const CARRIER_RETRY_AFTER_SECS: &str = "30";

/// Client-visible error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    NotFound,
    Conflict,
    UnknownCarrier,
    CouponInactive,
    UsageLimitExceeded,
    CarrierUnavailable,
    CarrierError,
    Internal,
}

impl ErrorKind {
    /// The single mapping from error kind to HTTP status and wire code.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "validation_error"),
            ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "conflict"),
            ErrorKind::UnknownCarrier => (StatusCode::BAD_REQUEST, "unknown_carrier"),
            ErrorKind::CouponInactive => (StatusCode::BAD_REQUEST, "coupon_inactive"),
            ErrorKind::UsageLimitExceeded => (StatusCode::BAD_REQUEST, "usage_limit_exceeded"),
            ErrorKind::CarrierUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "carrier_unavailable")
            }
            ErrorKind::CarrierError => (StatusCode::BAD_GATEWAY, "carrier_error"),
            ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status_and_code().0
    }

    pub fn code(&self) -> &'static str {
        self.status_and_code().1
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Value::is_null")]
    details: Value,
}

/// Application error returned by handlers and repositories.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    details: Value,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, details: Value) -> Self {
        Self {
            kind,
            message: message.into(),
            details,
        }
    }

    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::new(ErrorKind::Validation, message, details)
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::new(ErrorKind::Unauthorized, message, details)
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::new(ErrorKind::NotFound, message, details)
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::new(ErrorKind::Conflict, message, details)
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::new(ErrorKind::Internal, message, details)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &Value {
        &self.details
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.kind.status_and_code();

        let body = ErrorBody {
            error: self.message,
            code,
            details: self.details,
        };

        let mut response = (status, Json(body)).into_response();

        match self.kind {
            ErrorKind::CarrierUnavailable => {
                response.headers_mut().insert(
                    header::RETRY_AFTER,
                    HeaderValue::from_static(CARRIER_RETRY_AFTER_SECS),
                );
            }
            ErrorKind::Unauthorized => {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
            }
            _ => {}
        }

        response
    }
}

impl From<TrackingError> for AppError {
    fn from(err: TrackingError) -> Self {
        match err {
            TrackingError::MissingTrackingNumber => AppError::bad_request(
                "trackingNumber is required",
                json!({ "field": "trackingNumber" }),
            ),
            TrackingError::InvalidTrackingNumber => AppError::bad_request(
                "trackingNumber contains invalid characters",
                json!({ "field": "trackingNumber" }),
            ),
            TrackingError::UnknownCarrier(provider) => AppError::new(
                ErrorKind::UnknownCarrier,
                "Unsupported shipping provider",
                json!({ "provider": provider }),
            ),
            TrackingError::NotFound { .. } => AppError::not_found(
                "No shipment found for this tracking number",
                Value::Null,
            ),
            TrackingError::CarrierUnavailable { carrier, .. } => AppError::new(
                ErrorKind::CarrierUnavailable,
                format!(
                    "{} tracking is temporarily unavailable, please retry later",
                    carrier.display_name()
                ),
                json!({ "retryable": true }),
            ),
            TrackingError::CarrierResponse { .. } => AppError::new(
                ErrorKind::CarrierError,
                "Unable to retrieve tracking details",
                Value::Null,
            ),
        }
    }
}

impl From<CouponError> for AppError {
    fn from(err: CouponError) -> Self {
        match err {
            CouponError::MissingCode => {
                AppError::bad_request("Coupon code is required", json!({ "field": "code" }))
            }
            CouponError::NotFound { .. } => AppError::not_found("Coupon not found", Value::Null),
            CouponError::Inactive { reason, .. } => AppError::new(
                ErrorKind::CouponInactive,
                reason.message(),
                json!({ "reason": reason }),
            ),
            CouponError::UsageLimitExceeded { .. } => AppError::new(
                ErrorKind::UsageLimitExceeded,
                "Coupon usage limit has been reached",
                Value::Null,
            ),
            CouponError::Store(err) => err,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
        AppError::bad_request("Invalid request", details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(
            "Invalid query parameters",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            let details = match unique_field(db.constraint()) {
                Some(field) => json!({ "field": field }),
                None => Value::Null,
            };
            return AppError::conflict("Resource already exists", details);
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", Value::Null)
    }
}

/// Caller-facing field for a unique constraint. Schema names stay internal.
fn unique_field(constraint: Option<&str>) -> Option<&'static str> {
    match constraint? {
        "coupons_code_key" => Some("code"),
        "api_tokens_name_key" => Some("name"),
        _ => None,
    }
}
