//! Handler for public coupon validation.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::api::dto::coupon::{CouponResponse, ValidateCouponRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Validates a coupon code.
///
/// # Endpoint
///
/// `POST /api/coupons/validate`
///
/// # Request Body
///
/// ```json
/// { "code": "SAVE10" }
/// ```
///
/// Returns the stored coupon unchanged when it is usable. Validation never
/// counts as a redemption.
///
/// # Errors
///
/// - **400** `validation_error`: code missing or blank
/// - **404** `not_found`: no coupon with this code
/// - **400** `coupon_inactive`: disabled, not yet valid, or expired
/// - **400** `usage_limit_exceeded`: usage limit reached
pub async fn validate_coupon_handler(
    State(state): State<AppState>,
    payload: Result<Json<ValidateCouponRequest>, JsonRejection>,
) -> Result<Json<CouponResponse>, AppError> {
    let Json(payload) = payload?;
    let code = payload.code.unwrap_or_default();

    let coupon = state
        .coupon_service
        .validate(&code)
        .await
        .inspect_err(|e| tracing::debug!(code = %code.trim(), reason = %e, "Coupon rejected"))?;

    Ok(Json(CouponResponse::from(coupon)))
}
