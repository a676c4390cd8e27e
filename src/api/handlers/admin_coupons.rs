//! Handlers for admin coupon management.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::coupon::{CouponListResponse, CouponResponse, CreateCouponRequest};
use crate::api::dto::pagination::PaginationParams;
use crate::error::AppError;
use crate::state::AppState;

/// Lists coupons, newest first.
///
/// # Endpoint
///
/// `GET /api/admin/coupons?page=1&page_size=25`
///
/// # Errors
///
/// Returns 400 if pagination parameters are out of range.
pub async fn list_coupons_handler(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<CouponListResponse>, AppError> {
    let Query(params) = params?;
    let page = params.resolve()?;

    let (coupons, total) = state
        .coupon_service
        .list_coupons(page.offset(), page.limit())
        .await?;

    Ok(Json(CouponListResponse {
        items: coupons.into_iter().map(CouponResponse::from).collect(),
        page: page.number,
        page_size: page.size,
        total,
    }))
}

/// Creates a coupon.
///
/// # Endpoint
///
/// `POST /api/admin/coupons`
///
/// # Errors
///
/// Returns 400 if the body is invalid or breaks a coupon rule.
/// Returns 409 if the code already exists.
pub async fn create_coupon_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateCouponRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CouponResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let coupon = state.coupon_service.create_coupon(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(CouponResponse::from(coupon))))
}

/// Returns one coupon, regardless of whether it is currently usable.
///
/// # Endpoint
///
/// `GET /api/admin/coupons/{code}`
///
/// # Errors
///
/// Returns 404 if no coupon has this code.
pub async fn get_coupon_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<CouponResponse>, AppError> {
    let coupon = state.coupon_service.get_coupon(&code).await?;

    Ok(Json(CouponResponse::from(coupon)))
}
