//! API route configuration.
//!
//! Public routes need no credentials. Admin routes are mounted under
//! `/api/admin` by [`crate::routes::app_router`], which wraps them in
//! Bearer token authentication via [`crate::api::middleware::auth`].

use crate::api::handlers::{
    carriers_handler, create_coupon_handler, get_coupon_handler, list_coupons_handler,
    tracking_handler, tracking_link_handler, validate_coupon_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Public storefront routes.
///
/// # Endpoints
///
/// - `GET  /tracking`          - Track a shipment
/// - `GET  /tracking/link`     - Public tracking page URL
/// - `GET  /carriers`          - Supported carriers and the default
/// - `POST /coupons/validate`  - Validate a coupon code
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/tracking", get(tracking_handler))
        .route("/tracking/link", get(tracking_link_handler))
        .route("/carriers", get(carriers_handler))
        .route("/coupons/validate", post(validate_coupon_handler))
}

/// Admin routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET  /coupons`         - List coupons (paginated)
/// - `POST /coupons`         - Create a coupon
/// - `GET  /coupons/{code}`  - Show one coupon
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/coupons",
            get(list_coupons_handler).post(create_coupon_handler),
        )
        .route("/coupons/{code}", get(get_coupon_handler))
}
