//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`                  - Health check: database and carriers (public)
//! - `GET  /api/tracking`            - Track a shipment (public)
//! - `GET  /api/tracking/link`       - Public tracking page URL, no carrier call (public)
//! - `GET  /api/carriers`            - Supported carriers (public)
//! - `POST /api/coupons/validate`    - Validate a coupon code (public)
//! - `/api/admin/*`                  - Coupon management (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter for admin routes
//! - **Authentication** - Bearer token on admin routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let admin_router = api::routes::admin_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer());

    let api_router = api::routes::public_routes()
        .layer(rate_limit::layer())
        .nest("/admin", admin_router);

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
