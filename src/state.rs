//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{AuthService, CouponService, TrackingService};
use crate::domain::carriers::CarrierRegistry;
use crate::infrastructure::persistence::{PgCouponRepository, PgTokenRepository};

/// Services shared across requests.
///
/// Everything is behind `Arc`, so cloning the state per request is cheap and
/// no field is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub tracking_service: Arc<TrackingService>,
    pub coupon_service: Arc<CouponService<PgCouponRepository>>,
    pub auth_service: Arc<AuthService<PgTokenRepository>>,
}

impl AppState {
    /// Wires the PostgreSQL repositories and the carrier registry into services.
    pub fn new(pool: Arc<PgPool>, registry: Arc<CarrierRegistry>, token_signing_secret: String) -> Self {
        let coupon_repository = Arc::new(PgCouponRepository::new(pool.clone()));
        let token_repository = Arc::new(PgTokenRepository::new(pool));

        Self {
            tracking_service: Arc::new(TrackingService::new(registry)),
            coupon_service: Arc::new(CouponService::new(coupon_repository)),
            auth_service: Arc::new(AuthService::new(token_repository, token_signing_secret)),
        }
    }
}
