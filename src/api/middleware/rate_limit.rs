//! Per-IP token buckets in front of the API.
//!
//! `GovernorConfigBuilder` is configured with the replenish *period*: one
//! token comes back every `period`, up to `burst` stored tokens. Over-limit
//! requests get `429 Too Many Requests`.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

pub type RateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Public tier: 5 requests/s sustained, bursts of 50.
///
/// Each tracking request costs an outbound carrier call, so the bucket is
/// sized for a customer refreshing an order page, not for a scraper.
pub const PUBLIC_PERIOD: Duration = Duration::from_millis(200);
pub const PUBLIC_BURST: u32 = 50;

/// Admin tier: 1 request/s sustained, bursts of 10.
pub const ADMIN_PERIOD: Duration = Duration::from_secs(1);
pub const ADMIN_BURST: u32 = 10;

/// Limiter for `/api/tracking`, `/api/carriers` and `/api/coupons/validate`.
///
/// ```rust,ignore
/// let public = api::routes::public_routes().layer(rate_limit::layer());
/// ```
pub fn layer() -> RateLimitLayer {
    bucket(PUBLIC_PERIOD, PUBLIC_BURST)
}

/// Stricter limiter for the bearer-protected `/api/admin/*` routes.
pub fn secure_layer() -> RateLimitLayer {
    bucket(ADMIN_PERIOD, ADMIN_BURST)
}

fn bucket(period: Duration, burst: u32) -> RateLimitLayer {
    let config = GovernorConfigBuilder::default()
        .period(period)
        .burst_size(burst)
        .finish()
        .expect("period and burst are non-zero constants");

    GovernorLayer::new(Arc::new(config))
}
