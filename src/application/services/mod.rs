//! Business logic services for the application layer.

pub mod auth_service;
pub mod coupon_service;
pub mod tracking_service;

pub use auth_service::{AuthService, hash_token};
pub use coupon_service::CouponService;
pub use tracking_service::{TrackingLink, TrackingResult, TrackingService};
