//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository and
//! carrier calls, validation, and business rules. HTTP handlers and the admin
//! CLI call into these services rather than into repositories directly.
//!
//! # Available Services
//!
//! - [`services::tracking_service::TrackingService`] - Carrier resolution and shipment tracking
//! - [`services::coupon_service::CouponService`] - Coupon validation and admin management
//! - [`services::auth_service::AuthService`] - Admin API token authentication

pub mod services;
