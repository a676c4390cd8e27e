//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod admin_coupons;
pub mod carriers;
pub mod coupons;
pub mod health;
pub mod tracking;

pub use admin_coupons::{create_coupon_handler, get_coupon_handler, list_coupons_handler};
pub use carriers::carriers_handler;
pub use coupons::validate_coupon_handler;
pub use health::health_handler;
pub use tracking::{tracking_handler, tracking_link_handler};
