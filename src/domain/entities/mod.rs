//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures; the only rule that lives here is the
//! coupon usability predicate, because it depends on nothing but the record
//! itself and the current time.
//!
//! # Entity Types
//!
//! - [`Carrier`] - A supported shipping courier
//! - [`TrackingDetails`] / [`TrackingEvent`] - Normalized shipment tracking
//! - [`Coupon`] - A discount code with activation window and usage limit
//!
//! Creation inputs use separate structs (`NewCoupon`).

pub mod carrier;
pub mod coupon;
pub mod tracking;

pub use carrier::{Carrier, ParseCarrierError};
pub use coupon::{Coupon, DiscountType, NewCoupon};
pub use tracking::{TrackingDetails, TrackingEvent, TrackingStatus, format_location};
