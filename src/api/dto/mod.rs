//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Public wire names are camelCase.

pub mod coupon;
pub mod health;
pub mod pagination;
pub mod tracking;
