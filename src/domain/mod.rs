//! Domain layer containing business entities and contracts.
//!
//! Independent of infrastructure and presentation concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`carriers`] - Carrier provider trait and registry
//! - [`repositories`] - Data access trait definitions
//! - [`errors`] - Tracking and coupon error taxonomy
//!
//! # Design Principles
//!
//! - Traits define contracts implemented by the infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])

pub mod carriers;
pub mod entities;
pub mod errors;
pub mod repositories;
