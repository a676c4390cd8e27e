//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`carriers`] - HTTP clients for carrier tracking APIs
//! - [`persistence`] - PostgreSQL repository implementations

pub mod carriers;
pub mod persistence;
