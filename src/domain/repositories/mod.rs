//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; PostgreSQL implementations
//! live in `crate::infrastructure::persistence`. Mock implementations are
//! generated with `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`CouponRepository`] - Coupon lookup and admin management
//! - [`TokenRepository`] - Admin API token authentication
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod coupon_repository;
pub mod token_repository;

pub use coupon_repository::CouponRepository;
pub use token_repository::{ApiToken, TokenLookup, TokenRepository};

#[cfg(test)]
pub use coupon_repository::MockCouponRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
