//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow`.
//!
//! # Repositories
//!
//! - [`PgCouponRepository`] - Coupon lookup and admin management
//! - [`PgTokenRepository`] - API token storage and validation

pub mod pg_coupon_repository;
pub mod pg_token_repository;

pub use pg_coupon_repository::PgCouponRepository;
pub use pg_token_repository::PgTokenRepository;
