//! Repository trait for coupon data access.

use crate::domain::entities::{Coupon, NewCoupon};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for coupons.
///
/// Validation only ever reads through this trait; redemption (incrementing
/// `usage_count`) is handled by the checkout flow, not here.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCouponRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_coupon.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// Finds a coupon by its exact code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Coupon))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns an internal [`AppError`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, AppError>;

    /// Creates a new coupon.
    ///
    /// # Errors
    ///
    /// Returns a conflict [`AppError`] if the code already exists.
    /// Returns an internal [`AppError`] on database errors.
    async fn create(&self, new_coupon: NewCoupon) -> Result<Coupon, AppError>;

    /// Lists coupons, newest first.
    ///
    /// # Errors
    ///
    /// Returns an internal [`AppError`] on database errors.
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Coupon>, AppError>;

    /// Counts all coupons.
    ///
    /// # Errors
    ///
    /// Returns an internal [`AppError`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
