//! Coupon validation and admin management.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{Coupon, DiscountType, NewCoupon};
use crate::domain::errors::CouponError;
use crate::domain::repositories::CouponRepository;
use crate::error::AppError;

/// Service for validating coupon codes and managing coupons.
///
/// Validation is read-only: it never touches `usage_count`, so validating the
/// same code twice gives the same answer.
pub struct CouponService<R: CouponRepository> {
    repository: Arc<R>,
}

impl<R: CouponRepository> CouponService<R> {
    /// Creates a new coupon service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validates `code` against the current time.
    ///
    /// # Errors
    ///
    /// See [`Self::validate_at`].
    pub async fn validate(&self, code: &str) -> Result<Coupon, CouponError> {
        self.validate_at(code, Utc::now()).await
    }

    /// Validates `code` as of `now`.
    ///
    /// Checks run in a fixed order and stop at the first failure:
    ///
    /// 1. the code is not blank
    /// 2. a coupon with this code exists
    /// 3. the coupon is active and `now` is inside its window
    /// 4. the usage limit has not been reached
    ///
    /// # Errors
    ///
    /// - [`CouponError::MissingCode`] for a blank code
    /// - [`CouponError::NotFound`] if no coupon matches
    /// - [`CouponError::Inactive`] if disabled or outside the window
    /// - [`CouponError::UsageLimitExceeded`] if the limit is reached
    /// - [`CouponError::Store`] if the lookup fails
    pub async fn validate_at(&self, code: &str, now: DateTime<Utc>) -> Result<Coupon, CouponError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CouponError::MissingCode);
        }

        let coupon = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| CouponError::NotFound {
                code: code.to_string(),
            })?;

        coupon.check_usable(now)?;

        Ok(coupon)
    }

    /// Returns a coupon by code for admin display, without usability checks.
    ///
    /// # Errors
    ///
    /// Returns a not-found [`AppError`] if no coupon matches.
    pub async fn get_coupon(&self, code: &str) -> Result<Coupon, AppError> {
        let code = code.trim();
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Coupon not found", json!({ "code": code })))
    }

    /// Creates a coupon after checking its business rules.
    ///
    /// # Errors
    ///
    /// Returns a validation [`AppError`] if:
    /// - `valid_to` is before `valid_from`
    /// - `discount_value` is not positive
    /// - a percentage discount exceeds 100
    /// - `usage_limit` is negative
    ///
    /// Returns a conflict [`AppError`] if the code already exists.
    pub async fn create_coupon(&self, mut new_coupon: NewCoupon) -> Result<Coupon, AppError> {
        new_coupon.code = new_coupon.code.trim().to_string();
        Self::check_new_coupon(&new_coupon)?;

        if self
            .repository
            .find_by_code(&new_coupon.code)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Coupon code already exists",
                json!({ "code": new_coupon.code }),
            ));
        }

        let coupon = self.repository.create(new_coupon).await?;

        tracing::info!(coupon_id = coupon.id, code = %coupon.code, "Coupon created");

        Ok(coupon)
    }

    /// Returns one page of coupons, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// Returns an internal [`AppError`] on database errors.
    pub async fn list_coupons(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Coupon>, i64), AppError> {
        let coupons = self.repository.list(offset, limit).await?;
        let total = self.repository.count().await?;
        Ok((coupons, total))
    }

    /// Counts coupons; doubles as the database health probe.
    ///
    /// # Errors
    ///
    /// Returns an internal [`AppError`] on database errors.
    pub async fn count_coupons(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    fn check_new_coupon(new_coupon: &NewCoupon) -> Result<(), AppError> {
        if new_coupon.code.is_empty() {
            return Err(AppError::bad_request(
                "Coupon code is required",
                json!({ "field": "code" }),
            ));
        }

        if new_coupon.valid_to < new_coupon.valid_from {
            return Err(AppError::bad_request(
                "validTo must not be before validFrom",
                json!({ "field": "validTo" }),
            ));
        }

        if new_coupon.discount_value <= 0 {
            return Err(AppError::bad_request(
                "discountValue must be positive",
                json!({ "field": "discountValue" }),
            ));
        }

        if new_coupon.discount_type == DiscountType::Percentage && new_coupon.discount_value > 100
        {
            return Err(AppError::bad_request(
                "Percentage discount cannot exceed 100",
                json!({ "field": "discountValue" }),
            ));
        }

        if new_coupon.usage_limit.is_some_and(|limit| limit < 0) {
            return Err(AppError::bad_request(
                "usageLimit must not be negative",
                json!({ "field": "usageLimit" }),
            ));
        }

        Ok(())
    }
}
