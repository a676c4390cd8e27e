//! Coupon entity and the usability predicate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::{CouponError, InactiveReason};

/// How a coupon's `discount_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// `discount_value` is a percentage (1–100).
    Percentage,
    /// `discount_value` is an amount in minor currency units.
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            other => Err(format!("unknown discount type: {other}")),
        }
    }
}

/// A discount code with an activation window and optional usage limit.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    pub id: i64,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub is_active: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub usage_count: i32,
    /// `None` means unlimited.
    pub usage_limit: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// Returns `true` if the coupon is enabled and `now` lies inside
    /// `[valid_from, valid_to]`.
    pub fn is_within_window(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.valid_from <= now && now <= self.valid_to
    }

    /// Returns `true` if the usage limit has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.usage_limit
            .is_some_and(|limit| self.usage_count >= limit)
    }

    /// Checks whether the coupon can be applied at `now`.
    ///
    /// The active window is checked before the usage limit, and only the first
    /// failing check is reported.
    ///
    /// # Errors
    ///
    /// - [`CouponError::Inactive`] if the coupon is disabled or outside its window
    /// - [`CouponError::UsageLimitExceeded`] if the usage limit is reached
    pub fn check_usable(&self, now: DateTime<Utc>) -> Result<(), CouponError> {
        if !self.is_within_window(now) {
            let reason = if !self.is_active {
                InactiveReason::Disabled
            } else if now < self.valid_from {
                InactiveReason::NotYetValid
            } else {
                InactiveReason::Expired
            };

            return Err(CouponError::Inactive {
                code: self.code.clone(),
                reason,
            });
        }

        if self.is_exhausted() {
            return Err(CouponError::UsageLimitExceeded {
                code: self.code.clone(),
                limit: self.usage_limit.unwrap_or_default(),
            });
        }

        Ok(())
    }
}

/// Input data for creating a new coupon.
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub is_active: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub usage_limit: Option<i32>,
}
