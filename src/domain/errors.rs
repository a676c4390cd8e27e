//! Domain error types for shipment tracking and coupon validation.
//!
//! These carry full internal detail for logging. Conversion into the
//! client-facing [`AppError`] happens in [`crate::error`], which strips that
//! detail.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::domain::entities::Carrier;
use crate::error::AppError;

/// Failure while resolving a carrier or tracking a shipment.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// The request did not include a tracking number.
    #[error("tracking number is required")]
    MissingTrackingNumber,

    /// The tracking number contains characters no carrier accepts.
    #[error("tracking number contains control characters")]
    InvalidTrackingNumber,

    /// The carrier identifier matches no registered provider.
    #[error("unknown carrier: {0}")]
    UnknownCarrier(String),

    /// Network failure, timeout, rate limiting or a 5xx from the carrier.
    #[error("{carrier} tracking API unavailable: {reason}")]
    CarrierUnavailable { carrier: Carrier, reason: String },

    /// The carrier reports no shipment for this tracking number.
    #[error("{carrier} has no shipment {tracking_number}")]
    NotFound {
        carrier: Carrier,
        tracking_number: String,
    },

    /// The carrier answered, but not in a shape we understand.
    #[error("unexpected response from {carrier}: {reason}")]
    CarrierResponse { carrier: Carrier, reason: String },
}

impl TrackingError {
    pub fn unavailable(carrier: Carrier, reason: impl Into<String>) -> Self {
        Self::CarrierUnavailable {
            carrier,
            reason: reason.into(),
        }
    }

    pub fn response(carrier: Carrier, reason: impl Into<String>) -> Self {
        Self::CarrierResponse {
            carrier,
            reason: reason.into(),
        }
    }

    pub fn not_found(carrier: Carrier, tracking_number: impl Into<String>) -> Self {
        Self::NotFound {
            carrier,
            tracking_number: tracking_number.into(),
        }
    }

    /// Returns `true` if the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CarrierUnavailable { .. })
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingTrackingNumber => "missing_tracking_number",
            Self::InvalidTrackingNumber => "invalid_tracking_number",
            Self::UnknownCarrier(_) => "unknown_carrier",
            Self::CarrierUnavailable { .. } => "unavailable",
            Self::NotFound { .. } => "not_found",
            Self::CarrierResponse { .. } => "bad_response",
        }
    }
}

/// Why a coupon failed the active-window check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InactiveReason {
    Disabled,
    NotYetValid,
    Expired,
}

impl InactiveReason {
    pub fn message(&self) -> &'static str {
        match self {
            InactiveReason::Disabled => "Coupon is not active",
            InactiveReason::NotYetValid => "Coupon is not valid yet",
            InactiveReason::Expired => "Coupon has expired",
        }
    }
}

impl fmt::Display for InactiveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Coupon validation rejection.
#[derive(Debug, Error)]
pub enum CouponError {
    #[error("coupon code is required")]
    MissingCode,

    #[error("coupon {code} not found")]
    NotFound { code: String },

    #[error("coupon {code} is inactive: {reason}")]
    Inactive { code: String, reason: InactiveReason },

    #[error("coupon {code} reached its usage limit of {limit}")]
    UsageLimitExceeded { code: String, limit: i32 },

    /// The coupon lookup itself failed.
    #[error(transparent)]
    Store(#[from] AppError),
}
