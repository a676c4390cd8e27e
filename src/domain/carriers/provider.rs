//! Provider trait implemented once per shipping carrier.

use async_trait::async_trait;

use crate::domain::entities::{Carrier, TrackingDetails};
use crate::domain::errors::TrackingError;

/// Interface to a single carrier's tracking API.
///
/// Providers are stateless and immutable after construction. Each call to
/// [`track`](CarrierProvider::track) issues exactly one outbound request and
/// never retries; retry policy belongs to the caller.
///
/// # Implementations
///
/// - [`crate::infrastructure::carriers::FedexProvider`]
/// - [`crate::infrastructure::carriers::UpsProvider`]
/// - [`crate::infrastructure::carriers::DhlProvider`]
/// - [`crate::infrastructure::carriers::UspsProvider`]
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarrierProvider: Send + Sync {
    /// The carrier this provider talks to.
    fn carrier(&self) -> Carrier;

    /// Formats the carrier's public tracking page URL.
    ///
    /// Pure: no I/O, never fails. A malformed tracking number simply yields
    /// a page the carrier will answer with "not found".
    fn tracking_url(&self, tracking_number: &str) -> String;

    /// Fetches and normalizes tracking details for a shipment.
    ///
    /// # Errors
    ///
    /// - [`TrackingError::CarrierUnavailable`] on network failure, timeout,
    ///   rate limiting or a carrier-side 5xx
    /// - [`TrackingError::NotFound`] if the carrier has no such shipment
    /// - [`TrackingError::CarrierResponse`] if the response cannot be parsed
    async fn track(&self, tracking_number: &str) -> Result<TrackingDetails, TrackingError>;
}
