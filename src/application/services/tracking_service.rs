//! Shipment tracking across carriers.
//!
//! Every carrier call emits two series through the `metrics` facade:
//!
//! - `carrier_requests_total{carrier, outcome}` counter
//! - `carrier_request_duration_seconds{carrier}` histogram
//!
//! The crate installs no recorder. Until the embedding binary installs one
//! (for example a Prometheus exporter), these calls are no-ops.

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::carriers::CarrierRegistry;
use crate::domain::entities::{Carrier, TrackingDetails};
use crate::domain::errors::TrackingError;

/// A successful lookup: the public tracking page plus normalized details.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResult {
    pub tracking_url: String,
    pub details: TrackingDetails,
}

/// Public tracking page for a shipment, built without contacting the carrier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingLink {
    pub carrier: Carrier,
    pub tracking_url: String,
}

/// Service that validates tracking requests and dispatches them to carriers.
///
/// Holds the registry by `Arc`; the registry itself is immutable, so the
/// service can be shared across requests without locking.
pub struct TrackingService {
    registry: Arc<CarrierRegistry>,
}

impl TrackingService {
    pub fn new(registry: Arc<CarrierRegistry>) -> Self {
        Self { registry }
    }

    /// Tracks a shipment with the named carrier, or the default one.
    ///
    /// The tracking number is checked before the carrier is resolved, so a
    /// request without one never reaches the registry. Exactly one outbound
    /// call is made; failures are not retried.
    ///
    /// # Errors
    ///
    /// - [`TrackingError::MissingTrackingNumber`] if the number is absent or blank
    /// - [`TrackingError::InvalidTrackingNumber`] if it contains control characters
    /// - [`TrackingError::UnknownCarrier`] if `provider` names no registered carrier
    /// - [`TrackingError::CarrierUnavailable`], [`TrackingError::NotFound`] or
    ///   [`TrackingError::CarrierResponse`] from the carrier call
    pub async fn track(
        &self,
        provider: Option<&str>,
        tracking_number: Option<&str>,
    ) -> Result<TrackingResult, TrackingError> {
        let tracking_number = require_tracking_number(tracking_number)?;

        let provider = self.registry.resolve(provider).inspect_err(|e| {
            tracing::error!(error = %e, "Tracking request for unsupported carrier");
        })?;
        let carrier = provider.carrier();

        let started = Instant::now();
        let outcome = provider.track(tracking_number).await;
        let elapsed = started.elapsed();

        let outcome_label = match &outcome {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        metrics::counter!(
            "carrier_requests_total",
            "carrier" => carrier.as_str(),
            "outcome" => outcome_label
        )
        .increment(1);
        metrics::histogram!("carrier_request_duration_seconds", "carrier" => carrier.as_str())
            .record(elapsed.as_secs_f64());

        match outcome {
            Ok(details) => {
                tracing::debug!(
                    carrier = %carrier,
                    tracking_number,
                    status = ?details.status,
                    events = details.events.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Tracking lookup succeeded"
                );
                Ok(TrackingResult {
                    tracking_url: provider.tracking_url(tracking_number),
                    details,
                })
            }
            Err(e) => {
                log_failure(carrier, tracking_number, &e);
                Err(e)
            }
        }
    }

    /// Builds the public tracking page URL without any network call.
    ///
    /// # Errors
    ///
    /// - [`TrackingError::MissingTrackingNumber`] if the number is absent or blank
    /// - [`TrackingError::UnknownCarrier`] if `provider` names no registered carrier
    pub fn tracking_link(
        &self,
        provider: Option<&str>,
        tracking_number: Option<&str>,
    ) -> Result<TrackingLink, TrackingError> {
        let tracking_number = require_tracking_number(tracking_number)?;
        let provider = self.registry.resolve(provider)?;

        Ok(TrackingLink {
            carrier: provider.carrier(),
            tracking_url: provider.tracking_url(tracking_number),
        })
    }

    pub fn default_carrier(&self) -> Carrier {
        self.registry.default_carrier()
    }

    pub fn carriers(&self) -> Vec<Carrier> {
        self.registry.carriers()
    }
}

fn require_tracking_number(tracking_number: Option<&str>) -> Result<&str, TrackingError> {
    let tracking_number = tracking_number
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(TrackingError::MissingTrackingNumber)?;

    if tracking_number.chars().any(char::is_control) {
        return Err(TrackingError::InvalidTrackingNumber);
    }

    Ok(tracking_number)
}

/// Logs a carrier failure at the severity its kind calls for.
///
/// Unavailability is transient, not-found is the caller's problem, and a
/// malformed response points at an integration defect.
fn log_failure(carrier: Carrier, tracking_number: &str, error: &TrackingError) {
    match error {
        TrackingError::CarrierUnavailable { reason, .. } => {
            tracing::warn!(carrier = %carrier, tracking_number, reason = %reason, "Carrier unavailable");
        }
        TrackingError::NotFound { .. } => {
            tracing::info!(carrier = %carrier, tracking_number, "Shipment not found");
        }
        TrackingError::CarrierResponse { reason, .. } => {
            tracing::error!(carrier = %carrier, tracking_number, reason = %reason, "Unexpected carrier response");
        }
        other => {
            tracing::error!(carrier = %carrier, tracking_number, error = %other, "Tracking failed");
        }
    }
}
