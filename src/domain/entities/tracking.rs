//! Normalized shipment tracking data.
//!
//! Every carrier reports tracking in its own shape; providers convert into
//! these types so callers never see carrier-specific fields.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::carrier::Carrier;

/// Coarse shipment state shared by all carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    PreTransit,
    InTransit,
    OutForDelivery,
    Delivered,
    Exception,
    Unknown,
}

/// A single scan or status change reported by the carrier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub occurred_at: DateTime<Utc>,
    pub status: TrackingStatus,
    pub description: String,
    pub location: Option<String>,
}

/// Tracking information for one shipment.
///
/// `events` is always ordered oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingDetails {
    pub carrier: Carrier,
    pub tracking_number: String,
    pub status: TrackingStatus,
    pub status_description: String,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub events: Vec<TrackingEvent>,
}

impl TrackingDetails {
    /// Builds details from carrier data, sorting events chronologically.
    ///
    /// When the carrier gives no overall status, the newest event's status and
    /// description are used instead.
    pub fn new(
        carrier: Carrier,
        tracking_number: impl Into<String>,
        status: Option<(TrackingStatus, String)>,
        estimated_delivery: Option<DateTime<Utc>>,
        mut events: Vec<TrackingEvent>,
    ) -> Self {
        events.sort_by_key(|e| e.occurred_at);

        let (status, status_description) = status
            .or_else(|| {
                events
                    .last()
                    .map(|e| (e.status, e.description.clone()))
            })
            .unwrap_or((TrackingStatus::Unknown, String::new()));

        Self {
            carrier,
            tracking_number: tracking_number.into(),
            status,
            status_description,
            estimated_delivery,
            events,
        }
    }

    /// Returns the most recent event, if any.
    pub fn latest_event(&self) -> Option<&TrackingEvent> {
        self.events.last()
    }
}

/// Joins non-empty location parts into a single display string.
pub fn format_location(parts: &[Option<&str>]) -> Option<String> {
    let joined = parts
        .iter()
        .flatten()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() { None } else { Some(joined) }
}
