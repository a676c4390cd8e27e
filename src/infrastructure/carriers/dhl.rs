//! DHL Shipment Tracking (Unified) provider.
//!
//! `GET {base}/track/shipments?trackingNumber={number}`, authenticated with
//! the `DHL-API-Key` header.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::http::{check_status, encode, endpoint, read_json, transport_error};
use super::timestamps::parse_timestamp;
use crate::domain::carriers::CarrierProvider;
use crate::domain::entities::{
    Carrier, TrackingDetails, TrackingEvent, TrackingStatus, format_location,
};
use crate::domain::errors::TrackingError;

const CARRIER: Carrier = Carrier::Dhl;
const API_KEY_HEADER: &str = "DHL-API-Key";

pub struct DhlProvider {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl std::fmt::Debug for DhlProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DhlProvider")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

impl DhlProvider {
    pub fn new(client: Client, base_url: Url, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl CarrierProvider for DhlProvider {
    fn carrier(&self) -> Carrier {
        CARRIER
    }

    fn tracking_url(&self, tracking_number: &str) -> String {
        format!(
            "https://www.dhl.com/en/express/tracking.html?AWB={}&brand=DHL",
            encode(tracking_number)
        )
    }

    async fn track(&self, tracking_number: &str) -> Result<TrackingDetails, TrackingError> {
        let mut url = endpoint(CARRIER, &self.base_url, &["track", "shipments"])?;
        url.query_pairs_mut()
            .append_pair("trackingNumber", tracking_number);

        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(CARRIER, e))?;
        let response = check_status(CARRIER, tracking_number, response).await?;
        let body: ShipmentsResponse = read_json(CARRIER, response).await?;

        normalize(tracking_number, body)
    }
}

#[derive(Debug, Deserialize)]
struct ShipmentsResponse {
    #[serde(default)]
    shipments: Vec<Shipment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Shipment {
    status: Option<Event>,
    estimated_time_of_delivery: Option<String>,
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Event {
    timestamp: Option<String>,
    status_code: Option<String>,
    status: Option<String>,
    description: Option<String>,
    location: Option<Location>,
}

#[derive(Debug, Deserialize)]
struct Location {
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Address {
    address_locality: Option<String>,
    country_code: Option<String>,
}

impl Event {
    fn text(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.status.clone())
            .unwrap_or_default()
    }
}

fn normalize(tracking_number: &str, body: ShipmentsResponse) -> Result<TrackingDetails, TrackingError> {
    let shipment = body
        .shipments
        .into_iter()
        .next()
        .ok_or_else(|| TrackingError::not_found(CARRIER, tracking_number))?;

    let events = shipment
        .events
        .iter()
        .map(|event| {
            let timestamp = event
                .timestamp
                .as_deref()
                .ok_or_else(|| TrackingError::response(CARRIER, "event without timestamp"))?;
            Ok(TrackingEvent {
                occurred_at: parse_timestamp(CARRIER, timestamp)?,
                status: status_from_code(event.status_code.as_deref()),
                description: event.text(),
                location: event.location.as_ref().and_then(|l| l.address.as_ref()).and_then(
                    |a| format_location(&[a.address_locality.as_deref(), a.country_code.as_deref()]),
                ),
            })
        })
        .collect::<Result<Vec<_>, TrackingError>>()?;

    let estimated_delivery = shipment
        .estimated_time_of_delivery
        .as_deref()
        .map(|eta| parse_timestamp(CARRIER, eta))
        .transpose()?;

    let status = shipment
        .status
        .as_ref()
        .map(|s| (status_from_code(s.status_code.as_deref()), s.text()));

    Ok(TrackingDetails::new(
        CARRIER,
        tracking_number,
        status,
        estimated_delivery,
        events,
    ))
}

fn status_from_code(code: Option<&str>) -> TrackingStatus {
    match code {
        Some("pre-transit") => TrackingStatus::PreTransit,
        Some("transit") => TrackingStatus::InTransit,
        Some("out-for-delivery") => TrackingStatus::OutForDelivery,
        Some("delivered") => TrackingStatus::Delivered,
        Some("failure") => TrackingStatus::Exception,
        _ => TrackingStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> ShipmentsResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_tracking_url() {
        let provider = DhlProvider::new(
            Client::new(),
            Url::parse("https://api-eu.dhl.com").unwrap(),
            None,
        );
        assert_eq!(
            provider.tracking_url("1234567890"),
            "https://www.dhl.com/en/express/tracking.html?AWB=1234567890&brand=DHL"
        );
    }

    #[test]
    fn test_normalize_shipment() {
        let response = body(json!({
            "shipments": [{
                "id": "1234567890",
                "status": { "statusCode": "transit", "status": "In transit",
                            "timestamp": "2024-03-02T08:00:00" },
                "estimatedTimeOfDelivery": "2024-03-04T12:00:00Z",
                "events": [
                    { "timestamp": "2024-03-02T08:00:00", "statusCode": "transit",
                      "description": "Arrived at hub",
                      "location": { "address": { "addressLocality": "Leipzig", "countryCode": "DE" } } },
                    { "timestamp": "2024-03-01T16:20:00", "statusCode": "pre-transit",
                      "status": "Shipment information received" }
                ]
            }]
        }));

        let details = normalize("1234567890", response).unwrap();
        assert_eq!(details.status, TrackingStatus::InTransit);
        assert_eq!(details.status_description, "In transit");
        assert_eq!(details.events[0].description, "Shipment information received");
        assert_eq!(details.events[1].location.as_deref(), Some("Leipzig, DE"));
        assert!(details.estimated_delivery.is_some());
    }

    #[test]
    fn test_normalize_empty_shipments_is_not_found() {
        let err = normalize("000", body(json!({ "shipments": [] }))).unwrap_err();
        assert!(matches!(err, TrackingError::NotFound { .. }));
    }

    #[test]
    fn test_debug_hides_key() {
        let provider = DhlProvider::new(
            Client::new(),
            Url::parse("https://api-eu.dhl.com").unwrap(),
            Some("dhl-key".to_string()),
        );
        assert!(!format!("{provider:?}").contains("dhl-key"));
    }
}
