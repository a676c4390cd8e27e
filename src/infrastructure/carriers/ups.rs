//! UPS Track API provider.
//!
//! `GET {base}/api/track/v1/details/{number}` with a bearer token. Unknown
//! numbers come back either as a 404 or as a 200 carrying warning `TW0001`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::http::{check_status, encode, endpoint, read_json, transport_error};
use super::timestamps::parse_compact;
use crate::domain::carriers::CarrierProvider;
use crate::domain::entities::{
    Carrier, TrackingDetails, TrackingEvent, TrackingStatus, format_location,
};
use crate::domain::errors::TrackingError;

const CARRIER: Carrier = Carrier::Ups;
const NOT_FOUND_WARNING: &str = "TW0001";
const TRANSACTION_SOURCE: &str = "storefront";

pub struct UpsProvider {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl std::fmt::Debug for UpsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpsProvider")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

impl UpsProvider {
    pub fn new(client: Client, base_url: Url, api_token: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_token,
        }
    }
}

#[async_trait]
impl CarrierProvider for UpsProvider {
    fn carrier(&self) -> Carrier {
        CARRIER
    }

    fn tracking_url(&self, tracking_number: &str) -> String {
        format!(
            "https://www.ups.com/track?tracknum={}",
            encode(tracking_number)
        )
    }

    async fn track(&self, tracking_number: &str) -> Result<TrackingDetails, TrackingError> {
        let url = endpoint(
            CARRIER,
            &self.base_url,
            &["api", "track", "v1", "details", tracking_number],
        )?;

        let mut request = self
            .client
            .get(url)
            .query(&[("locale", "en_US")])
            .header("transId", transaction_id())
            .header("transactionSrc", TRANSACTION_SOURCE);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(CARRIER, e))?;
        let response = check_status(CARRIER, tracking_number, response).await?;
        let body: TrackResponseEnvelope = read_json(CARRIER, response).await?;

        normalize(tracking_number, body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackResponseEnvelope {
    track_response: TrackResponse,
}

#[derive(Debug, Deserialize)]
struct TrackResponse {
    #[serde(default)]
    shipment: Vec<Shipment>,
}

#[derive(Debug, Deserialize)]
struct Shipment {
    #[serde(default)]
    package: Vec<Package>,
    #[serde(default)]
    warnings: Vec<Warning>,
}

#[derive(Debug, Deserialize)]
struct Warning {
    code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Package {
    current_status: Option<Status>,
    #[serde(default)]
    delivery_date: Vec<DeliveryDate>,
    #[serde(default)]
    activity: Vec<Activity>,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(rename = "type")]
    kind: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeliveryDate {
    #[serde(rename = "type")]
    kind: String,
    date: String,
}

#[derive(Debug, Deserialize)]
struct Activity {
    date: String,
    time: Option<String>,
    status: Option<Status>,
    location: Option<ActivityLocation>,
}

#[derive(Debug, Deserialize)]
struct ActivityLocation {
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Address {
    city: Option<String>,
    state_province: Option<String>,
    country: Option<String>,
}

/// Per-request id UPS echoes back for support lookups.
fn transaction_id() -> String {
    format!("{:016x}", rand::random::<u64>())
}

fn normalize(
    tracking_number: &str,
    body: TrackResponseEnvelope,
) -> Result<TrackingDetails, TrackingError> {
    let shipment = body
        .track_response
        .shipment
        .into_iter()
        .next()
        .ok_or_else(|| TrackingError::not_found(CARRIER, tracking_number))?;

    if shipment.warnings.iter().any(|w| w.code == NOT_FOUND_WARNING) {
        return Err(TrackingError::not_found(CARRIER, tracking_number));
    }

    let package = shipment
        .package
        .into_iter()
        .next()
        .ok_or_else(|| TrackingError::not_found(CARRIER, tracking_number))?;

    let events = package
        .activity
        .iter()
        .map(|activity| {
            let (status, description) = split_status(activity.status.as_ref());
            Ok(TrackingEvent {
                occurred_at: parse_compact(CARRIER, &activity.date, activity.time.as_deref())?,
                status,
                description,
                location: activity
                    .location
                    .as_ref()
                    .and_then(|l| l.address.as_ref())
                    .and_then(|a| {
                        format_location(&[
                            a.city.as_deref(),
                            a.state_province.as_deref(),
                            a.country.as_deref(),
                        ])
                    }),
            })
        })
        .collect::<Result<Vec<_>, TrackingError>>()?;

    // Scheduled, rescheduled or estimated delivery; `DEL` is the actual date.
    let estimated_delivery = package
        .delivery_date
        .iter()
        .find(|d| matches!(d.kind.as_str(), "SDD" | "RDD" | "EDD"))
        .map(|d| parse_compact(CARRIER, &d.date, None))
        .transpose()?;

    let status = package
        .current_status
        .as_ref()
        .map(|s| split_status(Some(s)));

    Ok(TrackingDetails::new(
        CARRIER,
        tracking_number,
        status,
        estimated_delivery,
        events,
    ))
}

fn split_status(status: Option<&Status>) -> (TrackingStatus, String) {
    match status {
        Some(s) => (
            status_from_type(s.kind.as_deref()),
            s.description.clone().unwrap_or_default(),
        ),
        None => (TrackingStatus::Unknown, String::new()),
    }
}

fn status_from_type(kind: Option<&str>) -> TrackingStatus {
    match kind {
        Some("M" | "MV") => TrackingStatus::PreTransit,
        Some("P" | "I") => TrackingStatus::InTransit,
        Some("O") => TrackingStatus::OutForDelivery,
        Some("D") => TrackingStatus::Delivered,
        Some("X" | "RS") => TrackingStatus::Exception,
        _ => TrackingStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn body(value: serde_json::Value) -> TrackResponseEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_tracking_url() {
        let provider = UpsProvider::new(
            Client::new(),
            Url::parse("https://onlinetools.ups.com").unwrap(),
            None,
        );
        assert_eq!(
            provider.tracking_url("1Z999AA10123456784"),
            "https://www.ups.com/track?tracknum=1Z999AA10123456784"
        );
    }

    #[test]
    fn test_transaction_id_is_header_safe() {
        let id = transaction_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, transaction_id());
    }

    #[test]
    fn test_normalize_package() {
        let response = body(json!({
            "trackResponse": { "shipment": [{ "package": [{
                "currentStatus": { "type": "I", "description": "On the Way" },
                "deliveryDate": [{ "type": "SDD", "date": "20240306" }],
                "activity": [
                    { "date": "20240302", "time": "140000",
                      "status": { "type": "I", "description": "Departed from Facility" },
                      "location": { "address": { "city": "Louisville", "stateProvince": "KY", "country": "US" } } },
                    { "date": "20240301", "time": "093000",
                      "status": { "type": "M", "description": "Shipper created a label" } }
                ]
            }]}]}
        }));

        let details = normalize("1Z", response).unwrap();
        assert_eq!(details.status, TrackingStatus::InTransit);
        assert_eq!(details.status_description, "On the Way");
        assert_eq!(details.events[0].status, TrackingStatus::PreTransit);
        assert_eq!(
            details.events[1].location.as_deref(),
            Some("Louisville, KY, US")
        );
        assert_eq!(
            details.estimated_delivery,
            Some(Utc.with_ymd_and_hms(2024, 3, 6, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_normalize_warning_is_not_found() {
        let response = body(json!({
            "trackResponse": { "shipment": [{
                "warnings": [{ "code": "TW0001", "message": "Tracking Information Not Found" }]
            }]}
        }));

        let err = normalize("1Z", response).unwrap_err();
        assert!(matches!(err, TrackingError::NotFound { .. }));
    }

    #[test]
    fn test_normalize_empty_package_list_is_not_found() {
        let response = body(json!({ "trackResponse": { "shipment": [{ "package": [] }] } }));
        let err = normalize("1Z", response).unwrap_err();
        assert!(matches!(err, TrackingError::NotFound { .. }));
    }

    #[test]
    fn test_normalize_bad_date() {
        let response = body(json!({
            "trackResponse": { "shipment": [{ "package": [{
                "activity": [{ "date": "March 1st", "time": "093000" }]
            }]}]}
        }));

        let err = normalize("1Z", response).unwrap_err();
        assert!(matches!(err, TrackingError::CarrierResponse { .. }));
    }
}
