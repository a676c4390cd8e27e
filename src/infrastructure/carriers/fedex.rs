//! FedEx Track API provider.
//!
//! `POST {base}/track/v1/trackingnumbers` with a bearer token. FedEx answers
//! 200 even for unknown shipments and reports them through an in-body error
//! code, so not-found detection happens after decoding.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::http::{check_status, encode, endpoint, read_json, transport_error};
use super::timestamps::parse_timestamp;
use crate::domain::carriers::CarrierProvider;
use crate::domain::entities::{
    Carrier, TrackingDetails, TrackingEvent, TrackingStatus, format_location,
};
use crate::domain::errors::TrackingError;

const CARRIER: Carrier = Carrier::Fedex;
const NOT_FOUND_CODE: &str = "TRACKING.TRACKINGNUMBER.NOTFOUND";

pub struct FedexProvider {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl std::fmt::Debug for FedexProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FedexProvider")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

impl FedexProvider {
    pub fn new(client: Client, base_url: Url, api_token: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_token,
        }
    }
}

#[async_trait]
impl CarrierProvider for FedexProvider {
    fn carrier(&self) -> Carrier {
        CARRIER
    }

    fn tracking_url(&self, tracking_number: &str) -> String {
        format!(
            "https://www.fedex.com/fedextrack/?trknbr={}",
            encode(tracking_number)
        )
    }

    async fn track(&self, tracking_number: &str) -> Result<TrackingDetails, TrackingError> {
        let payload = json!({
            "includeDetailedScans": true,
            "trackingInfo": [
                { "trackingNumberInfo": { "trackingNumber": tracking_number } }
            ]
        });

        let url = endpoint(CARRIER, &self.base_url, &["track", "v1", "trackingnumbers"])?;
        let mut request = self.client.post(url).json(&payload);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(CARRIER, e))?;
        let response = check_status(CARRIER, tracking_number, response).await?;
        let body: TrackResponse = read_json(CARRIER, response).await?;

        normalize(tracking_number, body)
    }
}

#[derive(Debug, Deserialize)]
struct TrackResponse {
    output: Output,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    complete_track_results: Vec<CompleteTrackResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteTrackResult {
    #[serde(default)]
    track_results: Vec<TrackResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackResult {
    error: Option<ResultError>,
    latest_status_detail: Option<StatusDetail>,
    #[serde(default)]
    date_and_times: Vec<DateAndTime>,
    #[serde(default)]
    scan_events: Vec<ScanEvent>,
}

#[derive(Debug, Deserialize)]
struct ResultError {
    code: String,
}

#[derive(Debug, Deserialize)]
struct StatusDetail {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DateAndTime {
    #[serde(rename = "type")]
    kind: String,
    date_time: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanEvent {
    date: String,
    event_type: Option<String>,
    event_description: Option<String>,
    scan_location: Option<ScanLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanLocation {
    city: Option<String>,
    state_or_province_code: Option<String>,
    country_code: Option<String>,
}

fn normalize(tracking_number: &str, body: TrackResponse) -> Result<TrackingDetails, TrackingError> {
    let result = body
        .output
        .complete_track_results
        .into_iter()
        .next()
        .and_then(|r| r.track_results.into_iter().next())
        .ok_or_else(|| TrackingError::response(CARRIER, "response contains no track results"))?;

    if let Some(error) = &result.error {
        if error.code == NOT_FOUND_CODE {
            return Err(TrackingError::not_found(CARRIER, tracking_number));
        }
        return Err(TrackingError::response(
            CARRIER,
            format!("track result error {}", error.code),
        ));
    }

    let events = result
        .scan_events
        .iter()
        .map(|scan| {
            Ok(TrackingEvent {
                occurred_at: parse_timestamp(CARRIER, &scan.date)?,
                status: status_from_code(scan.event_type.as_deref()),
                description: scan.event_description.clone().unwrap_or_default(),
                location: scan.scan_location.as_ref().and_then(|l| {
                    format_location(&[
                        l.city.as_deref(),
                        l.state_or_province_code.as_deref(),
                        l.country_code.as_deref(),
                    ])
                }),
            })
        })
        .collect::<Result<Vec<_>, TrackingError>>()?;

    let estimated_delivery = result
        .date_and_times
        .iter()
        .find(|d| d.kind == "ESTIMATED_DELIVERY")
        .map(|d| parse_timestamp(CARRIER, &d.date_time))
        .transpose()?;

    let status = result.latest_status_detail.map(|detail| {
        (
            status_from_code(detail.code.as_deref()),
            detail.description.unwrap_or_default(),
        )
    });

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
        Some("OC" | "IN") => TrackingStatus::PreTransit,
        Some("PU" | "IT" | "AR" | "DP" | "AF" | "CC" | "FD") => TrackingStatus::InTransit,
        Some("OD") => TrackingStatus::OutForDelivery,
        Some("DL") => TrackingStatus::Delivered,
        Some("DE" | "SE" | "CA" | "RS" | "DY") => TrackingStatus::Exception,
        _ => TrackingStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn body(value: serde_json::Value) -> TrackResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_tracking_url() {
        let provider = FedexProvider::new(
            Client::new(),
            Url::parse("https://apis.fedex.com/").unwrap(),
            None,
        );
        assert_eq!(
            provider.tracking_url("123456789012"),
            "https://www.fedex.com/fedextrack/?trknbr=123456789012"
        );
    }

    #[test]
    fn test_normalize_sorts_events_and_reads_status() {
        let response = body(json!({
            "output": { "completeTrackResults": [{ "trackResults": [{
                "latestStatusDetail": { "code": "DL", "description": "Delivered" },
                "dateAndTimes": [
                    { "type": "ESTIMATED_DELIVERY", "dateTime": "2024-03-03T17:00:00-06:00" }
                ],
                "scanEvents": [
                    { "date": "2024-03-03T09:30:00-06:00", "eventType": "DL",
                      "eventDescription": "Delivered",
                      "scanLocation": { "city": "Austin", "stateOrProvinceCode": "TX", "countryCode": "US" } },
                    { "date": "2024-03-01T08:00:00-06:00", "eventType": "PU",
                      "eventDescription": "Picked up" }
                ]
            }]}]}
        }));

        let details = normalize("123", response).unwrap();
        assert_eq!(details.status, TrackingStatus::Delivered);
        assert_eq!(details.events.len(), 2);
        assert_eq!(details.events[0].description, "Picked up");
        assert_eq!(details.events[1].location.as_deref(), Some("Austin, TX, US"));
        assert_eq!(
            details.estimated_delivery,
            Some(Utc.with_ymd_and_hms(2024, 3, 3, 23, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_normalize_not_found_code() {
        let response = body(json!({
            "output": { "completeTrackResults": [{ "trackResults": [{
                "error": { "code": "TRACKING.TRACKINGNUMBER.NOTFOUND" }
            }]}]}
        }));

        let err = normalize("000", response).unwrap_err();
        assert!(matches!(err, TrackingError::NotFound { .. }));
    }

    #[test]
    fn test_normalize_empty_results() {
        let response = body(json!({ "output": { "completeTrackResults": [] } }));
        let err = normalize("000", response).unwrap_err();
        assert!(matches!(err, TrackingError::CarrierResponse { .. }));
    }

    #[test]
    fn test_debug_hides_token() {
        let provider = FedexProvider::new(
            Client::new(),
            Url::parse("https://apis.fedex.com/").unwrap(),
            Some("secret-token".to_string()),
        );
        let debug = format!("{provider:?}");
        assert!(!debug.contains("secret-token"));
    }
}
