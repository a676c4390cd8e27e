//! USPS Tracking v3 provider.
//!
//! `GET {base}/tracking/v3/tracking/{number}?expand=DETAIL` with a bearer token.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::http::{check_status, encode, endpoint, read_json, transport_error};
use super::timestamps::{parse_date, parse_timestamp};
use crate::domain::carriers::CarrierProvider;
use crate::domain::entities::{
    Carrier, TrackingDetails, TrackingEvent, TrackingStatus, format_location,
};
use crate::domain::errors::TrackingError;

const CARRIER: Carrier = Carrier::Usps;

pub struct UspsProvider {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl std::fmt::Debug for UspsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UspsProvider")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

impl UspsProvider {
    pub fn new(client: Client, base_url: Url, api_token: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_token,
        }
    }
}

#[async_trait]
impl CarrierProvider for UspsProvider {
    fn carrier(&self) -> Carrier {
        CARRIER
    }

    fn tracking_url(&self, tracking_number: &str) -> String {
        format!(
            "https://tools.usps.com/go/TrackConfirmAction?tLabels={}",
            encode(tracking_number)
        )
    }

    async fn track(&self, tracking_number: &str) -> Result<TrackingDetails, TrackingError> {
        let mut url = endpoint(
            CARRIER,
            &self.base_url,
            &["tracking", "v3", "tracking", tracking_number],
        )?;
        url.query_pairs_mut().append_pair("expand", "DETAIL");

        let mut request = self.client.get(url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(CARRIER, e))?;
        let response = check_status(CARRIER, tracking_number, response).await?;
        let body: TrackingResponse = read_json(CARRIER, response).await?;

        normalize(tracking_number, body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackingResponse {
    status_category: Option<String>,
    status: Option<String>,
    expected_delivery_time_stamp: Option<String>,
    expected_delivery_date: Option<String>,
    #[serde(default)]
    tracking_events: Vec<TrackingEventBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackingEventBody {
    event_type: Option<String>,
    event_timestamp: String,
    event_city: Option<String>,
    event_state: Option<String>,
    event_country: Option<String>,
}

fn normalize(tracking_number: &str, body: TrackingResponse) -> Result<TrackingDetails, TrackingError> {
    let events = body
        .tracking_events
        .iter()
        .map(|event| {
            let description = event.event_type.clone().unwrap_or_default();
            Ok(TrackingEvent {
                occurred_at: parse_timestamp(CARRIER, &event.event_timestamp)?,
                status: status_from_text(&description),
                description,
                location: format_location(&[
                    event.event_city.as_deref(),
                    event.event_state.as_deref(),
                    event.event_country.as_deref(),
                ]),
            })
        })
        .collect::<Result<Vec<_>, TrackingError>>()?;

    let estimated_delivery = match (
        body.expected_delivery_time_stamp.as_deref(),
        body.expected_delivery_date.as_deref(),
    ) {
        (Some(ts), _) => Some(parse_timestamp(CARRIER, ts)?),
        (None, Some(date)) => Some(parse_date(CARRIER, date)?),
        (None, None) => None,
    };

    let status = body.status_category.as_deref().map(|category| {
        (
            status_from_text(category),
            body.status.clone().unwrap_or_else(|| category.to_string()),
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

/// USPS reports status as text; match on the category wording.
fn status_from_text(text: &str) -> TrackingStatus {
    let text = text.to_ascii_lowercase();
    if text.contains("out for delivery") {
        TrackingStatus::OutForDelivery
    } else if text.contains("delivered") {
        TrackingStatus::Delivered
    } else if text.contains("pre-shipment") || text.contains("label created") {
        TrackingStatus::PreTransit
    } else if text.contains("alert") || text.contains("return to sender") {
        TrackingStatus::Exception
    } else if text.contains("transit")
        || text.contains("accepted")
        || text.contains("arrived")
        || text.contains("departed")
        || text.contains("available for pickup")
    {
        TrackingStatus::InTransit
    } else {
        TrackingStatus::Unknown
    }
}
