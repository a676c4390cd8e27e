//! Handlers for shipment tracking endpoints.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::api::dto::tracking::TrackingQuery;
use crate::application::services::{TrackingLink, TrackingResult};
use crate::error::AppError;
use crate::state::AppState;

/// Tracks a shipment through its carrier's API.
///
/// # Endpoint
///
/// `GET /api/tracking?provider=<carrier>&trackingNumber=<number>`
///
/// `provider` is optional and defaults to the configured carrier.
///
/// # Response
///
/// ```json
/// {
///   "trackingUrl": "https://www.ups.com/track?tracknum=1Z999AA10123456784",
///   "details": {
///     "carrier": "ups",
///     "trackingNumber": "1Z999AA10123456784",
///     "status": "in_transit",
///     "statusDescription": "On the Way",
///     "estimatedDelivery": "2024-03-06T00:00:00Z",
///     "events": [ ... ]
///   }
/// }
/// ```
///
/// # Errors
///
/// - **400**: `trackingNumber` missing, or unsupported `provider`
/// - **404**: carrier has no such shipment
/// - **502**: carrier answered with something unusable
/// - **503**: carrier unreachable or timed out (with `Retry-After`)
pub async fn tracking_handler(
    State(state): State<AppState>,
    query: Result<Query<TrackingQuery>, QueryRejection>,
) -> Result<Json<TrackingResult>, AppError> {
    let Query(query) = query?;

    let result = state
        .tracking_service
        .track(query.provider.as_deref(), query.tracking_number.as_deref())
        .await?;

    Ok(Json(result))
}

/// Returns the carrier's public tracking page without calling the carrier.
///
/// # Endpoint
///
/// `GET /api/tracking/link?provider=<carrier>&trackingNumber=<number>`
///
/// # Errors
///
/// - **400**: `trackingNumber` missing, or unsupported `provider`
pub async fn tracking_link_handler(
    State(state): State<AppState>,
    query: Result<Query<TrackingQuery>, QueryRejection>,
) -> Result<Json<TrackingLink>, AppError> {
    let Query(query) = query?;

    let link = state
        .tracking_service
        .tracking_link(query.provider.as_deref(), query.tracking_number.as_deref())?;

    Ok(Json(link))
}
