//! Handler for listing supported carriers.

use axum::{Json, extract::State};

use crate::api::dto::tracking::{CarrierItem, CarriersResponse};
use crate::state::AppState;

/// Lists registered carriers and the default one.
///
/// # Endpoint
///
/// `GET /api/carriers`
///
/// # Response
///
/// ```json
/// {
///   "default": "fedex",
///   "carriers": [{ "id": "fedex", "name": "FedEx" }, { "id": "ups", "name": "UPS" }]
/// }
/// ```
pub async fn carriers_handler(State(state): State<AppState>) -> Json<CarriersResponse> {
    let service = &state.tracking_service;

    Json(CarriersResponse {
        default: service.default_carrier(),
        carriers: service.carriers().into_iter().map(CarrierItem::from).collect(),
    })
}
