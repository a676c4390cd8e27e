//! DTOs for tracking and carrier endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::entities::Carrier;

/// Query string for `GET /api/tracking` and `GET /api/tracking/link`.
///
/// Both fields are optional at the extractor level so that a missing
/// tracking number reaches the service and is reported in the standard
/// error envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingQuery {
    pub provider: Option<String>,
    pub tracking_number: Option<String>,
}

/// One supported carrier.
#[derive(Debug, Serialize)]
pub struct CarrierItem {
    pub id: Carrier,
    pub name: &'static str,
}

impl From<Carrier> for CarrierItem {
    fn from(carrier: Carrier) -> Self {
        Self {
            id: carrier,
            name: carrier.display_name(),
        }
    }
}

/// Response for `GET /api/carriers`.
#[derive(Debug, Serialize)]
pub struct CarriersResponse {
    pub default: Carrier,
    pub carriers: Vec<CarrierItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_uses_camel_case() {
        let query: TrackingQuery =
            serde_json::from_str(r#"{"provider":"ups","trackingNumber":"1Z"}"#).unwrap();
        assert_eq!(query.provider.as_deref(), Some("ups"));
        assert_eq!(query.tracking_number.as_deref(), Some("1Z"));
    }

    #[test]
    fn test_carrier_item() {
        let json = serde_json::to_value(CarrierItem::from(Carrier::Dhl)).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "dhl", "name": "DHL" }));
    }
}
