//! Carrier identifier for supported shipping couriers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A supported shipping carrier.
///
/// The set is closed: adding a courier means adding a variant here and a
/// provider in [`crate::infrastructure::carriers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Carrier {
    Fedex,
    Ups,
    Dhl,
    Usps,
}

impl Carrier {
    /// Every supported carrier, in display order.
    pub const ALL: [Carrier; 4] = [Carrier::Fedex, Carrier::Ups, Carrier::Dhl, Carrier::Usps];

    /// Returns the lowercase identifier used in query strings and config.
    pub fn as_str(&self) -> &'static str {
        match self {
            Carrier::Fedex => "fedex",
            Carrier::Ups => "ups",
            Carrier::Dhl => "dhl",
            Carrier::Usps => "usps",
        }
    }

    /// Returns the human-readable carrier name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Carrier::Fedex => "FedEx",
            Carrier::Ups => "UPS",
            Carrier::Dhl => "DHL",
            Carrier::Usps => "USPS",
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a supported carrier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown carrier: {0}")]
pub struct ParseCarrierError(pub String);

impl FromStr for Carrier {
    type Err = ParseCarrierError;

    /// Parses a carrier identifier, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        Carrier::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(id))
            .ok_or_else(|| ParseCarrierError(id.to_string()))
    }
}
