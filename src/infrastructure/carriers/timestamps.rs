//! Timestamp parsing for the formats carriers send.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::domain::entities::Carrier;
use crate::domain::errors::TrackingError;

/// Parses an RFC 3339 timestamp, or a local timestamp without offset.
///
/// Offset-less values are taken as UTC; carriers that send them do not say
/// which zone they mean.
pub(crate) fn parse_timestamp(carrier: Carrier, value: &str) -> Result<DateTime<Utc>, TrackingError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TrackingError::response(carrier, format!("invalid timestamp: {value}")))
}

/// Parses a `YYYY-MM-DD` date as midnight UTC.
pub(crate) fn parse_date(carrier: Carrier, value: &str) -> Result<DateTime<Utc>, TrackingError> {
    date_with_format(carrier, value, "%Y-%m-%d")
}

/// Parses compact `YYYYMMDD` date and `HHMMSS` time fields.
pub(crate) fn parse_compact(
    carrier: Carrier,
    date: &str,
    time: Option<&str>,
) -> Result<DateTime<Utc>, TrackingError> {
    match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(time) => {
            let joined = format!("{}{}", date.trim(), time);
            NaiveDateTime::parse_from_str(&joined, "%Y%m%d%H%M%S")
                .map(|naive| naive.and_utc())
                .map_err(|_| {
                    TrackingError::response(carrier, format!("invalid timestamp: {date} {time}"))
                })
        }
        None => date_with_format(carrier, date, "%Y%m%d"),
    }
}

fn date_with_format(
    carrier: Carrier,
    value: &str,
    fmt: &str,
) -> Result<DateTime<Utc>, TrackingError> {
    NaiveDate::parse_from_str(value.trim(), fmt)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TrackingError::response(carrier, format!("invalid date: {value}")))
}
