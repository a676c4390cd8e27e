//! `GET /health` body.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: ComponentCheck,
    pub carriers: ComponentCheck,
}

/// Outcome of probing one dependency.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCheck {
    pub status: CheckState,
    pub message: String,
    /// Round-trip time, for checks that make a call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl ComponentCheck {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: CheckState::Ok,
            message: message.into(),
            latency_ms: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CheckState::Error,
            message: message.into(),
            latency_ms: None,
        }
    }

    pub fn with_latency_ms(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status == CheckState::Ok
    }
}

impl HealthResponse {
    /// Degraded as soon as any component check failed.
    pub fn from_checks(checks: HealthChecks) -> Self {
        let status = if checks.database.is_ok() && checks.carriers.is_ok() {
            ServiceStatus::Healthy
        } else {
            ServiceStatus::Degraded
        };

        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }
    }
}
