//! Liveness and dependency check.

use axum::{Json, extract::State, http::StatusCode};
use std::time::Instant;

use crate::api::dto::health::{ComponentCheck, HealthChecks, HealthResponse, ServiceStatus};
use crate::state::AppState;

/// `GET /health`
///
/// 200 when every check passes, 503 with the same body otherwise. Carrier
/// APIs are never called from here: a courier outage should not take the
/// storefront out of a load balancer.
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "12 coupons", "latencyMs": 3 },
///     "carriers": { "status": "ok", "message": "fedex (default), ups, dhl, usps" }
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let response = HealthResponse::from_checks(HealthChecks {
        database: check_database(&state).await,
        carriers: check_carriers(&state),
    });

    let status = match response.status {
        ServiceStatus::Healthy => StatusCode::OK,
        ServiceStatus::Degraded => {
            tracing::warn!(checks = ?response.checks, "Health check degraded");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (status, Json(response))
}

async fn check_database(state: &AppState) -> ComponentCheck {
    let started = Instant::now();
    let result = state.coupon_service.count_coupons().await;
    let elapsed = started.elapsed().as_millis() as u64;

    match result {
        Ok(count) => ComponentCheck::ok(format!("{count} coupons")).with_latency_ms(elapsed),
        // The cause goes to the log; the body only says the store is down.
        Err(e) => {
            tracing::error!(error = %e, "Health check: coupon store unreachable");
            ComponentCheck::error("coupon store unreachable").with_latency_ms(elapsed)
        }
    }
}

fn check_carriers(state: &AppState) -> ComponentCheck {
    let service = &state.tracking_service;
    let default = service.default_carrier();
    let carriers = service.carriers();

    if carriers.is_empty() {
        return ComponentCheck::error("no carriers registered");
    }

    let listed: Vec<String> = carriers
        .iter()
        .map(|c| {
            if *c == default {
                format!("{c} (default)")
            } else {
                c.to_string()
            }
        })
        .collect();

    ComponentCheck::ok(listed.join(", "))
}
