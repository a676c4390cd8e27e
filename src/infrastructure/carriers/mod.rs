//! HTTP providers for the supported carrier tracking APIs.

mod dhl;
mod fedex;
mod http;
mod timestamps;
mod ups;
mod usps;

pub use dhl::DhlProvider;
pub use fedex::FedexProvider;
pub use http::build_client;
pub use ups::UpsProvider;
pub use usps::UspsProvider;

use std::sync::Arc;

use anyhow::Context;

use crate::config::CarrierConfig;
use crate::domain::carriers::CarrierRegistry;
use crate::domain::entities::Carrier;

/// Builds the registry with every supported carrier.
///
/// All providers share one HTTP client, and with it one connection pool and
/// the configured timeout.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn build_registry(config: &CarrierConfig) -> anyhow::Result<CarrierRegistry> {
    let client = build_client(config.timeout()).context("Failed to build carrier HTTP client")?;

    let endpoint = |carrier: Carrier| {
        let e = config.endpoint(carrier);
        if e.api_key.is_none() {
            tracing::warn!(carrier = %carrier, "No API credential configured");
        }
        (e.base_url.clone(), e.api_key.clone())
    };

    let (url, key) = endpoint(Carrier::Fedex);
    let fedex = FedexProvider::new(client.clone(), url, key);
    let (url, key) = endpoint(Carrier::Ups);
    let ups = UpsProvider::new(client.clone(), url, key);
    let (url, key) = endpoint(Carrier::Dhl);
    let dhl = DhlProvider::new(client.clone(), url, key);
    let (url, key) = endpoint(Carrier::Usps);
    let usps = UspsProvider::new(client, url, key);

    let registry = CarrierRegistry::builder(config.default_carrier)
        .register(Arc::new(fedex))
        .register(Arc::new(ups))
        .register(Arc::new(dhl))
        .register(Arc::new(usps))
        .build()?;

    Ok(registry)
}
