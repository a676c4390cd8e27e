//! Immutable carrier registry.
//!
//! Built once at startup and shared through [`crate::state::AppState`]:
//!
//! ```rust,ignore
//! let registry = CarrierRegistry::builder(Carrier::Fedex)
//!     .register(Arc::new(FedexProvider::new(client.clone(), fedex_url, fedex_token)))
//!     .register(Arc::new(UpsProvider::new(client, ups_url, ups_token)))
//!     .build()?;
//!
//! let provider = registry.resolve(Some("ups"))?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::carriers::CarrierProvider;
use crate::domain::entities::Carrier;
use crate::domain::errors::TrackingError;

/// Maps carrier identifiers to provider instances.
///
/// There is no runtime registration: once built the map never changes, so
/// lookups need no locking.
pub struct CarrierRegistry {
    providers: HashMap<Carrier, Arc<dyn CarrierProvider>>,
    default_carrier: Carrier,
}

impl CarrierRegistry {
    /// Starts building a registry whose fallback carrier is `default_carrier`.
    pub fn builder(default_carrier: Carrier) -> CarrierRegistryBuilder {
        CarrierRegistryBuilder {
            providers: HashMap::new(),
            default_carrier,
        }
    }

    /// Resolves a caller-supplied carrier identifier to its provider.
    ///
    /// An absent or blank identifier selects the default carrier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::UnknownCarrier`] if the identifier is not a
    /// supported carrier or the carrier has no registered provider.
    pub fn resolve(
        &self,
        carrier_id: Option<&str>,
    ) -> Result<Arc<dyn CarrierProvider>, TrackingError> {
        let carrier = match carrier_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id
                .parse::<Carrier>()
                .map_err(|e| TrackingError::UnknownCarrier(e.0))?,
            None => self.default_carrier,
        };

        self.providers
            .get(&carrier)
            .cloned()
            .ok_or_else(|| TrackingError::UnknownCarrier(carrier.to_string()))
    }

    /// Returns the carrier used when a request names none.
    pub fn default_carrier(&self) -> Carrier {
        self.default_carrier
    }

    /// Lists registered carriers in stable order.
    pub fn carriers(&self) -> Vec<Carrier> {
        let mut carriers: Vec<Carrier> = self.providers.keys().copied().collect();
        carriers.sort();
        carriers
    }
}

/// Builder for [`CarrierRegistry`].
pub struct CarrierRegistryBuilder {
    providers: HashMap<Carrier, Arc<dyn CarrierProvider>>,
    default_carrier: Carrier,
}

impl CarrierRegistryBuilder {
    /// Registers a provider under the carrier it reports.
    ///
    /// A later registration for the same carrier replaces the earlier one.
    pub fn register(mut self, provider: Arc<dyn CarrierProvider>) -> Self {
        self.providers.insert(provider.carrier(), provider);
        self
    }

    /// Finishes the registry.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::UnknownCarrier`] if the default carrier has no
    /// registered provider.
    pub fn build(self) -> Result<CarrierRegistry, TrackingError> {
        if !self.providers.contains_key(&self.default_carrier) {
            return Err(TrackingError::UnknownCarrier(
                self.default_carrier.to_string(),
            ));
        }

        Ok(CarrierRegistry {
            providers: self.providers,
            default_carrier: self.default_carrier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::carriers::MockCarrierProvider;

    fn mock_for(carrier: Carrier) -> Arc<dyn CarrierProvider> {
        let mut mock = MockCarrierProvider::new();
        mock.expect_carrier().return_const(carrier);
        // resolve must never reach the network
        mock.expect_track().times(0);
        Arc::new(mock)
    }

    fn registry() -> CarrierRegistry {
        CarrierRegistry::builder(Carrier::Fedex)
            .register(mock_for(Carrier::Fedex))
            .register(mock_for(Carrier::Ups))
            .build()
            .unwrap()
    }

    #[test]
    fn test_resolve_named_carrier() {
        let provider = registry().resolve(Some("ups")).unwrap();
        assert_eq!(provider.carrier(), Carrier::Ups);
    }

    #[test]
    fn test_resolve_defaults_when_absent_or_blank() {
        let registry = registry();
        assert_eq!(registry.resolve(None).unwrap().carrier(), Carrier::Fedex);
        assert_eq!(registry.resolve(Some("  ")).unwrap().carrier(), Carrier::Fedex);
    }

    #[test]
    fn test_resolve_unknown_identifier() {
        let err = registry().resolve(Some("pigeon-post")).err().unwrap();
        assert!(matches!(err, TrackingError::UnknownCarrier(id) if id == "pigeon-post"));
    }

    #[test]
    fn test_resolve_supported_but_unregistered() {
        let err = registry().resolve(Some("dhl")).err().unwrap();
        assert!(matches!(err, TrackingError::UnknownCarrier(id) if id == "dhl"));
    }

    #[test]
    fn test_build_requires_default_provider() {
        let result = CarrierRegistry::builder(Carrier::Usps)
            .register(mock_for(Carrier::Fedex))
            .build();
        assert!(matches!(result, Err(TrackingError::UnknownCarrier(_))));
    }

    #[test]
    fn test_carriers_sorted() {
        let registry = CarrierRegistry::builder(Carrier::Ups)
            .register(mock_for(Carrier::Usps))
            .register(mock_for(Carrier::Ups))
            .register(mock_for(Carrier::Fedex))
            .build()
            .unwrap();
        assert_eq!(
            registry.carriers(),
            vec![Carrier::Fedex, Carrier::Ups, Carrier::Usps]
        );
        assert_eq!(registry.default_carrier(), Carrier::Ups);
    }
}
