//! Carrier abstraction: the provider trait and the registry that selects one.
//!
//! Concrete providers live in [`crate::infrastructure::carriers`]; this module
//! only defines the contract and the lookup.

pub mod provider;
pub mod registry;

pub use provider::CarrierProvider;
pub use registry::{CarrierRegistry, CarrierRegistryBuilder};

#[cfg(test)]
pub use provider::MockCarrierProvider;
