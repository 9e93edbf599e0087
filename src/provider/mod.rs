//! Remote places provider: HTTP client and one-time provisioning.

mod client;
mod loader;
pub mod types;

pub use client::{PlacesClient, Provider};
pub use loader::{ProviderLoader, ReadinessState};
