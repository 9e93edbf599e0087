//! Larch - address lookup and normalization for form front-ends
//!
//! Search-as-you-type suggestions from a remote places provider with a local
//! fallback catalogue, on-demand detail resolution, and normalization into a
//! canonical street/city/state/zip record.

pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod provider;
pub mod session;
pub mod source;

pub use error::LookupError;
pub use models::{CanonicalAddress, ComponentKind, PlaceDetail, PlaceSuggestion, RawComponent};
pub use normalize::normalize_address;
pub use session::{ActivationTarget, AutocompleteSession, FormBinding, SessionState, TextField};
pub use source::{SearchOutcome, SourcePolicy, SuggestionSource};
