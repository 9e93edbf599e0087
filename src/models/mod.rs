//! Core data models for address lookup.

pub mod address;
pub mod place;

pub use address::CanonicalAddress;
pub use place::{ComponentKind, PlaceDetail, PlaceSuggestion, RawComponent};
