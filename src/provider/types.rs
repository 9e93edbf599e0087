//! Wire types for the places provider's JSON API.

use serde::Deserialize;

use crate::models::{ComponentKind, PlaceDetail, RawComponent};

pub const STATUS_OK: &str = "OK";
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    pub status: String,
    #[serde(default)]
    pub session_token: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteResponse {
    pub status: String,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Prediction {
    pub place_id: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<DetailsResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsResult {
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

/// Component as the provider spells it (`types` rather than `kinds`).
#[derive(Debug, Deserialize)]
pub struct AddressComponent {
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl From<AddressComponent> for RawComponent {
    fn from(component: AddressComponent) -> Self {
        Self {
            long_name: component.long_name,
            short_name: component.short_name,
            kinds: component
                .types
                .iter()
                .map(|tag| ComponentKind::from_tag(tag))
                .collect(),
        }
    }
}

impl From<DetailsResult> for PlaceDetail {
    fn from(result: DetailsResult) -> Self {
        Self {
            formatted_label: result.formatted_address,
            components: result
                .address_components
                .into_iter()
                .map(RawComponent::from)
                .collect(),
        }
    }
}
