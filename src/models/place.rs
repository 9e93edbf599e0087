//! Place suggestion and detail records exchanged with suggestion sources.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind tag carried by an address component.
///
/// This is the provider's controlled vocabulary. Kinds the normalizer does
/// not care about (`political`, `neighborhood`, ...) collapse into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// House number ("149")
    StreetNumber,
    /// Street name ("Skillman Street")
    Route,
    /// City / town
    Locality,
    /// Borough or district inside a city
    Sublocality,
    /// Postal town (UK and Nordic addresses)
    PostalTown,
    /// State / province
    #[serde(rename = "administrative_area_level_1")]
    AdministrativeAreaLevel1,
    /// County
    #[serde(rename = "administrative_area_level_2")]
    AdministrativeAreaLevel2,
    /// Township / municipality
    #[serde(rename = "administrative_area_level_3")]
    AdministrativeAreaLevel3,
    /// ZIP / postcode
    PostalCode,
    /// Country
    Country,
    /// Any tag outside the vocabulary above
    #[serde(other)]
    Other,
}

impl ComponentKind {
    /// Get the provider tag for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::StreetNumber => "street_number",
            ComponentKind::Route => "route",
            ComponentKind::Locality => "locality",
            ComponentKind::Sublocality => "sublocality",
            ComponentKind::PostalTown => "postal_town",
            ComponentKind::AdministrativeAreaLevel1 => "administrative_area_level_1",
            ComponentKind::AdministrativeAreaLevel2 => "administrative_area_level_2",
            ComponentKind::AdministrativeAreaLevel3 => "administrative_area_level_3",
            ComponentKind::PostalCode => "postal_code",
            ComponentKind::Country => "country",
            ComponentKind::Other => "other",
        }
    }

    /// Parse a provider tag. Unknown tags map to `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "street_number" => ComponentKind::StreetNumber,
            "route" => ComponentKind::Route,
            "locality" => ComponentKind::Locality,
            "sublocality" => ComponentKind::Sublocality,
            "postal_town" => ComponentKind::PostalTown,
            "administrative_area_level_1" => ComponentKind::AdministrativeAreaLevel1,
            "administrative_area_level_2" => ComponentKind::AdministrativeAreaLevel2,
            "administrative_area_level_3" => ComponentKind::AdministrativeAreaLevel3,
            "postal_code" => ComponentKind::PostalCode,
            "country" => ComponentKind::Country,
            _ => ComponentKind::Other,
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One itemized piece of an address as reported by a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComponent {
    pub long_name: String,
    pub short_name: String,
    pub kinds: BTreeSet<ComponentKind>,
}

impl RawComponent {
    pub fn new(long_name: &str, short_name: &str, kinds: &[ComponentKind]) -> Self {
        Self {
            long_name: long_name.to_string(),
            short_name: short_name.to_string(),
            kinds: kinds.iter().copied().collect(),
        }
    }

    pub fn has_kind(&self, kind: ComponentKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Fully itemized address record for a chosen suggestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceDetail {
    pub formatted_label: String,
    #[serde(default)]
    pub components: Vec<RawComponent>,
}

/// Label-only candidate shown while the user is typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    /// Opaque, source-specific identifier
    pub id: String,

    /// Display text
    pub label: String,

    /// True when the components are already known locally and no detail
    /// fetch is needed on selection
    pub has_detail: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_deserializes_unknown_kinds_as_other() {
        let json = r#"{
            "long_name": "Kings County",
            "short_name": "Kings County",
            "kinds": ["administrative_area_level_2", "political"]
        }"#;

        let component: RawComponent = serde_json::from_str(json).unwrap();
        assert!(component.has_kind(ComponentKind::AdministrativeAreaLevel2));
        assert!(component.has_kind(ComponentKind::Other));
        assert_eq!(component.kinds.len(), 2);
    }

    #[test]
    fn test_kind_tag_mapping() {
        for kind in [
            ComponentKind::StreetNumber,
            ComponentKind::Route,
            ComponentKind::PostalTown,
            ComponentKind::AdministrativeAreaLevel1,
            ComponentKind::AdministrativeAreaLevel3,
        ] {
            assert_eq!(ComponentKind::from_tag(kind.as_str()), kind);
        }
        assert_eq!(ComponentKind::from_tag("premise"), ComponentKind::Other);
    }
}
