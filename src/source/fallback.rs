//! Local static catalogue used when the remote provider is unavailable.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::LookupError;
use crate::models::{ComponentKind, PlaceDetail, PlaceSuggestion, RawComponent};

use crate::models::ComponentKind::{
    AdministrativeAreaLevel1 as State, Country, Locality, PostalCode, Route, StreetNumber,
    Sublocality,
};

/// A fully itemized catalogue record
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueEntry {
    pub id: String,
    #[serde(flatten)]
    pub detail: PlaceDetail,
}

#[derive(Debug, Deserialize)]
struct CatalogueFile {
    #[serde(default, rename = "place")]
    places: Vec<CatalogueEntry>,
}

/// Suggestion source backed by an in-memory catalogue.
///
/// Every entry carries its components inline, so suggestions are returned
/// with `has_detail = true` and detail lookups never touch the network.
#[derive(Debug, Clone)]
pub struct FallbackSource {
    entries: Arc<Vec<CatalogueEntry>>,
}

impl FallbackSource {
    pub fn new(entries: Vec<CatalogueEntry>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Load a TOML catalogue of `[[place]]` entries
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read fallback catalogue {}", path.display()))?;
        let file: CatalogueFile =
            toml::from_str(&content).context("Failed to parse fallback catalogue")?;

        info!(
            "Loaded {} fallback places from {}",
            file.places.len(),
            path.display()
        );
        Ok(Self::new(file.places))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive substring match against each entry's label and
    /// component long names. Results keep catalogue order.
    pub fn search(&self, query: &str) -> Vec<PlaceSuggestion> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let matches: Vec<PlaceSuggestion> = self
            .entries
            .iter()
            .filter(|entry| entry_matches(entry, &needle))
            .map(|entry| PlaceSuggestion {
                id: entry.id.clone(),
                label: entry.detail.formatted_label.clone(),
                has_detail: true,
            })
            .collect();

        debug!("Fallback catalogue matched {} places for {:?}", matches.len(), query);
        matches
    }

    /// Inline detail for a catalogue id
    pub fn detail(&self, id: &str) -> Result<PlaceDetail, LookupError> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.detail.clone())
            .ok_or_else(|| LookupError::UnknownPlace(id.to_string()))
    }
}

fn entry_matches(entry: &CatalogueEntry, needle: &str) -> bool {
    entry.detail.formatted_label.to_lowercase().contains(needle)
        || entry
            .detail
            .components
            .iter()
            .any(|c| c.long_name.to_lowercase().contains(needle))
}

impl Default for FallbackSource {
    /// Built-in catalogue
    fn default() -> Self {
        Self::new(vec![
            entry(
                "fallback:149-skillman",
                "149 Skillman Street, Brooklyn, NY 11205, USA",
                &[
                    ("149", "149", StreetNumber),
                    ("Skillman Street", "Skillman St", Route),
                    ("Brooklyn", "Brooklyn", Locality),
                    ("New York", "NY", State),
                    ("United States", "US", Country),
                    ("11205", "11205", PostalCode),
                ],
            ),
            entry(
                "fallback:350-fifth",
                "350 Fifth Avenue, New York, NY 10118, USA",
                &[
                    ("350", "350", StreetNumber),
                    ("Fifth Avenue", "5th Ave", Route),
                    ("Manhattan", "Manhattan", Sublocality),
                    ("New York", "New York", Locality),
                    ("New York", "NY", State),
                    ("United States", "US", Country),
                    ("10118", "10118", PostalCode),
                ],
            ),
            entry(
                "fallback:1600-pennsylvania",
                "1600 Pennsylvania Avenue NW, Washington, DC 20500, USA",
                &[
                    ("1600", "1600", StreetNumber),
                    ("Pennsylvania Avenue Northwest", "Pennsylvania Ave NW", Route),
                    ("Washington", "Washington", Locality),
                    ("District of Columbia", "DC", State),
                    ("United States", "US", Country),
                    ("20500", "20500", PostalCode),
                ],
            ),
            entry(
                "fallback:233-wacker",
                "233 South Wacker Drive, Chicago, IL 60606, USA",
                &[
                    ("233", "233", StreetNumber),
                    ("South Wacker Drive", "S Wacker Dr", Route),
                    ("Chicago", "Chicago", Locality),
                    ("Illinois", "IL", State),
                    ("United States", "US", Country),
                    ("60606", "60606", PostalCode),
                ],
            ),
            entry(
                "fallback:100-main",
                "100 Main Street, Los Angeles, CA 90012, USA",
                &[
                    ("100", "100", StreetNumber),
                    ("Main Street", "Main St", Route),
                    ("Los Angeles", "Los Angeles", Locality),
                    ("California", "CA", State),
                    ("United States", "US", Country),
                    ("90012", "90012", PostalCode),
                ],
            ),
        ])
    }
}

fn entry(id: &str, label: &str, components: &[(&str, &str, ComponentKind)]) -> CatalogueEntry {
    CatalogueEntry {
        id: id.to_string(),
        detail: PlaceDetail {
            formatted_label: label.to_string(),
            components: components
                .iter()
                .map(|(long, short, kind)| RawComponent::new(long, short, &[*kind]))
                .collect(),
        },
    }
}
