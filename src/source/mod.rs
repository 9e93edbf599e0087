//! Suggestion sources and the policy choosing between them.
//!
//! A query goes to the remote provider when it is enabled and configured.
//! If the remote call fails for any reason the same query is answered from
//! the local fallback catalogue, together with an advisory for the user.
//! The remote source is tried again on the next query.

mod fallback;
mod remote;

pub use fallback::{CatalogueEntry, FallbackSource};
pub use remote::RemoteSource;

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Config, ProviderConfig};
use crate::error::LookupError;
use crate::models::{CanonicalAddress, PlaceDetail, PlaceSuggestion};
use crate::normalize::normalize_address;
use crate::provider::{ProviderLoader, ReadinessState};

/// Queries shorter than this (after trimming) never reach a source
pub const MIN_QUERY_CHARS: usize = 3;

pub const FALLBACK_ADVISORY: &str = "provider unavailable - showing fallback results";

pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Remote,
    Fallback,
}

/// Either of the two suggestion data sources
#[derive(Clone)]
pub enum SuggestionSource {
    Remote(RemoteSource),
    Fallback(FallbackSource),
}

impl SuggestionSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            SuggestionSource::Remote(_) => SourceKind::Remote,
            SuggestionSource::Fallback(_) => SourceKind::Fallback,
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<PlaceSuggestion>, LookupError> {
        match self {
            SuggestionSource::Remote(remote) => remote.search(query).await,
            SuggestionSource::Fallback(fallback) => Ok(fallback.search(query)),
        }
    }

    pub async fn resolve_details(&self, id: &str) -> Result<PlaceDetail, LookupError> {
        match self {
            SuggestionSource::Remote(remote) => remote.resolve_details(id).await,
            SuggestionSource::Fallback(fallback) => fallback.detail(id),
        }
    }
}

/// Suggestions for one query, tagged with the query they answer
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub suggestions: Vec<PlaceSuggestion>,
    pub source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

/// Routes searches and detail lookups to the right source
#[derive(Clone)]
pub struct SourcePolicy {
    primary: SuggestionSource,
    fallback: FallbackSource,
}

impl SourcePolicy {
    /// Remote-first when `config` allows it, fallback-only otherwise
    pub fn new(
        config: &ProviderConfig,
        loader: Arc<ProviderLoader>,
        fallback: FallbackSource,
    ) -> Self {
        if config.remote_enabled() {
            Self {
                primary: SuggestionSource::Remote(RemoteSource::new(loader)),
                fallback,
            }
        } else {
            if !config.enabled {
                info!("Remote provider disabled; using fallback catalogue only");
            } else {
                info!("No places API key configured; using fallback catalogue only");
            }
            Self::fallback_only(fallback)
        }
    }

    pub fn fallback_only(fallback: FallbackSource) -> Self {
        Self {
            primary: SuggestionSource::Fallback(fallback.clone()),
            fallback,
        }
    }

    /// Build from configuration using the process-wide provider loader
    pub fn from_config(config: &Config) -> Result<Self> {
        let fallback = match &config.fallback.catalogue {
            Some(path) => FallbackSource::load_from_file(path)?,
            None => FallbackSource::default(),
        };
        let loader = ProviderLoader::global(&config.provider);
        Ok(Self::new(&config.provider, loader, fallback))
    }

    pub fn primary_kind(&self) -> SourceKind {
        self.primary.kind()
    }

    /// Readiness of the remote provider, `None` in fallback-only mode
    pub fn provider_state(&self) -> Option<ReadinessState> {
        match &self.primary {
            SuggestionSource::Remote(remote) => Some(remote.loader().state()),
            SuggestionSource::Fallback(_) => None,
        }
    }

    /// Suggestions for `query`. Never fails: remote failures degrade to
    /// fallback results plus an advisory.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let mut outcome = SearchOutcome {
            query: query.to_string(),
            suggestions: Vec::new(),
            source: self.primary.kind(),
            advisory: None,
        };

        if !is_searchable(query) {
            return outcome;
        }

        match self.primary.search(query).await {
            Ok(suggestions) => outcome.suggestions = suggestions,
            Err(err) => {
                warn!("Search for {:?} failed, using fallback: {}", query, err);
                outcome.suggestions = self.fallback.search(query);
                outcome.source = SourceKind::Fallback;
                outcome.advisory = Some(FALLBACK_ADVISORY.to_string());
            }
        }

        debug!(
            "{} suggestions for {:?} from {:?}",
            outcome.suggestions.len(),
            query,
            outcome.source
        );
        outcome
    }

    /// Detail for a suggestion; inline suggestions never leave the process
    pub async fn resolve(&self, suggestion: &PlaceSuggestion) -> Result<PlaceDetail, LookupError> {
        if suggestion.has_detail {
            self.fallback.detail(&suggestion.id)
        } else {
            self.primary.resolve_details(&suggestion.id).await
        }
    }

    /// Canonical address for a suggestion. A failed detail fetch degrades
    /// to the suggestion label as the street.
    pub async fn lookup_address(&self, suggestion: &PlaceSuggestion) -> CanonicalAddress {
        match self.resolve(suggestion).await {
            Ok(detail) => normalize_address(&detail),
            Err(err) => {
                warn!(
                    "Detail lookup for {} failed, using label only: {}",
                    suggestion.id, err
                );
                CanonicalAddress::from_label(&suggestion.label)
            }
        }
    }
}
