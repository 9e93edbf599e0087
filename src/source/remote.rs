//! Suggestion source backed by the remote places provider.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::models::{PlaceDetail, PlaceSuggestion};
use crate::provider::ProviderLoader;

/// Remote lookups; every call first waits for the provider to be ready
#[derive(Clone)]
pub struct RemoteSource {
    loader: Arc<ProviderLoader>,
}

impl RemoteSource {
    pub fn new(loader: Arc<ProviderLoader>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &Arc<ProviderLoader> {
        &self.loader
    }

    /// Label-only suggestions; components are fetched on selection
    pub async fn search(&self, query: &str) -> Result<Vec<PlaceSuggestion>> {
        let provider = self.loader.ensure_ready().await?;
        debug!("Remote search for {:?}", query);
        provider.suggest(query).await
    }

    pub async fn resolve_details(&self, id: &str) -> Result<PlaceDetail> {
        let provider = self.loader.ensure_ready().await?;
        debug!("Remote detail fetch for {}", id);
        provider.details(id).await
    }
}
