//! HTTP client for the places provider.
//!
//! Wraps `reqwest` with credential handling, status checking, and typed
//! response deserialization. Every endpoint inspects the `"status"` field of
//! the JSON envelope and surfaces provider-level failures as
//! [`LookupError::Status`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::types::{
    AutocompleteResponse, DetailsResponse, SessionResponse, STATUS_OK, STATUS_ZERO_RESULTS,
};
use crate::config::ProviderConfig;
use crate::error::{LookupError, Result};
use crate::models::{PlaceDetail, PlaceSuggestion};

const SESSION_PATH: &str = "place/session/json";
const AUTOCOMPLETE_PATH: &str = "place/autocomplete/json";
const DETAILS_PATH: &str = "place/details/json";
const DETAIL_FIELDS: &str = "formatted_address,address_component";

/// Client for the provider's place-search endpoints
#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    region: String,
}

impl PlacesClient {
    /// Create a client from provider configuration.
    ///
    /// Fails with [`LookupError::Configuration`] when no credential is set,
    /// before any network activity.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config.credential().ok_or_else(|| {
            LookupError::Configuration("no places API key configured".to_string())
        })?;

        let client = Client::builder()
            .user_agent("Larch/0.1 (address lookup)")
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        // Trailing slash so `join` appends to the base path instead of
        // replacing its last segment.
        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            LookupError::Configuration(format!("invalid base URL '{}': {}", config.base_url, e))
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url,
            region: config.region.to_lowercase(),
        })
    }

    /// Provisioning call: validates the credential and opens a lookup session.
    ///
    /// Returns the session token attached to every later query.
    pub async fn open_session(&self) -> Result<String> {
        let url = self.build_url(SESSION_PATH, &[]);
        let response: SessionResponse = self
            .get_json(url, "session")
            .await
            .map_err(|e| LookupError::Provisioning(e.to_string()))?;

        if response.status != STATUS_OK {
            return Err(LookupError::Provisioning(format!(
                "{}: {}",
                response.status,
                response.error_message.unwrap_or_default()
            )));
        }

        response
            .session_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| LookupError::Provisioning("no session token returned".to_string()))
    }

    /// Address-only suggestions for `input`, restricted to the configured region
    pub async fn autocomplete(&self, session_token: &str, input: &str) -> Result<Vec<PlaceSuggestion>> {
        let components = format!("country:{}", self.region);
        let url = self.build_url(
            AUTOCOMPLETE_PATH,
            &[
                ("input", input),
                ("types", "address"),
                ("components", &components),
                ("sessiontoken", session_token),
            ],
        );

        let response: AutocompleteResponse = self
            .get_json(url, &format!("autocomplete(input={:?})", input))
            .await?;
        check_status("autocomplete", &response.status, response.error_message)?;

        debug!(
            "Provider returned {} predictions for {:?}",
            response.predictions.len(),
            input
        );

        Ok(response
            .predictions
            .into_iter()
            .map(|prediction| PlaceSuggestion {
                id: prediction.place_id,
                label: prediction.description,
                has_detail: false,
            })
            .collect())
    }

    /// Formatted label and full component list for a place id
    pub async fn details(&self, session_token: &str, place_id: &str) -> Result<PlaceDetail> {
        let url = self.build_url(
            DETAILS_PATH,
            &[
                ("place_id", place_id),
                ("fields", DETAIL_FIELDS),
                ("sessiontoken", session_token),
            ],
        );

        let response: DetailsResponse = self
            .get_json(url, &format!("details(place_id={})", place_id))
            .await?;
        check_status("details", &response.status, response.error_message)?;

        response
            .result
            .map(PlaceDetail::from)
            .ok_or_else(|| LookupError::UnknownPlace(place_id.to_string()))
    }

    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path.split('/'));
        }
        url.query_pairs_mut()
            .extend_pairs(params.iter().copied())
            .append_pair("key", &self.api_key);
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| LookupError::Deserialize {
            context: context.to_string(),
            source: Arc::new(e),
        })
    }
}

fn check_status(operation: &'static str, status: &str, message: Option<String>) -> Result<()> {
    if status == STATUS_OK || status == STATUS_ZERO_RESULTS {
        return Ok(());
    }

    Err(LookupError::Status {
        operation,
        status: status.to_string(),
        message: message.unwrap_or_default(),
    })
}

/// A provisioned provider: client plus the session opened for it.
#[derive(Clone)]
pub struct Provider {
    client: PlacesClient,
    session_token: Arc<str>,
}

impl Provider {
    pub fn new(client: PlacesClient, session_token: &str) -> Self {
        Self {
            client,
            session_token: Arc::from(session_token),
        }
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    pub async fn suggest(&self, input: &str) -> Result<Vec<PlaceSuggestion>> {
        self.client.autocomplete(&self.session_token, input).await
    }

    pub async fn details(&self, place_id: &str) -> Result<PlaceDetail> {
        self.client.details(&self.session_token, place_id).await
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("base_url", &self.client.base_url.as_str())
            .field("region", &self.client.region)
            .finish_non_exhaustive()
    }
}
