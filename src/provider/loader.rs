//! One-time provisioning of the places provider.
//!
//! The loader is a small state machine shared by every autocomplete session
//! in the process:
//!
//! ```text
//! Unloaded ──▶ Loading(shared future) ──▶ Ready
//!                    │
//!                    └──▶ Failed ──▶ Loading (next call retries)
//! ```
//!
//! Concurrent callers arriving while an attempt is in flight all await the
//! same shared future, so at most one provisioning request is outstanding.
//! Once `Ready` the loader never goes back.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, info, warn};

use super::client::{PlacesClient, Provider};
use crate::config::ProviderConfig;
use crate::error::{LookupError, Result};

type ProvisionFuture = Shared<BoxFuture<'static, Result<Provider>>>;

static GLOBAL: OnceLock<Arc<ProviderLoader>> = OnceLock::new();

/// Observable readiness of the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

enum Readiness {
    Unloaded,
    Loading { attempt: u64, future: ProvisionFuture },
    Ready(Provider),
    Failed(LookupError),
}

struct LoaderState {
    readiness: Readiness,
    attempts: u64,
}

/// Provisions the places provider at most once per process
pub struct ProviderLoader {
    config: ProviderConfig,
    state: Mutex<LoaderState>,
}

impl ProviderLoader {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            state: Mutex::new(LoaderState {
                readiness: Readiness::Unloaded,
                attempts: 0,
            }),
        }
    }

    /// The process-wide loader.
    ///
    /// `config` is only used by the first call; later calls get the same
    /// instance regardless of what they pass.
    pub fn global(config: &ProviderConfig) -> Arc<ProviderLoader> {
        GLOBAL
            .get_or_init(|| Arc::new(ProviderLoader::new(config.clone())))
            .clone()
    }

    pub fn state(&self) -> ReadinessState {
        match self.lock().readiness {
            Readiness::Unloaded => ReadinessState::Unloaded,
            Readiness::Loading { .. } => ReadinessState::Loading,
            Readiness::Ready(_) => ReadinessState::Ready,
            Readiness::Failed(_) => ReadinessState::Failed,
        }
    }

    /// Error from the most recent failed attempt, if the loader is `Failed`
    pub fn last_error(&self) -> Option<LookupError> {
        match &self.lock().readiness {
            Readiness::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Number of provisioning requests issued so far
    pub fn attempts(&self) -> u64 {
        self.lock().attempts
    }

    /// Register a provider that another part of the host already set up.
    ///
    /// Returns `false` if the loader was already `Ready`.
    pub fn install(&self, provider: Provider) -> bool {
        let mut state = self.lock();
        if matches!(state.readiness, Readiness::Ready(_)) {
            return false;
        }

        debug!("Using pre-provisioned places provider");
        state.readiness = Readiness::Ready(provider);
        true
    }

    /// Resolve once the provider is usable.
    ///
    /// Idempotent and safe to call from any number of concurrent tasks.
    /// A missing credential fails with [`LookupError::Configuration`]
    /// without issuing a request; a failed attempt leaves the loader
    /// `Failed` so the next call retries.
    pub async fn ensure_ready(&self) -> Result<Provider> {
        let (attempt, future) = {
            let mut guard = self.lock();
            let state = &mut *guard;
            match &state.readiness {
                Readiness::Ready(provider) => return Ok(provider.clone()),
                Readiness::Loading { attempt, future } => (*attempt, future.clone()),
                Readiness::Unloaded | Readiness::Failed(_) => {
                    let client = PlacesClient::new(&self.config)?;

                    state.attempts += 1;
                    let attempt = state.attempts;
                    info!("Provisioning places provider (attempt {})", attempt);

                    let future = provision(client).boxed().shared();
                    state.readiness = Readiness::Loading {
                        attempt,
                        future: future.clone(),
                    };
                    (attempt, future)
                }
            }
        };

        let result = future.await;

        // Only the attempt still recorded in the state may settle it; an
        // install() or a newer attempt takes precedence.
        let mut state = self.lock();
        if matches!(state.readiness, Readiness::Loading { attempt: current, .. } if current == attempt)
        {
            state.readiness = match &result {
                Ok(provider) => {
                    info!("Places provider ready");
                    Readiness::Ready(provider.clone())
                }
                Err(err) => {
                    warn!("Places provider failed to load: {}", err);
                    Readiness::Failed(err.clone())
                }
            };
        }

        result
    }

    fn lock(&self) -> MutexGuard<'_, LoaderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn provision(client: PlacesClient) -> Result<Provider> {
    let token = client.open_session().await?;
    Ok(Provider::new(client, &token))
}
