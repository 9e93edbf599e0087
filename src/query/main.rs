//! Lookup server for address forms.
//!
//! Provides an HTTP API for search-as-you-type suggestions and for turning a
//! chosen suggestion into a canonical address.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use larch::config::Config;
use larch::provider::ReadinessState;
use larch::source::SourceKind;
use larch::{CanonicalAddress, PlaceSuggestion, SearchOutcome, SourcePolicy};

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Address lookup server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Application state shared across handlers
struct AppState {
    policy: SourcePolicy,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Larch Lookup Server");

    let config = Config::load(args.config.as_deref())?;
    let policy = SourcePolicy::from_config(&config)?;
    info!("Primary suggestion source: {:?}", policy.primary_kind());

    let state = Arc::new(AppState { policy });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/autocomplete", get(autocomplete_handler))
        .route("/v1/place", get(place_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let provider = state.policy.provider_state();

    Json(HealthResponse {
        status: match provider {
            Some(ReadinessState::Failed) => "degraded",
            _ => "ok",
        },
        source: state.policy.primary_kind(),
        provider: provider.map(|s| format!("{:?}", s).to_lowercase()),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<String>,
}

/// Suggestions for the text typed so far
async fn autocomplete_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AutocompleteParams>,
) -> Json<SearchOutcome> {
    Json(state.policy.search(&params.text).await)
}

/// Canonical address for a chosen suggestion; degrades instead of failing
async fn place_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlaceParams>,
) -> Json<CanonicalAddress> {
    let suggestion = PlaceSuggestion {
        id: params.id,
        label: params.label.unwrap_or_default(),
        has_detail: params.has_detail,
    };

    Json(state.policy.lookup_address(&suggestion).await)
}

#[derive(Deserialize)]
struct AutocompleteParams {
    /// Search text
    text: String,
}

#[derive(Deserialize)]
struct PlaceParams {
    /// Suggestion id from /v1/autocomplete
    id: String,
    /// Suggestion label, used as the street if the detail fetch fails
    label: Option<String>,
    /// Whether the suggestion came with inline components
    #[serde(default)]
    has_detail: bool,
}
