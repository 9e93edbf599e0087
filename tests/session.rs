//! End-to-end autocomplete session tests against a mocked provider.

use std::sync::Arc;
use std::time::Duration;

use larch::config::ProviderConfig;
use larch::provider::ProviderLoader;
use larch::source::{FallbackSource, FALLBACK_ADVISORY};
use larch::{AutocompleteSession, CanonicalAddress, SessionState, SourcePolicy, TextField};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn remote_session(server: &MockServer) -> AutocompleteSession<TextField> {
    Mock::given(method("GET"))
        .and(path("/place/session/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "OK", "session_token": "tok-1" })),
        )
        .mount(server)
        .await;

    let config = ProviderConfig {
        api_key: Some("test-key".into()),
        base_url: server.uri(),
        timeout_secs: 5,
        ..Default::default()
    };
    let loader = Arc::new(ProviderLoader::new(config.clone()));
    let policy = SourcePolicy::new(&config, loader, FallbackSource::default());
    AutocompleteSession::new(policy, TextField::default())
}

async fn mount_predictions(server: &MockServer, input: &str, predictions: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/place/autocomplete/json"))
        .and(query_param("input", input))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "OK", "predictions": predictions })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn selecting_remote_suggestion_fetches_and_normalizes_detail() {
    let server = MockServer::start().await;
    let mut session = remote_session(&server).await;

    mount_predictions(
        &server,
        "149 Skillman",
        serde_json::json!([{ "place_id": "ChIJ-skillman", "description": "149 Skillman Street, Brooklyn, NY, USA" }]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .and(query_param("place_id", "ChIJ-skillman"))
        .and(query_param("fields", "formatted_address,address_component"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": {
                "formatted_address": "149 Skillman St, Brooklyn, NY 11205, USA",
                "address_components": [
                    { "long_name": "149", "short_name": "149", "types": ["street_number"] },
                    { "long_name": "Skillman Street", "short_name": "Skillman St", "types": ["route"] },
                    { "long_name": "Brooklyn", "short_name": "Brooklyn", "types": ["locality", "political"] },
                    { "long_name": "Kings County", "short_name": "Kings County", "types": ["administrative_area_level_2", "political"] },
                    { "long_name": "New York", "short_name": "NY", "types": ["administrative_area_level_1", "political"] },
                    { "long_name": "United States", "short_name": "US", "types": ["country", "political"] },
                    { "long_name": "11205", "short_name": "11205", "types": ["postal_code"] }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(session.type_text("149 Skillman").await);
    assert_eq!(session.state(), SessionState::ShowingSuggestions);
    assert!(!session.suggestions()[0].has_detail);

    let address = session.select(0).await.expect("index 0 exists");
    assert_eq!(
        address,
        CanonicalAddress {
            street: "149 Skillman Street".into(),
            city: "Brooklyn".into(),
            state: "NY".into(),
            zip: "11205".into(),
        }
    );
    assert_eq!(session.state(), SessionState::Idle);
    assert!(!session.is_open());
    assert_eq!(session.field().resolved.as_ref(), Some(&address));
}

#[tokio::test]
async fn failed_detail_fetch_degrades_to_label() {
    let server = MockServer::start().await;
    let mut session = remote_session(&server).await;

    mount_predictions(
        &server,
        "12 Main",
        serde_json::json!([{ "place_id": "ChIJ-main", "description": "12 Main Street, Springfield, IL, USA" }]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(session.type_text("12 Main").await);
    let address = session.select(0).await.expect("selection never dead-ends");

    assert_eq!(
        address,
        CanonicalAddress::from_label("12 Main Street, Springfield, IL, USA")
    );
    assert_eq!(session.field().value, "12 Main Street, Springfield, IL, USA");
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn failing_remote_search_shows_fallback_results() {
    let server = MockServer::start().await;
    let mut session = remote_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/place/autocomplete/json"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    assert!(session.type_text("Pennsylvania").await);

    assert_eq!(session.state(), SessionState::ShowingSuggestions);
    assert_eq!(session.advisory(), Some(FALLBACK_ADVISORY));
    assert_eq!(session.suggestions().len(), 1);
    assert!(session.suggestions()[0].has_detail);

    // Inline fallback entries resolve without a detail request
    let address = session.select(0).await.expect("fallback suggestion");
    assert_eq!(address.city, "Washington");
    assert_eq!(address.state, "DC");
}

#[tokio::test]
async fn delayed_stale_response_does_not_overwrite_latest() {
    let server = MockServer::start().await;
    let mut session = remote_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/place/autocomplete/json"))
        .and(query_param("input", "12 Main"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "status": "OK",
                    "predictions": [
                        { "place_id": "stale-1", "description": "12 Main Street" },
                        { "place_id": "stale-2", "description": "12 Main Avenue" }
                    ]
                }))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    mount_predictions(
        &server,
        "123 Main",
        serde_json::json!([{ "place_id": "fresh", "description": "123 Main Street" }]),
    )
    .await;

    let first = session.input("12 Main").expect("long enough");
    let second = session.input("123 Main").expect("long enough");

    let stale = tokio::spawn(first.run());
    let fresh = second.run().await;
    assert!(session.apply(fresh));

    let stale = stale.await.expect("task completes");
    assert!(!session.apply(stale));

    assert_eq!(session.suggestions().len(), 1);
    assert_eq!(session.suggestions()[0].id, "fresh");
    assert_eq!(session.field().value, "123 Main");
}

#[tokio::test]
async fn short_input_never_queries_provider() {
    let server = MockServer::start().await;
    let mut session = remote_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/place/autocomplete/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for text in ["", "1", "14", " 1 "] {
        assert!(!session.type_text(text).await);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.suggestions().is_empty());
    }
}
