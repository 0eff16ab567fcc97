//! HTTP provider clients against a local mock of the upstream APIs

use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use weathermail::config::{IdentityConfig, WeatherConfig};
use weathermail::{
    GithubIdentityClient, IdentityProvider, NotifyError, OpenWeatherClient, ResolvedLocation,
    WeatherProvider, WeatherSnapshot,
};

const TOKEN: &str = "test-token";
const API_KEY: &str = "test-key";

async fn user(Path(handle): Path<String>, headers: HeaderMap) -> Response {
    let expected = format!("token {TOKEN}");
    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some(expected.as_str());
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match handle.as_str() {
        "alice" => Json(json!({
            "login": "alice",
            "email": "alice@example.com",
            "location": "Paris, France"
        }))
        .into_response(),
        "bob" => Json(json!({"login": "bob", "email": null, "location": null})).into_response(),
        "broken" => StatusCode::BAD_GATEWAY.into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"}))).into_response(),
    }
}

async fn current_weather(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("appid").map(String::as_str) != Some(API_KEY) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"cod": 401}))).into_response();
    }
    if params.get("units").map(String::as_str) != Some("metric") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    match params.get("q").map(String::as_str) {
        Some("Paris,FR") => Json(json!({
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}],
            "main": {"temp": 18.25, "humidity": 60},
            "name": "Paris"
        }))
        .into_response(),
        Some("São Paulo,BR") => Json(json!({
            "weather": [{"id": 500, "main": "Rain"}],
            "main": {"temp": 24.0}
        }))
        .into_response(),
        Some("Empty") => Json(json!({"weather": [], "main": {"temp": 1.0}})).into_response(),
        Some("Garbage") => "not json".into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"cod": "404"}))).into_response(),
    }
}

/// Full error text including every source in the chain
fn error_chain(err: &NotifyError) -> String {
    let mut text = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        text.push_str(" | ");
        text.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    text
}

async fn closed_port() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/users/{handle}", get(user))
        .route("/data/2.5/weather", get(current_weather));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn identity_client(base: &str, token: Option<&str>) -> GithubIdentityClient {
    GithubIdentityClient::new(&IdentityConfig {
        base_url: format!("{base}/users"),
        token: token.map(str::to_string),
        timeout_seconds: 5,
        ..IdentityConfig::default()
    })
    .unwrap()
}

fn weather_client(base: &str, api_key: Option<&str>) -> OpenWeatherClient {
    OpenWeatherClient::new(&WeatherConfig {
        base_url: format!("{base}/data/2.5/weather"),
        api_key: api_key.map(str::to_string),
        timeout_seconds: 5,
        ..WeatherConfig::default()
    })
    .unwrap()
}

fn lookup_cause(err: &NotifyError) -> String {
    match err {
        NotifyError::IdentityLookupFailed { source, .. } => source.to_string(),
        other => panic!("expected an identity lookup failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_identity_returns_profile() {
    let base = spawn_upstream().await;
    let client = identity_client(&base, Some(TOKEN));

    let profile = client.fetch_profile("alice").await.unwrap();
    assert_eq!(profile.handle, "alice");
    assert_eq!(profile.email.as_deref(), Some("alice@example.com"));
    assert_eq!(profile.raw_location.as_deref(), Some("Paris, France"));
}

#[tokio::test]
async fn test_identity_profile_without_email() {
    let base = spawn_upstream().await;
    let client = identity_client(&base, Some(TOKEN));

    let profile = client.fetch_profile("bob").await.unwrap();
    assert!(profile.email.is_none());

    let err = weathermail::identity::resolve(&client, "bob").await.unwrap_err();
    assert!(matches!(err, NotifyError::MissingContactInfo { .. }));
}

#[tokio::test]
async fn test_identity_unknown_user() {
    let base = spawn_upstream().await;
    let client = identity_client(&base, Some(TOKEN));

    let err = client.fetch_profile("ghost").await.unwrap_err();
    assert_eq!(lookup_cause(&err), "user not found");
}

#[tokio::test]
async fn test_identity_rejected_credentials() {
    let base = spawn_upstream().await;
    let client = identity_client(&base, Some("wrong"));

    let err = client.fetch_profile("alice").await.unwrap_err();
    assert!(lookup_cause(&err).contains("refused credentials"));

    let anonymous = identity_client(&base, None);
    assert!(anonymous.fetch_profile("alice").await.is_err());
}

#[tokio::test]
async fn test_identity_upstream_error() {
    let base = spawn_upstream().await;
    let client = identity_client(&base, Some(TOKEN));

    let err = client.fetch_profile("broken").await.unwrap_err();
    assert!(lookup_cause(&err).contains("502"));
}

#[tokio::test]
async fn test_identity_unreachable() {
    let client = identity_client(&closed_port().await, Some(TOKEN));
    let err = client.fetch_profile("alice").await.unwrap_err();
    assert!(matches!(err, NotifyError::IdentityLookupFailed { .. }));
}

#[tokio::test]
async fn test_weather_current_conditions() {
    let base = spawn_upstream().await;
    let client = weather_client(&base, Some(API_KEY));

    let paris = ResolvedLocation::with_country("Paris", "FR");
    let snapshot = weathermail::weather::fetch(&client, &paris).await.unwrap();
    assert_eq!(snapshot, WeatherSnapshot::new("Clear", 18.25));
    assert_eq!(snapshot.format_temperature(), "18.25");
}

#[tokio::test]
async fn test_weather_query_is_url_encoded() {
    let base = spawn_upstream().await;
    let client = weather_client(&base, Some(API_KEY));

    let snapshot = client.current("São Paulo,BR").await.unwrap();
    assert_eq!(snapshot.condition, "Rain");
    assert_eq!(snapshot.format_temperature(), "24");
}

#[tokio::test]
async fn test_weather_failures() {
    let base = spawn_upstream().await;
    let client = weather_client(&base, Some(API_KEY));

    for query in ["Atlantis", "Empty", "Garbage"] {
        let err = client.current(query).await.unwrap_err();
        assert!(
            matches!(err, NotifyError::WeatherProviderFailed { .. }),
            "{query}: {err:?}"
        );
    }

    let unauthenticated = weather_client(&base, None);
    assert!(unauthenticated.current("Paris,FR").await.is_err());
}

#[tokio::test]
async fn test_weather_unreachable_keeps_api_key_out_of_errors() {
    let client = weather_client(&closed_port().await, Some("SUPERSECRETKEY"));

    let err = client.current("Paris,FR").await.unwrap_err();
    assert!(matches!(err, NotifyError::WeatherProviderFailed { .. }));

    let text = error_chain(&err);
    assert!(text.contains("Paris,FR"));
    assert!(!text.contains("SUPERSECRETKEY"), "{text}");
    assert!(!format!("{err:?}").contains("SUPERSECRETKEY"));
}

#[tokio::test]
async fn test_weather_bad_body_keeps_api_key_out_of_errors() {
    let base = spawn_upstream().await;
    let client = weather_client(&base, Some(API_KEY));

    let err = client.current("Garbage").await.unwrap_err();
    let text = error_chain(&err);
    assert!(!text.contains(API_KEY), "{text}");
    assert!(!format!("{err:?}").contains(API_KEY));
}
