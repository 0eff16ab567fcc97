//! Trigger endpoint tests, driven through the router without a socket

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;
use weathermail::api::ApiReport;
use weathermail::config::{DispatchConfig, ServerConfig};
use weathermail::{
    EmailJob, IdentityProvider, MailTransport, Notifier, NotifyError, RecipientProfile, Result,
    WeatherProvider, WeatherSnapshot, web,
};

struct Users;

#[async_trait]
impl IdentityProvider for Users {
    async fn fetch_profile(&self, handle: &str) -> Result<RecipientProfile> {
        match handle {
            "alice" => Ok(RecipientProfile::new("alice")
                .with_email("alice@example.com")
                .with_location("Paris, France")),
            "bob" => Ok(RecipientProfile::new("bob")),
            _ => Err(NotifyError::identity_lookup(
                handle,
                anyhow::anyhow!("user not found"),
            )),
        }
    }
}

struct Sunny;

#[async_trait]
impl WeatherProvider for Sunny {
    async fn current(&self, _query: &str) -> Result<WeatherSnapshot> {
        Ok(WeatherSnapshot::new("Clear", 22.0))
    }
}

#[derive(Default)]
struct Outbox(Mutex<Vec<EmailJob>>);

#[async_trait]
impl MailTransport for Outbox {
    async fn send(&self, job: &EmailJob) -> anyhow::Result<()> {
        self.0.lock().unwrap().push(job.clone());
        Ok(())
    }
}

fn app(outbox: Arc<Outbox>) -> axum::Router {
    let notifier = Notifier::new(Users, Sunny, outbox, &DispatchConfig::default());
    web::app(&ServerConfig::default(), notifier)
}

fn send_email(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/send-email")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app(Arc::default())
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_send_email_reports_each_recipient() {
    let outbox = Arc::new(Outbox::default());
    let response = app(Arc::clone(&outbox))
        .oneshot(send_email(json!({
            "message": "Hi",
            "usernames": "alice, bob, ghost"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let report: ApiReport = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(report.dispatched, 1);
    assert_eq!(report.failed, 2);

    let alice = &report.recipients[0];
    assert_eq!(alice.handle, "alice");
    assert_eq!(alice.status, "dispatched");
    assert_eq!(alice.weather.as_deref(), Some("fetched"));

    let bob = &report.recipients[1];
    assert_eq!(bob.status, "failed");
    assert_eq!(bob.reason.as_deref(), Some("missing_contact_info"));

    let ghost = &report.recipients[2];
    assert_eq!(ghost.reason.as_deref(), Some("identity_lookup_failed"));

    let sent = outbox.0.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].locals.weather_main, "Clear");
    assert_eq!(sent[0].locals.weather_temp, "22");
}

#[rstest]
#[case::empty_list(json!({"message": "Hi", "usernames": ""}))]
#[case::only_separators(json!({"message": "Hi", "usernames": " , ,"}))]
#[case::empty_message(json!({"message": "  ", "usernames": "alice"}))]
#[tokio::test]
async fn test_send_email_rejects_invalid_request(#[case] body: Value) {
    let outbox = Arc::new(Outbox::default());
    let response = app(Arc::clone(&outbox))
        .oneshot(send_email(body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert!(error["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(outbox.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_send_email_rejects_malformed_json() {
    let response = app(Arc::default())
        .oneshot(
            Request::post("/api/send-email")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"message\": 1}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
