use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::NotifyError;
use crate::email::MailTransport;
use crate::identity::IdentityProvider;
use crate::notifier::{DeliveryReport, DeliveryStatus, Notifier, WeatherSkip, WeatherStatus};
use crate::weather::WeatherProvider;

#[derive(Debug, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub message: String,
    /// Comma-separated recipient handles
    pub usernames: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiRecipient {
    pub handle: String,
    /// `dispatched` or `failed`
    pub status: String,
    /// `fetched`, or why weather was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiReport {
    pub dispatched: usize,
    pub failed: usize,
    pub recipients: Vec<ApiRecipient>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

fn weather_label(weather: &WeatherStatus) -> &'static str {
    match weather {
        WeatherStatus::Fetched(_) => "fetched",
        WeatherStatus::Skipped(WeatherSkip::NoLocation) => "no_location",
        WeatherStatus::Skipped(WeatherSkip::NoCity) => "no_city",
        WeatherStatus::Skipped(WeatherSkip::ProviderFailed) => "provider_failed",
    }
}

impl From<&DeliveryReport> for ApiReport {
    fn from(report: &DeliveryReport) -> Self {
        Self {
            dispatched: report.dispatched(),
            failed: report.failed(),
            recipients: report
                .outcomes
                .iter()
                .map(|outcome| match &outcome.status {
                    DeliveryStatus::Dispatched { weather } => ApiRecipient {
                        handle: outcome.handle.clone(),
                        status: "dispatched".to_string(),
                        weather: Some(weather_label(weather).to_string()),
                        reason: None,
                        detail: None,
                    },
                    DeliveryStatus::Failed(err) => ApiRecipient {
                        handle: outcome.handle.clone(),
                        status: "failed".to_string(),
                        weather: None,
                        reason: Some(err.code().as_str().to_string()),
                        detail: Some(err.user_message()),
                    },
                })
                .collect(),
        }
    }
}

pub fn router<I, W, M>(notifier: Notifier<I, W, M>) -> Router
where
    I: IdentityProvider,
    W: WeatherProvider,
    M: MailTransport,
{
    Router::new()
        .route("/health", get(health))
        .route("/send-email", post(send_email::<I, W, M>))
        .with_state(notifier)
}

async fn health() -> &'static str {
    "ok"
}

async fn send_email<I, W, M>(
    State(notifier): State<Notifier<I, W, M>>,
    Json(payload): Json<SendEmailRequest>,
) -> Result<Json<ApiReport>, (StatusCode, Json<ApiError>)>
where
    I: IdentityProvider,
    W: WeatherProvider,
    M: MailTransport,
{
    let report = notifier
        .notify_csv(&payload.message, &payload.usernames)
        .await
        .map_err(|err| {
            let status = match err {
                NotifyError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(ApiError {
                    error: err.user_message(),
                }),
            )
        })?;

    Ok(Json(ApiReport::from(&report)))
}
