//! Notification fan-out
//!
//! [`Notifier::notify_all`] runs one independent chain per recipient:
//!
//! ```text
//! PENDING -> LOOKED_UP -> LOCATION_RESOLVED -> WEATHER_FETCHED | WEATHER_SKIPPED
//!         -> COMPOSED -> DISPATCHED
//! ```
//!
//! Any step except the weather fetch can end the chain in `FAILED`. A failed
//! weather fetch degrades to `WEATHER_SKIPPED` and the email goes out without
//! weather. Chains share nothing but read-only providers, so one recipient's
//! failure never reaches another, and the batch call itself never fails
//! because of a recipient.

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::config::{DispatchConfig, NotifierConfig};
use crate::email::{self, MailTransport, SmtpMailTransport};
use crate::identity::{self, GithubIdentityClient, IdentityProvider};
use crate::location_resolver::LocationResolver;
use crate::models::{NotificationRequest, WeatherSnapshot};
use crate::telemetry::DeliveryMetrics;
use crate::weather::{self, OpenWeatherClient, WeatherProvider};
use crate::{NotifyError, Result};

/// Steps of a single recipient's chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Pending,
    LookedUp,
    LocationResolved,
    WeatherFetched,
    WeatherSkipped,
    Composed,
    Dispatched,
    Failed,
}

impl ChainState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChainState::Pending => "PENDING",
            ChainState::LookedUp => "LOOKED_UP",
            ChainState::LocationResolved => "LOCATION_RESOLVED",
            ChainState::WeatherFetched => "WEATHER_FETCHED",
            ChainState::WeatherSkipped => "WEATHER_SKIPPED",
            ChainState::Composed => "COMPOSED",
            ChainState::Dispatched => "DISPATCHED",
            ChainState::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an email went out without weather
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSkip {
    /// The profile has no location text
    NoLocation,
    /// Only a country could be inferred
    NoCity,
    /// The provider call failed
    ProviderFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherStatus {
    Fetched(WeatherSnapshot),
    Skipped(WeatherSkip),
}

impl WeatherStatus {
    #[must_use]
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            WeatherStatus::Fetched(snapshot) => Some(snapshot),
            WeatherStatus::Skipped(_) => None,
        }
    }
}

/// Terminal state of a recipient's chain
#[derive(Debug)]
pub enum DeliveryStatus {
    Dispatched { weather: WeatherStatus },
    Failed(NotifyError),
}

#[derive(Debug)]
pub struct RecipientOutcome {
    pub handle: String,
    pub status: DeliveryStatus,
}

impl RecipientOutcome {
    #[must_use]
    pub fn is_dispatched(&self) -> bool {
        matches!(self.status, DeliveryStatus::Dispatched { .. })
    }

    #[must_use]
    pub fn error(&self) -> Option<&NotifyError> {
        match &self.status {
            DeliveryStatus::Failed(err) => Some(err),
            DeliveryStatus::Dispatched { .. } => None,
        }
    }
}

/// Per-recipient outcomes of a batch, in request order
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub outcomes: Vec<RecipientOutcome>,
}

impl DeliveryReport {
    #[must_use]
    pub fn dispatched(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_dispatched()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.dispatched()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// First outcome for `handle`
    #[must_use]
    pub fn outcome(&self, handle: &str) -> Option<&RecipientOutcome> {
        self.outcomes.iter().find(|o| o.handle == handle)
    }
}

struct Pipeline<I, W, M> {
    identity: I,
    weather: W,
    mail: M,
    limit: Semaphore,
    metrics: DeliveryMetrics,
}

/// Entry point of the notification pipeline
pub struct Notifier<I, W, M> {
    pipeline: Arc<Pipeline<I, W, M>>,
}

impl<I, W, M> Clone for Notifier<I, W, M> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

/// The production wiring: HTTP identity and weather providers, SMTP delivery
pub type HttpNotifier = Notifier<GithubIdentityClient, OpenWeatherClient, SmtpMailTransport>;

impl HttpNotifier {
    /// Build the production pipeline from configuration
    pub fn from_config(config: &NotifierConfig) -> anyhow::Result<Self> {
        config.validate_mail()?;

        Ok(Notifier::new(
            GithubIdentityClient::new(&config.identity)?,
            OpenWeatherClient::new(&config.weather)?,
            SmtpMailTransport::from_config(&config.mail)?,
            &config.dispatch,
        ))
    }
}

impl<I, W, M> Notifier<I, W, M>
where
    I: IdentityProvider,
    W: WeatherProvider,
    M: MailTransport,
{
    pub fn new(identity: I, weather: W, mail: M, dispatch: &DispatchConfig) -> Self {
        Self {
            pipeline: Arc::new(Pipeline {
                identity,
                weather,
                mail,
                limit: Semaphore::new(dispatch.max_concurrent_recipients.max(1)),
                metrics: DeliveryMetrics::new(),
            }),
        }
    }

    /// Parse a comma-separated recipient list and notify everyone on it.
    ///
    /// Only a malformed request is an error; per-recipient failures are
    /// reported in the returned [`DeliveryReport`].
    pub async fn notify_csv(&self, message: &str, recipients_csv: &str) -> Result<DeliveryReport> {
        let request = NotificationRequest::parse(message, recipients_csv)?;
        Ok(self.notify_all(request).await)
    }

    /// Run one chain per recipient concurrently and wait for all of them
    pub async fn notify_all(&self, request: NotificationRequest) -> DeliveryReport {
        let NotificationRequest {
            message,
            recipients,
        } = request;
        let message: Arc<str> = Arc::from(message);

        info!("Notifying {} recipients", recipients.len());

        let chains = recipients
            .into_iter()
            .map(|handle| {
                let pipeline = Arc::clone(&self.pipeline);
                let message = Arc::clone(&message);
                let span = info_span!("recipient", handle = %handle);
                let task = tokio::spawn(
                    {
                        let handle = handle.clone();
                        async move { pipeline.run_chain(handle, message).await }
                    }
                    .instrument(span),
                );
                (handle, task)
            })
            .collect::<Vec<_>>();

        let (handles, tasks): (Vec<String>, Vec<_>) = chains.into_iter().unzip();
        let results = join_all(tasks).await;

        let outcomes = handles
            .into_iter()
            .zip(results)
            .map(|(handle, result)| match result {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    error!("Notification task for {} aborted: {}", handle, join_error);
                    self.pipeline.metrics.record_failed(crate::ErrorCode::ChainAborted);
                    RecipientOutcome {
                        status: DeliveryStatus::Failed(NotifyError::chain_aborted(
                            &handle,
                            join_error.to_string(),
                        )),
                        handle,
                    }
                }
            })
            .collect::<Vec<_>>();

        let report = DeliveryReport { outcomes };
        info!(
            "Notification batch finished: {} dispatched, {} failed",
            report.dispatched(),
            report.failed()
        );
        report
    }
}

impl<I, W, M> Pipeline<I, W, M>
where
    I: IdentityProvider,
    W: WeatherProvider,
    M: MailTransport,
{
    async fn run_chain(&self, handle: String, message: Arc<str>) -> RecipientOutcome {
        // The semaphore is never closed, so acquire only fails if it were.
        let _permit = self.limit.acquire().await.ok();
        debug!(state = %ChainState::Pending, "Chain started");

        let status = match self.deliver(&handle, &message).await {
            Ok(weather) => {
                self.metrics
                    .record_dispatched(matches!(weather, WeatherStatus::Fetched(_)));
                DeliveryStatus::Dispatched { weather }
            }
            Err(err) => {
                match &err {
                    NotifyError::MissingContactInfo { .. } => {
                        warn!(state = %ChainState::Failed, "Not sending to {}: {}", handle, err);
                    }
                    _ => error!(state = %ChainState::Failed, "Failed to send email to {}: {}", handle, err),
                }
                self.metrics.record_failed(err.code());
                DeliveryStatus::Failed(err)
            }
        };

        RecipientOutcome { handle, status }
    }

    async fn deliver(&self, handle: &str, message: &str) -> Result<WeatherStatus> {
        let profile = identity::resolve(&self.identity, handle).await?;
        debug!(state = %ChainState::LookedUp, "Profile resolved");

        let location = LocationResolver::resolve(profile.raw_location.as_deref());
        debug!(state = %ChainState::LocationResolved, ?location, "Location resolved");

        let weather = match location {
            None => WeatherStatus::Skipped(WeatherSkip::NoLocation),
            Some(location) if !location.has_city() => WeatherStatus::Skipped(WeatherSkip::NoCity),
            Some(location) => match weather::fetch(&self.weather, &location).await {
                Ok(snapshot) => WeatherStatus::Fetched(snapshot),
                Err(err) if err.is_recoverable() => {
                    warn!("Failed to fetch weather for {}: {}", handle, err);
                    WeatherStatus::Skipped(WeatherSkip::ProviderFailed)
                }
                Err(err) => return Err(err),
            },
        };
        match &weather {
            WeatherStatus::Fetched(_) => debug!(state = %ChainState::WeatherFetched),
            WeatherStatus::Skipped(reason) => {
                debug!(state = %ChainState::WeatherSkipped, ?reason)
            }
        }

        let job = email::compose(&profile, weather.snapshot(), message)?;
        debug!(state = %ChainState::Composed);

        // Accepted sends are counted, not logged
        email::dispatch(&self.mail, &job).await?;

        Ok(weather)
    }
}
