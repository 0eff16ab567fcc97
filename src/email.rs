//! Email composition and delivery
//!
//! A notification is rendered from the fixed `message-weather` template into
//! an [`EmailJob`] and handed to a [`MailTransport`]. Delivery is
//! fire-and-forget: once the transport accepts the job nothing is recorded.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;

use crate::NotifyError;
use crate::config::MailConfig;
use crate::models::{RecipientProfile, WeatherSnapshot};
use crate::template::TemplateRenderer;

/// Name of the only template this service renders
pub const TEMPLATE_NAME: &str = "message-weather";

/// Values substituted into the template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLocals {
    /// Recipient display name (their handle)
    pub name: String,
    pub message: String,
    /// Human-readable send time, e.g. `10/16/2026, 9:05:03 AM`
    pub date: String,
    /// Condition label, empty when no weather is known
    pub weather_main: String,
    /// Temperature in Celsius as text, empty when no weather is known
    pub weather_temp: String,
}

/// A fully assembled email, ready for a transport
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailJob {
    pub to: String,
    pub template_name: &'static str,
    pub locals: TemplateLocals,
}

/// Accepts email jobs for delivery
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Hand the job over. Returns once the transport has accepted it.
    async fn send(&self, job: &EmailJob) -> Result<()>;
}

#[async_trait]
impl<T: MailTransport + ?Sized> MailTransport for Arc<T> {
    async fn send(&self, job: &EmailJob) -> Result<()> {
        (**self).send(job).await
    }
}

/// Render the send timestamp the way the notification shows it
#[must_use]
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Compose the email for one recipient, stamped with the current local time
pub fn compose(
    profile: &RecipientProfile,
    weather: Option<&WeatherSnapshot>,
    message: &str,
) -> crate::Result<EmailJob> {
    compose_at(profile, weather, message, Local::now())
}

/// Compose the email for one recipient with an explicit send time
pub fn compose_at(
    profile: &RecipientProfile,
    weather: Option<&WeatherSnapshot>,
    message: &str,
    sent_at: DateTime<Local>,
) -> crate::Result<EmailJob> {
    let to = profile
        .deliverable_email()
        .ok_or_else(|| NotifyError::missing_contact_info(&profile.handle))?;

    Ok(EmailJob {
        to: to.to_string(),
        template_name: TEMPLATE_NAME,
        locals: TemplateLocals {
            name: profile.handle.clone(),
            message: message.to_string(),
            date: format_timestamp(sent_at),
            weather_main: weather.map(|w| w.condition.clone()).unwrap_or_default(),
            weather_temp: weather.map(WeatherSnapshot::format_temperature).unwrap_or_default(),
        },
    })
}

/// Hand a composed job to the transport
pub async fn dispatch<T: MailTransport + ?Sized>(transport: &T, job: &EmailJob) -> crate::Result<()> {
    transport
        .send(job)
        .await
        .map_err(|e| NotifyError::dispatch(&job.to, e))
}

/// SMTP transport backed by lettre
#[derive(Clone)]
pub struct SmtpMailTransport {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    renderer: Arc<TemplateRenderer>,
    from: Mailbox,
}

impl SmtpMailTransport {
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let from: Mailbox = config
            .from
            .parse()
            .with_context(|| format!("Failed to parse from address '{}'", config.from))?;

        let mut builder = match config.tls.as_str() {
            "none" => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host),
            "tls" => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .context("Failed to configure SMTP relay")?,
            _ => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .context("Failed to configure SMTP relay")?,
        };

        builder = builder
            .port(config.smtp_port)
            .timeout(Some(config.timeout()));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: Arc::new(builder.build()),
            renderer: Arc::new(TemplateRenderer::new()?),
            from,
        })
    }

    fn build_message(&self, job: &EmailJob) -> Result<Message> {
        let to: Mailbox = job
            .to
            .parse()
            .with_context(|| format!("Failed to parse to address '{}'", job.to))?;
        let rendered = self.renderer.render(job)?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(rendered.subject)
            .multipart(MultiPart::alternative_plain_html(rendered.text, rendered.html))
            .context("Failed to build email")
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, job: &EmailJob) -> Result<()> {
        let message = self.build_message(job)?;
        self.transport
            .send(message)
            .await
            .context("SMTP server rejected the message")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sent_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 16, 21, 5, 3).unwrap()
    }

    fn alice() -> RecipientProfile {
        RecipientProfile::new("alice").with_email("alice@example.com")
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(sent_at()), "10/16/2026, 9:05:03 PM");
    }

    #[test]
    fn test_compose_with_weather() {
        let weather = WeatherSnapshot::new("Clouds", 14.5);
        let job = compose_at(&alice(), Some(&weather), "Hi", sent_at()).unwrap();

        assert_eq!(job.to, "alice@example.com");
        assert_eq!(job.template_name, TEMPLATE_NAME);
        assert_eq!(job.locals.name, "alice");
        assert_eq!(job.locals.message, "Hi");
        assert_eq!(job.locals.weather_main, "Clouds");
        assert_eq!(job.locals.weather_temp, "14.5");
    }

    #[test]
    fn test_compose_without_weather_leaves_fields_blank() {
        let job = compose_at(&alice(), None, "Hi", sent_at()).unwrap();
        assert_eq!(job.locals.weather_main, "");
        assert_eq!(job.locals.weather_temp, "");
    }

    #[test]
    fn test_compose_requires_email() {
        let err = compose(&RecipientProfile::new("bob"), None, "Hi").unwrap_err();
        assert!(matches!(err, NotifyError::MissingContactInfo { .. }));
    }

    #[test]
    fn test_job_serializes_to_transport_shape() {
        let job = compose_at(&alice(), None, "Hi", sent_at()).unwrap();
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["templateName"], "message-weather");
        assert_eq!(value["locals"]["weatherMain"], "");
        assert_eq!(value["locals"]["date"], "10/16/2026, 9:05:03 PM");
    }

    #[test]
    fn test_build_message() {
        let config = MailConfig {
            smtp_host: "localhost".to_string(),
            from: "Weathermail <noreply@example.com>".to_string(),
            tls: "none".to_string(),
            ..MailConfig::default()
        };
        let transport = SmtpMailTransport::from_config(&config).unwrap();
        let job = compose_at(&alice(), None, "Hi", sent_at()).unwrap();
        assert!(transport.build_message(&job).is_ok());

        let mut bad = job.clone();
        bad.to = "not an address".to_string();
        assert!(transport.build_message(&bad).is_err());
    }

    #[tokio::test]
    async fn test_render_failure_is_a_dispatch_error() {
        let config = MailConfig {
            smtp_host: "localhost".to_string(),
            from: "noreply@example.com".to_string(),
            tls: "none".to_string(),
            ..MailConfig::default()
        };
        let transport = SmtpMailTransport::from_config(&config).unwrap();
        let mut job = compose_at(&alice(), None, "Hi", sent_at()).unwrap();
        job.template_name = "missing";

        let err = dispatch(&transport, &job).await.unwrap_err();
        assert!(matches!(
            err,
            NotifyError::CompositionOrDispatchFailed { ref recipient, .. } if recipient == "alice@example.com"
        ));
    }
}
