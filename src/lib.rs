//! `weathermail` - message fan-out with local weather
//!
//! Given a message and a list of recipient handles, this library looks up
//! each recipient's email and location with an identity provider, adds the
//! current weather at that location when it can be inferred, and sends a
//! templated email. Recipients are processed concurrently and independently.

pub mod api;
pub mod config;
pub mod countries;
pub mod email;
pub mod error;
pub mod http_client;
pub mod identity;
pub mod location_resolver;
pub mod models;
pub mod notifier;
pub mod telemetry;
pub mod template;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::NotifierConfig;
pub use email::{EmailJob, MailTransport, SmtpMailTransport};
pub use error::{ErrorCode, NotifyError};
pub use identity::{GithubIdentityClient, IdentityProvider};
pub use location_resolver::LocationResolver;
pub use models::{NotificationRequest, RecipientProfile, ResolvedLocation, WeatherSnapshot};
pub use notifier::{DeliveryReport, DeliveryStatus, HttpNotifier, Notifier, RecipientOutcome};
pub use weather::{OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, NotifyError>;
