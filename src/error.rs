//! Error types and handling for the notification pipeline

use thiserror::Error;

/// Stable classification of [`NotifyError`] values, used in logs, metrics
/// and the HTTP outcome report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidRequest,
    MissingContactInfo,
    IdentityLookupFailed,
    InvalidLocationQuery,
    WeatherProviderFailed,
    CompositionOrDispatchFailed,
    ChainAborted,
    Config,
}

impl ErrorCode {
    /// Snake-case label for structured output
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::MissingContactInfo => "missing_contact_info",
            ErrorCode::IdentityLookupFailed => "identity_lookup_failed",
            ErrorCode::InvalidLocationQuery => "invalid_location_query",
            ErrorCode::WeatherProviderFailed => "weather_provider_failed",
            ErrorCode::CompositionOrDispatchFailed => "composition_or_dispatch_failed",
            ErrorCode::ChainAborted => "chain_aborted",
            ErrorCode::Config => "config",
        }
    }
}

/// Main error type for the notification pipeline
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The trigger was malformed; no chain was launched
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// The recipient has an identity record but no deliverable email
    #[error("Recipient {handle} has no email on file")]
    MissingContactInfo { handle: String },

    /// The identity provider could not be reached or answered with an error
    #[error("Identity lookup failed for {handle}: {source}")]
    IdentityLookupFailed {
        handle: String,
        #[source]
        source: anyhow::Error,
    },

    /// Weather was requested without a city
    #[error("Invalid location query: {message}")]
    InvalidLocationQuery { message: String },

    /// The weather provider could not be reached or returned unusable data
    #[error("Weather lookup failed for '{query}': {source}")]
    WeatherProviderFailed {
        query: String,
        #[source]
        source: anyhow::Error,
    },

    /// The email could not be built or the transport rejected it
    #[error("Failed to send email to {recipient}: {source}")]
    CompositionOrDispatchFailed {
        recipient: String,
        #[source]
        source: anyhow::Error,
    },

    /// The recipient's task ended without producing an outcome
    #[error("Notification for {handle} aborted: {message}")]
    ChainAborted { handle: String, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl NotifyError {
    /// Create a new invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn missing_contact_info<S: Into<String>>(handle: S) -> Self {
        Self::MissingContactInfo {
            handle: handle.into(),
        }
    }

    pub fn identity_lookup<S: Into<String>>(handle: S, source: impl Into<anyhow::Error>) -> Self {
        Self::IdentityLookupFailed {
            handle: handle.into(),
            source: source.into(),
        }
    }

    pub fn invalid_location_query<S: Into<String>>(message: S) -> Self {
        Self::InvalidLocationQuery {
            message: message.into(),
        }
    }

    pub fn weather_provider<S: Into<String>>(query: S, source: impl Into<anyhow::Error>) -> Self {
        Self::WeatherProviderFailed {
            query: query.into(),
            source: source.into(),
        }
    }

    pub fn dispatch<S: Into<String>>(recipient: S, source: impl Into<anyhow::Error>) -> Self {
        Self::CompositionOrDispatchFailed {
            recipient: recipient.into(),
            source: source.into(),
        }
    }

    pub fn chain_aborted<S: Into<String>, M: Into<String>>(handle: S, message: M) -> Self {
        Self::ChainAborted {
            handle: handle.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            NotifyError::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            NotifyError::MissingContactInfo { .. } => ErrorCode::MissingContactInfo,
            NotifyError::IdentityLookupFailed { .. } => ErrorCode::IdentityLookupFailed,
            NotifyError::InvalidLocationQuery { .. } => ErrorCode::InvalidLocationQuery,
            NotifyError::WeatherProviderFailed { .. } => ErrorCode::WeatherProviderFailed,
            NotifyError::CompositionOrDispatchFailed { .. } => {
                ErrorCode::CompositionOrDispatchFailed
            }
            NotifyError::ChainAborted { .. } => ErrorCode::ChainAborted,
            NotifyError::Config { .. } => ErrorCode::Config,
        }
    }

    /// Whether the failure only degrades a notification instead of ending it
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, NotifyError::WeatherProviderFailed { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            NotifyError::InvalidRequest { message } => format!("Invalid request: {message}"),
            NotifyError::MissingContactInfo { handle } => {
                format!("{handle} has no public email address")
            }
            NotifyError::IdentityLookupFailed { handle, .. } => {
                format!("Unable to look up {handle}. Please try again later.")
            }
            NotifyError::InvalidLocationQuery { .. } => {
                "A weather lookup was attempted without a city.".to_string()
            }
            NotifyError::WeatherProviderFailed { .. } => {
                "Weather is currently unavailable.".to_string()
            }
            NotifyError::CompositionOrDispatchFailed { .. } => {
                "The mail server did not accept the message.".to_string()
            }
            NotifyError::ChainAborted { handle, .. } => {
                format!("Sending to {handle} was interrupted.")
            }
            NotifyError::Config { .. } => {
                "Configuration error. Please check your config file and credentials.".to_string()
            }
        }
    }
}
