//! Notification request and recipient profile models

use serde::{Deserialize, Serialize};

use crate::{NotifyError, Result};

/// A message to deliver to a batch of recipient handles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub message: String,
    /// Recipient handles in the order the caller supplied them
    pub recipients: Vec<String>,
}

impl NotificationRequest {
    /// Build a request from already-split handles.
    ///
    /// Handles are trimmed and blank ones dropped; an empty message or an
    /// empty recipient list is rejected.
    pub fn new<I, S>(message: impl Into<String>, recipients: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let message = message.into();
        let recipients: Vec<String> = recipients
            .into_iter()
            .map(|handle| handle.as_ref().trim().to_string())
            .filter(|handle| !handle.is_empty())
            .collect();

        if message.trim().is_empty() {
            return Err(NotifyError::invalid_request("message cannot be empty"));
        }
        if recipients.is_empty() {
            return Err(NotifyError::invalid_request(
                "at least one recipient handle is required",
            ));
        }

        Ok(Self {
            message,
            recipients,
        })
    }

    /// Build a request from a comma-separated list of handles, e.g. `"alice, bob"`
    pub fn parse(message: impl Into<String>, recipients_csv: &str) -> Result<Self> {
        Self::new(message, recipients_csv.split(','))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}

/// Contact and location data returned by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientProfile {
    pub handle: String,
    /// Deliverable address
    pub email: Option<String>,
    /// Free-text location as typed by the user, e.g. `Berlin, Germany`
    pub raw_location: Option<String>,
}

impl RecipientProfile {
    #[must_use]
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            email: None,
            raw_location: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.raw_location = Some(location.into());
        self
    }

    /// The deliverable address, treating an empty string as absent
    #[must_use]
    pub fn deliverable_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}
