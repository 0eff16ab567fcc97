//! Identity provider integration
//!
//! Resolves a recipient handle to the email address and free-text location
//! on their public profile.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::IdentityConfig;
use crate::http_client::{build_client, redact_url};
use crate::models::RecipientProfile;
use crate::{NotifyError, Result};

/// Looks up recipient profiles by handle
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Fetch the raw profile for `handle`. No retries.
    async fn fetch_profile(&self, handle: &str) -> Result<RecipientProfile>;
}

#[async_trait]
impl<T: IdentityProvider + ?Sized> IdentityProvider for Arc<T> {
    async fn fetch_profile(&self, handle: &str) -> Result<RecipientProfile> {
        (**self).fetch_profile(handle).await
    }
}

/// Resolve a handle to a profile that is guaranteed to carry an email.
///
/// Fails with `MissingContactInfo` when the provider knows the handle but
/// exposes no address for it.
pub async fn resolve<I: IdentityProvider + ?Sized>(
    provider: &I,
    handle: &str,
) -> Result<RecipientProfile> {
    let handle = handle.trim();
    if handle.is_empty() {
        return Err(NotifyError::invalid_request("recipient handle cannot be empty"));
    }

    let profile = provider.fetch_profile(handle).await?;
    if profile.deliverable_email().is_none() {
        return Err(NotifyError::missing_contact_info(handle));
    }
    Ok(profile)
}

/// Client for a GitHub-style users API (`GET {base_url}/{handle}`)
pub struct GithubIdentityClient {
    client: ClientWithMiddleware,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    email: Option<String>,
    location: Option<String>,
}

impl GithubIdentityClient {
    /// Create a new client
    pub fn new(config: &IdentityConfig) -> anyhow::Result<Self> {
        let client = build_client(&config.user_agent, config.timeout())?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn user_url(&self, handle: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(handle))
    }
}

#[async_trait]
impl IdentityProvider for GithubIdentityClient {
    #[instrument(skip(self))]
    async fn fetch_profile(&self, handle: &str) -> Result<RecipientProfile> {
        let mut request = self
            .client
            .get(self.user_url(handle))
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("token {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| NotifyError::identity_lookup(handle, redact_url(e)))?;

        let status = response.status();
        if !status.is_success() {
            let cause = match status.as_u16() {
                404 => anyhow!("user not found"),
                401 | 403 => anyhow!("identity provider refused credentials (HTTP {status})"),
                _ => anyhow!("identity provider returned HTTP {status}"),
            };
            return Err(NotifyError::identity_lookup(handle, cause));
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::identity_lookup(handle, e.without_url()))?;

        debug!(
            "Profile for {}: email {}, location {:?}",
            handle,
            if user.email.is_some() { "present" } else { "absent" },
            user.location
        );

        Ok(RecipientProfile {
            handle: handle.to_string(),
            email: user.email,
            raw_location: user.location,
        })
    }
}
