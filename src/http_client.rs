//! Outbound HTTP client shared by the identity and weather providers

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next};
use tracing::{debug, warn};

/// Responses slower than this are logged at warn level
const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Logs method, host, status and latency of every outbound request.
///
/// Query strings are left out because they carry API keys.
pub struct RequestLogger;

#[async_trait::async_trait]
impl Middleware for RequestLogger {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let method = req.method().clone();
        let host = req.url().host_str().unwrap_or_default().to_string();
        let path = req.url().path().to_string();
        let start = Instant::now();

        let result = next.run(req, extensions).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(response) => debug!(
                "{} {}{} -> {} in {:.3}s",
                method,
                host,
                path,
                response.status(),
                elapsed.as_secs_f64()
            ),
            Err(e) => debug!(
                "{} {}{} failed after {:.3}s: {}",
                method,
                host,
                path,
                elapsed.as_secs_f64(),
                e
            ),
        }

        if elapsed > SLOW_RESPONSE {
            warn!(
                "Slow response from {}: {:.3}s",
                host,
                elapsed.as_secs_f64()
            );
        }

        result
    }
}

/// Build a client with a per-request timeout and the given `User-Agent`
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    Ok(ClientBuilder::new(client).with(RequestLogger).build())
}

/// Drop the request URL from a failed call so query credentials stay out of error text
pub fn redact_url(err: reqwest_middleware::Error) -> anyhow::Error {
    match err {
        reqwest_middleware::Error::Reqwest(e) => e.without_url().into(),
        reqwest_middleware::Error::Middleware(e) => e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(build_client("weathermail-test/0.1", Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_redact_url_hides_query() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = build_client("weathermail-test/0.1", Duration::from_secs(5)).unwrap();
        let err = client
            .get(format!("http://{addr}/weather?appid=hunter2"))
            .send()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("hunter2"));

        let redacted = redact_url(err);
        assert!(!format!("{redacted:#}").contains("hunter2"));
    }
}
