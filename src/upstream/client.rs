//! Budgeted HTTP caller.
//!
//! # Responsibilities
//! - Issue exactly one GET to the configured endpoint
//! - Bound the header wait and the body read by the stage deadline
//! - Classify failures as timeout or transport at the point of failure

use tokio_util::sync::CancellationToken;
use url::{Host, Url};

use crate::resilience::{bounded, Deadline, Interrupt};
use crate::upstream::types::{FetchError, FetchResult, RawResponse};

/// HTTP client bound to one upstream URL.
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    url: Url,
}

impl UpstreamClient {
    /// Create a new client for `url`.
    pub fn new(url: &str) -> FetchResult<Self> {
        let url = Url::parse(url)
            .map_err(|e| FetchError::Transport(format!("Invalid upstream URL '{}': {}", url, e)))?;
        let mut builder = reqwest::Client::builder();
        // The relay and its client usually share a host; never proxy loopback.
        if is_loopback(&url) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch the raw quotation. Never retries.
    pub async fn fetch(
        &self,
        deadline: Deadline,
        cancel: Option<&CancellationToken>,
    ) -> FetchResult<RawResponse> {
        let response = bounded(deadline, cancel, self.client.get(self.url.clone()).send())
            .await
            .map_err(FetchError::Timeout)?
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                url = %self.url,
                status = %status,
                "Upstream returned non-success status, passing body to decoder"
            );
        }

        // Dropping the read future on interrupt stops consuming the body.
        let body = bounded(deadline, cancel, response.bytes())
            .await
            .map_err(FetchError::Timeout)?
            .map_err(classify)?;

        tracing::debug!(
            url = %self.url,
            status = status.as_u16(),
            bytes = body.len(),
            "Upstream response received"
        );

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        None => false,
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(Interrupt::DeadlineElapsed)
    } else {
        FetchError::Transport(err.to_string())
    }
}
