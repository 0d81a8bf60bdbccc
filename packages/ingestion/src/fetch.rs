//! Proxy-rotating fetch layer.
//!
//! Direct browser-style fetches of arbitrary sites are unreliable, so the
//! fetcher routes every request through a rotating list of public CORS
//! relay endpoints. Relays are free and flaky: any of them may time out,
//! return an error page with a 200 status, or serve a bot-check stub.
//! The acceptance predicate filters those out and the rotation moves on
//! to the next relay.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::traits::PageFetcher;

/// Minimum body length for an accepted response.
const MIN_ACCEPTED_LEN: usize = 500;

/// Case-insensitive markers of a relay serving a denial page as a 200.
const DENIAL_MARKERS: &[&str] = &[
    "access denied",
    "bot check",
    "please enable javascript",
    "captcha",
    "rate limit exceeded",
];

/// A relay endpoint template with a `{url}` placeholder.
#[derive(Debug, Clone)]
pub struct ProxyEndpoint {
    template: String,
    /// Whether the target should be percent-encoded before substitution.
    encode_target: bool,
}

impl ProxyEndpoint {
    /// A relay that takes the percent-encoded target as a query value.
    pub fn encoded(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            encode_target: true,
        }
    }

    /// A relay that takes the raw target appended to its path.
    pub fn raw(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            encode_target: false,
        }
    }

    /// Build the wrapped URL for a target.
    fn wrap(&self, target: &str) -> String {
        if self.encode_target {
            self.template
                .replace("{url}", &urlencoding::encode(target))
        } else {
            self.template.replace("{url}", target)
        }
    }
}

/// Fetches remote pages through rotating public CORS relays.
///
/// Tries each relay in order with a fixed per-attempt timeout and returns
/// the first response body that passes the acceptance predicate. One pass
/// through the list per call; callers that want retries call again.
pub struct ProxyFetcher {
    client: reqwest::Client,
    endpoints: Vec<ProxyEndpoint>,
    timeout: Duration,
}

impl Default for ProxyFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyFetcher {
    /// Create a fetcher with the default relay list and a 7s per-attempt
    /// timeout.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
                .redirect(reqwest::redirect::Policy::limited(5))
                .build()
                .expect("failed to build HTTP client"),
            endpoints: Self::default_endpoints(),
            timeout: Duration::from_secs(7),
        }
    }

    /// The default public relay rotation.
    pub fn default_endpoints() -> Vec<ProxyEndpoint> {
        vec![
            ProxyEndpoint::encoded("https://api.allorigins.win/raw?url={url}"),
            ProxyEndpoint::encoded("https://api.codetabs.com/v1/proxy?quest={url}"),
            ProxyEndpoint::raw("https://corsproxy.io/?{url}"),
            ProxyEndpoint::raw("https://proxy.cors.sh/{url}"),
        ]
    }

    /// Replace the relay list.
    pub fn with_endpoints(mut self, endpoints: Vec<ProxyEndpoint>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Whether a 2xx body is real content rather than a relay error page.
    fn is_acceptable(body: &str) -> bool {
        if body.len() <= MIN_ACCEPTED_LEN {
            return false;
        }
        let lowered = body.to_lowercase();
        !DENIAL_MARKERS.iter().any(|marker| lowered.contains(marker))
    }

    /// One GET through one relay. Any failure is reported as `None` so the
    /// rotation can continue.
    async fn attempt(&self, endpoint: &ProxyEndpoint, target: &str) -> Option<String> {
        let wrapped = endpoint.wrap(target);
        debug!(url = %target, relay = %endpoint.template, "relay fetch attempt");

        let response = match self
            .client
            .get(&wrapped)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %target, relay = %endpoint.template, error = %e, "relay transport error");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(
                url = %target,
                relay = %endpoint.template,
                status = %response.status(),
                "relay returned non-2xx"
            );
            return None;
        }

        let body = response.text().await.ok()?;
        if Self::is_acceptable(&body) {
            debug!(url = %target, bytes = body.len(), "relay fetch accepted");
            Some(body)
        } else {
            debug!(
                url = %target,
                relay = %endpoint.template,
                bytes = body.len(),
                "relay body rejected by acceptance predicate"
            );
            None
        }
    }

    /// Only http/https targets are worth sending to a relay.
    fn is_fetchable(url: &str) -> bool {
        matches!(
            Url::parse(url).map(|u| u.scheme().to_string()).as_deref(),
            Ok("http") | Ok("https")
        )
    }
}

#[async_trait]
impl PageFetcher for ProxyFetcher {
    async fn fetch_text(&self, url: &str) -> Option<String> {
        if !Self::is_fetchable(url) {
            warn!(url = %url, "refusing non-http(s) fetch target");
            return None;
        }

        for endpoint in &self.endpoints {
            if let Some(body) = self.attempt(endpoint, url).await {
                return Some(body);
            }
        }

        warn!(url = %url, relays = self.endpoints.len(), "all relays exhausted");
        None
    }
}
