//! HTTP fetcher implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use certpack_core::{CoreError, IssuerFetcher};

use crate::error::{FetchError, Result};

/// Fixed CORS-proxy URL template: the target URL is percent-encoded and
/// appended.
pub const DEFAULT_PROXY_TEMPLATE: &str = "https://corsproxy.io/?url=";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Issuer-certificate fetcher over HTTP(S).
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct HttpFetcher {
    inner: Arc<FetcherInner>,
}

struct FetcherInner {
    http: HttpClient,
    proxy_template: String,
}

impl HttpFetcher {
    /// Create a fetcher with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for custom configuration.
    #[must_use]
    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::new()
    }

    /// Fetch raw certificate bytes from a URL, retrying once through the
    /// CORS proxy when the direct route fails.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::BothRoutesFailed`] when neither route
    /// produced a successful response.
    pub async fn fetch_certificate(&self, url: &str) -> Result<Vec<u8>> {
        match self.get_bytes(url).await {
            Ok(bytes) => Ok(bytes),
            Err(direct) => {
                let proxied_url = self.proxied_url(url);
                warn!(url, error = %direct, "direct fetch failed, retrying through proxy");
                self.get_bytes(&proxied_url)
                    .await
                    .map_err(|proxied| FetchError::BothRoutesFailed {
                        direct: direct.to_string(),
                        proxied: proxied.to_string(),
                    })
            }
        }
    }

    /// Perform one GET and collect the body.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "GET certificate");
        let response = self
            .inner
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Build the proxied form of a URL from the configured template.
    fn proxied_url(&self, url: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
        format!("{}{encoded}", self.inner.proxy_template)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IssuerFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> certpack_core::Result<Vec<u8>> {
        self.fetch_certificate(url)
            .await
            .map_err(|e| CoreError::Fetch(e.to_string()))
    }
}

/// Builder for configuring an [`HttpFetcher`].
pub struct HttpFetcherBuilder {
    timeout: Duration,
    user_agent: String,
    proxy_template: String,
}

impl HttpFetcherBuilder {
    /// Create a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("certpack/{}", env!("CARGO_PKG_VERSION")),
            proxy_template: DEFAULT_PROXY_TEMPLATE.to_string(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set the CORS-proxy URL template (useful for testing and
    /// self-hosted proxies).
    #[must_use]
    pub fn proxy_template(mut self, template: impl Into<String>) -> Self {
        self.proxy_template = template.into();
        self
    }

    /// Build the fetcher.
    #[must_use]
    pub fn build(self) -> HttpFetcher {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        HttpFetcher {
            inner: Arc::new(FetcherInner {
                http,
                proxy_template: self.proxy_template,
            }),
        }
    }
}

impl Default for HttpFetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
