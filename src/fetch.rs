//! Page loading: plain HTTP fetches and the rendering path used by
//! JavaScript-driven pages.

use crate::config::HttpConfig;
use crate::error::{Result, ScraperError};
use crate::rate_limiter::RateLimiter;
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Something that can turn a URL into page markup
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw HTML served at `url`
    async fn fetch(&self, url: &str) -> Result<String>;

    /// Load `url` as a browser would and return the markup once
    /// `wait_for` (a CSS selector) is present.
    async fn render(&self, url: &str, wait_for: &str) -> Result<String>;
}

/// reqwest-backed fetcher with per-host politeness and hard timeouts
pub struct HttpFetcher {
    client: Client,
    limiter: Arc<RateLimiter>,
    user_agent: String,
    render_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig, limiter: Arc<RateLimiter>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            limiter,
            user_agent: config.user_agent.clone(),
            render_timeout: config.render_timeout(),
        })
    }

    async fn wait_turn(&self, url: &str) -> Result<()> {
        let parsed = Url::parse(url).map_err(|e| ScraperError::InvalidUrl(format!("{url}: {e}")))?;
        let host = parsed.host_str().unwrap_or_default().to_string();
        self.limiter.acquire(&host).await;
        Ok(())
    }

    async fn get_body(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(url, bytes = body.len(), "Fetched page");
        Ok(body)
    }

    #[cfg(feature = "browser")]
    async fn render_page(&self, url: &str, wait_for: &str) -> Result<String> {
        crate::browser::render_page(url, wait_for, &self.user_agent).await
    }

    /// Without a headless browser the page is fetched as-is and must already
    /// contain the awaited markup.
    #[cfg(not(feature = "browser"))]
    async fn render_page(&self, url: &str, wait_for: &str) -> Result<String> {
        debug!(user_agent = %self.user_agent, "Rendering without browser support, using plain fetch");
        let body = self.get_body(url).await?;
        if contains_selector(&body, wait_for) {
            Ok(body)
        } else {
            Err(ScraperError::MissingMarkup {
                url: url.to_string(),
                selector: wait_for.to_string(),
            })
        }
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        self.wait_turn(url).await?;
        self.get_body(url).await
    }

    #[instrument(skip(self))]
    async fn render(&self, url: &str, wait_for: &str) -> Result<String> {
        self.wait_turn(url).await?;
        match tokio::time::timeout(self.render_timeout, self.render_page(url, wait_for)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(url, seconds = self.render_timeout.as_secs(), "Rendering timed out");
                Err(ScraperError::Timeout {
                    url: url.to_string(),
                    seconds: self.render_timeout.as_secs(),
                })
            }
        }
    }
}

/// True when `html` has at least one element matching `selector`.
pub fn contains_selector(html: &str, selector: &str) -> bool {
    match Selector::parse(selector) {
        Ok(selector) => Html::parse_document(html).select(&selector).next().is_some(),
        Err(_) => false,
    }
}
