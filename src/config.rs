use crate::constants::{
    DEFAULT_PORT, DEFAULT_REQUEST_DELAY_MS, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TIMEOUT_SECONDS,
    DEFAULT_USER_AGENT, HELLOTICKETS_BASE_URL, HELLOTICKETS_PAGE_URL, SPORT365_BASE_URL,
    SPORT365_PAGE_URL, VIVIDSEATS_BASE_URL, VIVIDSEATS_PAGE_URL,
};
use crate::error::{Result, ScraperError};
use crate::types::Source;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub sources: SourcesConfig,
    pub normalizer: NormalizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory with the static frontend; not served when absent
    pub web_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            web_dir: Some(PathBuf::from("web")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Pause between consecutive requests to the same host
    pub request_delay_ms: u64,
    pub timeout_seconds: u64,
    /// Hard wall-clock cutoff for rendered pages
    pub render_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            render_timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl HttpConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Prefix for relative links found on the page
    pub base_url: String,
    pub page_url: String,
}

/// Site tables as written in the file; unset fields take the source's defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SiteOverrides {
    base_url: Option<String>,
    page_url: Option<String>,
}

impl SiteOverrides {
    fn or_defaults(self, base_url: &str, page_url: &str) -> SiteConfig {
        SiteConfig {
            base_url: self.base_url.unwrap_or_else(|| base_url.to_string()),
            page_url: self.page_url.unwrap_or_else(|| page_url.to_string()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SourcesOverrides {
    hellotickets: SiteOverrides,
    vividseats: SiteOverrides,
    sport365: SiteOverrides,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "SourcesOverrides")]
pub struct SourcesConfig {
    pub hellotickets: SiteConfig,
    pub vividseats: SiteConfig,
    pub sport365: SiteConfig,
}

impl From<SourcesOverrides> for SourcesConfig {
    fn from(overrides: SourcesOverrides) -> Self {
        Self {
            hellotickets: overrides
                .hellotickets
                .or_defaults(HELLOTICKETS_BASE_URL, HELLOTICKETS_PAGE_URL),
            vividseats: overrides
                .vividseats
                .or_defaults(VIVIDSEATS_BASE_URL, VIVIDSEATS_PAGE_URL),
            sport365: overrides.sport365.or_defaults(SPORT365_BASE_URL, SPORT365_PAGE_URL),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesOverrides::default().into()
    }
}

impl SourcesConfig {
    pub fn site(&self, source: Source) -> &SiteConfig {
        match source {
            Source::Hellotickets => &self.hellotickets,
            Source::Vividseats => &self.vividseats,
            Source::Sport365 => &self.sport365,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub similarity_threshold: f64,
    /// Extra alias -> canonical name entries on top of the built-in table
    pub aliases: BTreeMap<String, String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            aliases: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load from `path`. A missing file at the default location yields the
    /// defaults; a missing file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        if !explicit && !config_path.exists() {
            info!(path = %config_path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let config = Self::from_toml(&config_content)?;
        info!(path = %config_path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let threshold = self.normalizer.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ScraperError::Config(format!(
                "similarity_threshold must be between 0 and 1, got {}",
                threshold
            )));
        }
        if self.http.timeout_seconds == 0 || self.http.render_timeout_seconds == 0 {
            return Err(ScraperError::Config("timeouts must be at least one second".into()));
        }
        Ok(())
    }
}
