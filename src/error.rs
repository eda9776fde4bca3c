use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timed out after {seconds}s while loading {url}")]
    Timeout { url: String, seconds: u64 },

    #[error("Expected markup '{selector}' not found at {url}")]
    MissingMarkup { url: String, selector: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Page rendering failed: {0}")]
    Render(String),

    #[error("Invalid source '{0}'. Use: hellotickets, vividseats, sport365, or all")]
    UnknownSource(String),

    #[error("Invalid {field} date: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("Unsupported format: {0} (supported: json, table, txt)")]
    UnsupportedFormat(String),

    #[error("Failed to scrape from all sources: {}", .0.join("; "))]
    AllSourcesFailed(Vec<String>),
}

impl ScraperError {
    /// True for errors caused by the caller's input rather than by a source.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ScraperError::UnknownSource(_)
                | ScraperError::InvalidDate { .. }
                | ScraperError::UnsupportedFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
