use crate::constants::{
    ALL_SOURCES, HELLOTICKETS_SOURCE, MULTIPLE_SOURCES_URL, SPORT365_SOURCE, VIVIDSEATS_SOURCE,
};
use crate::error::{Result, ScraperError};
use crate::fetch::PageFetcher;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// The sites events are scraped from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Hellotickets,
    Vividseats,
    Sport365,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Hellotickets, Source::Vividseats, Source::Sport365];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Hellotickets => HELLOTICKETS_SOURCE,
            Source::Vividseats => VIVIDSEATS_SOURCE,
            Source::Sport365 => SPORT365_SOURCE,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            HELLOTICKETS_SOURCE => Ok(Source::Hellotickets),
            VIVIDSEATS_SOURCE => Ok(Source::Vividseats),
            SPORT365_SOURCE => Ok(Source::Sport365),
            _ => Err(ScraperError::UnknownSource(s.to_string())),
        }
    }
}

/// Which sources a scrape request covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSelection {
    One(Source),
    All,
}

impl FromStr for SourceSelection {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case(ALL_SOURCES) {
            Ok(SourceSelection::All)
        } else {
            s.parse().map(SourceSelection::One)
        }
    }
}

/// A single ticketed event or fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketEvent {
    /// Date/time text as published, e.g. "27 Sep Sat 4:15pm"
    #[serde(alias = "datetime")]
    pub date_time: String,
    /// "Home vs Away"
    pub event: String,
    /// Absolute purchase or fixture URL
    pub link: String,
    pub source: Source,
}

/// Outcome of one source inside an aggregated scrape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatus {
    pub source: Source,
    pub ok: bool,
    pub events: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceStatus {
    pub fn succeeded(source: Source, events: usize) -> Self {
        Self { source, ok: true, events, error: None }
    }

    pub fn failed(source: Source, error: &ScraperError) -> Self {
        Self { source, ok: false, events: 0, error: Some(error.to_string()) }
    }
}

/// A set of scraped events plus capture metadata.
///
/// `total` always equals `events.len()`: values are only built through the
/// constructors below, and `total` is re-derived when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScrapingResultWire")]
pub struct ScrapingResult {
    events: Vec<TicketEvent>,
    total: usize,
    timestamp: DateTime<Utc>,
    source_url: String,
    source: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sources: Vec<SourceStatus>,
}

#[derive(Deserialize)]
struct ScrapingResultWire {
    #[serde(default)]
    events: Vec<TicketEvent>,
    timestamp: DateTime<Utc>,
    source_url: String,
    source: String,
    #[serde(default)]
    sources: Vec<SourceStatus>,
}

impl From<ScrapingResultWire> for ScrapingResult {
    fn from(wire: ScrapingResultWire) -> Self {
        Self {
            total: wire.events.len(),
            events: wire.events,
            timestamp: wire.timestamp,
            source_url: wire.source_url,
            source: wire.source,
            sources: wire.sources,
        }
    }
}

impl ScrapingResult {
    /// Build a result captured now
    pub fn new(source: impl Into<String>, source_url: impl Into<String>, events: Vec<TicketEvent>) -> Self {
        Self::at(source, source_url, Utc::now(), events)
    }

    /// Build a result with an explicit capture time
    pub fn at(
        source: impl Into<String>,
        source_url: impl Into<String>,
        timestamp: DateTime<Utc>,
        events: Vec<TicketEvent>,
    ) -> Self {
        Self {
            total: events.len(),
            events,
            timestamp,
            source_url: source_url.into(),
            source: source.into(),
            sources: Vec::new(),
        }
    }

    /// Merge several single-source results into one "all" result
    pub fn merged(results: Vec<ScrapingResult>, sources: Vec<SourceStatus>) -> Self {
        let events = results.into_iter().flat_map(|r| r.events).collect();
        let mut merged = Self::new(ALL_SOURCES, MULTIPLE_SOURCES_URL, events);
        merged.sources = sources;
        merged
    }

    /// Same metadata, different events
    pub fn with_events(&self, events: Vec<TicketEvent>) -> Self {
        Self {
            total: events.len(),
            events,
            timestamp: self.timestamp,
            source_url: self.source_url.clone(),
            source: self.source.clone(),
            sources: self.sources.clone(),
        }
    }

    pub fn events(&self) -> &[TicketEvent] {
        &self.events
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn sources(&self) -> &[SourceStatus] {
        &self.sources
    }
}

/// An element an extractor could not turn into an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedElement {
    /// Position of the element among the page's candidate elements
    pub index: usize,
    pub reason: String,
}

/// Everything one extractor run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub events: Vec<TicketEvent>,
    pub skipped: Vec<SkippedElement>,
}

impl Extraction {
    pub fn push_event(&mut self, event: TicketEvent) {
        self.events.push(event);
    }

    pub fn skip(&mut self, index: usize, reason: impl Into<String>) {
        self.skipped.push(SkippedElement { index, reason: reason.into() });
    }

    /// Number of candidate elements seen on the page
    pub fn seen(&self) -> usize {
        self.events.len() + self.skipped.len()
    }
}

/// Core trait that every event source implements
#[async_trait::async_trait]
pub trait TicketSource: Send + Sync {
    fn source(&self) -> Source;

    /// Page the events are scraped from
    fn page_url(&self) -> &str;

    /// Load the page markup. Static pages are a plain fetch.
    async fn fetch_page(&self, fetcher: &dyn PageFetcher) -> Result<String> {
        fetcher.fetch(self.page_url()).await
    }

    /// Map page markup to events; never fails on a single bad element
    fn extract(&self, html: &str) -> Extraction;

    async fn scrape(&self, fetcher: &dyn PageFetcher) -> Result<ScrapingResult> {
        let source = self.source();
        info!(%source, url = self.page_url(), "Scraping");
        let html = self.fetch_page(fetcher).await?;
        let extraction = self.extract(&html);

        for skipped in &extraction.skipped {
            debug!(%source, index = skipped.index, reason = %skipped.reason, "Skipped element");
        }

        if extraction.events.is_empty() {
            info!(%source, url = self.page_url(), "No events found");
        } else {
            info!(
                %source,
                events = extraction.events.len(),
                skipped = extraction.skipped.len(),
                "Successfully scraped events"
            );
        }

        Ok(ScrapingResult::new(
            source.as_str(),
            self.page_url(),
            extraction.events,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str) -> TicketEvent {
        TicketEvent {
            date_time: "27 Sep Sat 4:15pm".to_string(),
            event: name.to_string(),
            link: "https://example.com/e".to_string(),
            source: Source::Hellotickets,
        }
    }

    #[test]
    fn test_source_parsing() {
        assert_eq!("hellotickets".parse::<Source>().unwrap(), Source::Hellotickets);
        assert_eq!(" VividSeats ".parse::<Source>().unwrap(), Source::Vividseats);
        assert!("ticketmaster".parse::<Source>().is_err());
        assert_eq!("all".parse::<SourceSelection>().unwrap(), SourceSelection::All);
        assert_eq!(
            "sport365".parse::<SourceSelection>().unwrap(),
            SourceSelection::One(Source::Sport365)
        );
    }

    #[test]
    fn test_total_matches_events() {
        let result = ScrapingResult::new("hellotickets", "https://x", vec![event("a"), event("b")]);
        assert_eq!(result.total(), 2);
        let fewer = result.with_events(vec![event("a")]);
        assert_eq!(fewer.total(), 1);
        assert_eq!(fewer.timestamp(), result.timestamp());
    }

    #[test]
    fn test_merged_result() {
        let a = ScrapingResult::new("hellotickets", "https://a", vec![event("a")]);
        let b = ScrapingResult::new("vividseats", "https://b", vec![event("b"), event("c")]);
        let statuses = vec![
            SourceStatus::succeeded(Source::Hellotickets, 1),
            SourceStatus::succeeded(Source::Vividseats, 2),
            SourceStatus::failed(Source::Sport365, &ScraperError::Render("closed".into())),
        ];
        let merged = ScrapingResult::merged(vec![a, b], statuses);
        assert_eq!(merged.source(), "all");
        assert_eq!(merged.source_url(), "multiple_sources");
        assert_eq!(merged.total(), 3);
        assert_eq!(merged.events()[2].event, "c");
        assert_eq!(merged.sources().len(), 3);
    }

    #[test]
    fn test_wire_shape() {
        let result = ScrapingResult::new("hellotickets", "https://x", vec![event("a")]);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["source_url"], "https://x");
        assert_eq!(value["events"][0]["date_time"], "27 Sep Sat 4:15pm");
        assert_eq!(value["events"][0]["source"], "hellotickets");
        assert!(value.get("sources").is_none());
    }

    #[test]
    fn test_deserialize_rederives_total() {
        let json = r#"{
            "events": [{"datetime": "Sep 27", "event": "A vs B", "link": "https://l", "source": "sport365"}],
            "total": 7,
            "timestamp": "2025-09-01T10:00:00Z",
            "source_url": "https://s",
            "source": "sport365"
        }"#;
        let result: ScrapingResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.total(), 1);
        assert_eq!(result.events()[0].date_time, "Sep 27");
    }
}
