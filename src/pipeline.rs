use crate::apis::create_source;
use crate::config::SourcesConfig;
use crate::dates::DateRange;
use crate::error::{Result, ScraperError};
use crate::fetch::PageFetcher;
use crate::normalizer::TeamNameNormalizer;
use crate::types::{ScrapingResult, Source, SourceSelection, SourceStatus};
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// One scrape as asked for by the API or the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub selection: SourceSelection,
    pub normalize: bool,
    /// Empty keeps everything
    pub keyword: String,
    pub date_range: Option<DateRange>,
}

impl ScrapeRequest {
    pub fn new(selection: SourceSelection) -> Self {
        Self {
            selection,
            normalize: false,
            keyword: String::new(),
            date_range: None,
        }
    }
}

/// Scrape a single source. Errors are the caller's to handle.
pub async fn scrape_source(
    source: Source,
    fetcher: &dyn PageFetcher,
    sources: &SourcesConfig,
) -> Result<ScrapingResult> {
    create_source(source, sources).scrape(fetcher).await
}

/// Scrape every known source one after another. A failing source is logged
/// and reported in the result's statuses; only when all of them fail is the
/// whole call an error.
#[instrument(skip_all)]
pub async fn scrape_all(fetcher: &dyn PageFetcher, sources: &SourcesConfig) -> Result<ScrapingResult> {
    let mut results = Vec::new();
    let mut statuses = Vec::new();
    let mut failures = Vec::new();

    for source in Source::ALL {
        match scrape_source(source, fetcher, sources).await {
            Ok(result) => {
                statuses.push(SourceStatus::succeeded(source, result.total()));
                results.push(result);
            }
            Err(e) => {
                warn!(%source, error = %e, "Source failed, continuing with the rest");
                statuses.push(SourceStatus::failed(source, &e));
                failures.push(format!("{source}: {e}"));
            }
        }
    }

    if results.is_empty() {
        error!(failures = failures.len(), "All sources failed");
        return Err(ScraperError::AllSourcesFailed(failures));
    }

    Ok(ScrapingResult::merged(results, statuses))
}

pub async fn scrape_selection(
    selection: SourceSelection,
    fetcher: &dyn PageFetcher,
    sources: &SourcesConfig,
) -> Result<ScrapingResult> {
    match selection {
        SourceSelection::One(source) => scrape_source(source, fetcher, sources).await,
        SourceSelection::All => scrape_all(fetcher, sources).await,
    }
}

/// Scrape, then normalize names, then apply the keyword and date filters,
/// in that order.
pub async fn run(
    request: &ScrapeRequest,
    fetcher: &dyn PageFetcher,
    sources: &SourcesConfig,
    normalizer: &TeamNameNormalizer,
) -> Result<ScrapingResult> {
    let started = Instant::now();
    let mut result = scrape_selection(request.selection, fetcher, sources).await?;
    let scraped = result.total();

    if request.normalize {
        result = normalizer.normalize_result(&result);
    }
    if !request.keyword.is_empty() {
        result = result.filter_by_keyword(&request.keyword);
    }
    if let Some(range) = request.date_range {
        result = result.filter_by_date(range);
    }

    if result.is_empty() {
        warn!(source = result.source(), scraped, "Scrape returned no events");
    }

    info!(
        source = result.source(),
        scraped,
        returned = result.total(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Scrape finished"
    );
    Ok(result)
}
