#![allow(dead_code)]

use std::collections::HashMap;
use ticket_scraper::config::SourcesConfig;
use ticket_scraper::error::{Result, ScraperError};
use ticket_scraper::fetch::PageFetcher;
use ticket_scraper::types::Source;

pub const HELLOTICKETS_PAGE: &str = r#"<html><body><ul class="performances-list">
  <li class="performance performances-list__item">
    <a class="performance__link" href="/spain/madrid/sports/real-madrid-vs-barcelona/e-1"></a>
    <span class="performance__date-month">Oct</span>
    <div class="performance__date-day"><p>26</p><p>4:15pm</p></div>
    <span class="performance__description__name">Real Madrid CF vs. FC Barcelona</span>
  </li>
  <li class="performance performances-list__item">
    <a class="performance__link" href="/spain/madrid/sports/real-madrid-vs-villarreal/e-2"></a>
    <span class="performance__date-month">Dec</span>
    <div class="performance__date-day"><p>20</p><p>9:00pm</p></div>
    <span class="performance__description__name">Real Madrid CF vs. Villareal</span>
  </li>
</ul></body></html>"#;

pub const VIVIDSEATS_PAGE: &str = r#"<html><body>
  <div data-testid="production-listing-1">
    <a class="styles_linkContainer__4li3j" href="/real-madrid-tickets/production/555">
      <div data-testid="date-time-left-element">
        <span class="MuiTypography-overline">Sun</span>
        <span class="MuiTypography-small-bold">Jan 182026</span>
        <span class="MuiTypography-caption">8:00pm</span>
      </div>
      <span class="styles_titleTruncate__XiZ53">Real Madrid CF vs. Sevilla FC</span>
    </a>
  </div>
</body></html>"#;

pub const SPORT365_PAGE: &str = r#"<html><body>
  <a class="match-row" href="/football/match/getafe-real-madrid/7">
    <div class="match-col status"><span class="status-content">TBD</span></div>
    <div class="match-col home-team"><span class="team-name">Getafe CF</span></div>
    <div class="match-col away-team"><span class="team-name">Real Madrid</span></div>
  </a>
</body></html>"#;

/// Serves canned pages by URL. Unknown URLs fail like a dead host would.
pub struct StubFetcher {
    pages: HashMap<String, String>,
}

impl StubFetcher {
    pub fn with_sources(pages: &[(Source, &str)]) -> Self {
        let config = SourcesConfig::default();
        Self {
            pages: pages
                .iter()
                .map(|(source, page)| (config.site(*source).page_url.clone(), page.to_string()))
                .collect(),
        }
    }

    pub fn all_sources() -> Self {
        Self::with_sources(&[
            (Source::Hellotickets, HELLOTICKETS_PAGE),
            (Source::Vividseats, VIVIDSEATS_PAGE),
            (Source::Sport365, SPORT365_PAGE),
        ])
    }

    pub fn offline() -> Self {
        Self::with_sources(&[])
    }

    fn page(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScraperError::Render(format!("connection refused: {url}")))
    }
}

#[async_trait::async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.page(url)
    }

    async fn render(&self, url: &str, _wait_for: &str) -> Result<String> {
        self.page(url)
    }
}
