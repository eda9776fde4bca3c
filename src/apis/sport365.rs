use super::{absolute_url, collapse_text, text_of};
use crate::config::SiteConfig;
use crate::constants::{SPORT365_BASE_URL, SPORT365_PAGE_URL};
use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::types::{Extraction, Source, TicketEvent, TicketSource};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

/// Rows only exist once the page's JavaScript has run
pub const MATCH_ROW_SELECTOR: &str = "a.match-row";

static MATCH_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse(MATCH_ROW_SELECTOR).expect("static selector"));
static DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".match-col.status .status-content").expect("static selector"));
static HOME: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".match-col.home-team .team-name").expect("static selector"));
static AWAY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".match-col.away-team .team-name").expect("static selector"));

/// Fixtures from sport365.com. Only a date is published, no kick-off time.
pub struct Sport365Extractor {
    base_url: String,
    page_url: String,
}

impl Default for Sport365Extractor {
    fn default() -> Self {
        Self {
            base_url: SPORT365_BASE_URL.to_string(),
            page_url: SPORT365_PAGE_URL.to_string(),
        }
    }
}

impl Sport365Extractor {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            base_url: site.base_url.clone(),
            page_url: site.page_url.clone(),
        }
    }
}

#[async_trait::async_trait]
impl TicketSource for Sport365Extractor {
    fn source(&self) -> Source {
        Source::Sport365
    }

    fn page_url(&self) -> &str {
        &self.page_url
    }

    async fn fetch_page(&self, fetcher: &dyn PageFetcher) -> Result<String> {
        fetcher.render(&self.page_url, MATCH_ROW_SELECTOR).await
    }

    fn extract(&self, html: &str) -> Extraction {
        let document = Html::parse_document(html);
        let mut extraction = Extraction::default();

        for (index, row) in document.select(&MATCH_ROW).enumerate() {
            let Some(link) = row
                .value()
                .attr("href")
                .map(str::trim)
                .filter(|href| !href.is_empty())
            else {
                extraction.skip(index, "missing link");
                continue;
            };

            let home = text_of(&row, &HOME);
            let away = text_of(&row, &AWAY);
            if home.is_empty() && away.is_empty() {
                tracing::debug!(index, row = %collapse_text(&row), "Match row without team names");
            }

            extraction.push_event(TicketEvent {
                date_time: text_of(&row, &DATE),
                event: format!("{home} vs. {away}"),
                link: absolute_url(&self.base_url, link),
                source: Source::Sport365,
            });
        }

        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(href: Option<&str>, date: &str, home: &str, away: &str) -> String {
        let href = href.map(|h| format!(r#" href="{h}""#)).unwrap_or_default();
        format!(
            r#"<a class="match-row"{href}>
                 <div class="match-col status"><span class="status-content">{date}</span></div>
                 <div class="match-col home-team"><span class="team-name">{home}</span></div>
                 <div class="match-col away-team"><span class="team-name">{away}</span></div>
               </a>"#
        )
    }

    #[test]
    fn test_extract_fixtures() {
        let page = format!(
            "<html><body><div id=\"fixtures\">{}{}{}</div></body></html>",
            row(Some("/football/match/real-madrid-barcelona/99"), "26/10/2025", "Real Madrid", "Barcelona"),
            row(None, "01/11/2025", "Real Madrid", "Valencia"),
            row(Some("https://www.sport365.com/football/match/x/100"), "Nov 8", "Rayo Vallecano", "Real Madrid"),
        );
        let extraction = Sport365Extractor::default().extract(&page);

        assert_eq!(extraction.seen(), 3);
        assert_eq!(extraction.events.len(), 2);
        assert_eq!(extraction.skipped[0].index, 1);

        let first = &extraction.events[0];
        assert_eq!(first.date_time, "26/10/2025");
        assert_eq!(first.event, "Real Madrid vs. Barcelona");
        assert_eq!(first.link, "https://www.sport365.com/football/match/real-madrid-barcelona/99");
        assert_eq!(extraction.events[1].event, "Rayo Vallecano vs. Real Madrid");
        assert_eq!(extraction.events[1].link, "https://www.sport365.com/football/match/x/100");
    }

    #[test]
    fn test_missing_team_names_do_not_fail() {
        let page = format!("<html><body>{}</body></html>", row(Some("/m/1"), "", "", ""));
        let extraction = Sport365Extractor::default().extract(&page);
        assert_eq!(extraction.events.len(), 1);
        assert_eq!(extraction.events[0].event, " vs. ");
        assert_eq!(extraction.events[0].date_time, "");
    }
}
