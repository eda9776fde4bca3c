use super::{absolute_url, attr_of, join_parts, text_of};
use crate::config::SiteConfig;
use crate::constants::{VIVIDSEATS_BASE_URL, VIVIDSEATS_PAGE_URL};
use crate::types::{Extraction, Source, TicketEvent, TicketSource};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static ITEM: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div[data-testid*='production-listing']").expect("static selector")
});
static LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.styles_linkContainer__4li3j").expect("static selector"));
static WEEKDAY: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div[data-testid='date-time-left-element'] span.MuiTypography-overline")
        .expect("static selector")
});
static MONTH_DAY: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div[data-testid='date-time-left-element'] span.MuiTypography-small-bold")
        .expect("static selector")
});
static TIME: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div[data-testid='date-time-left-element'] span.MuiTypography-caption")
        .expect("static selector")
});
static NAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.styles_titleTruncate__XiZ53").expect("static selector"));

// Day immediately followed by a four digit year, e.g. "182026"
static DAY_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})(20\d{2})$").expect("day/year pattern is valid"));

/// Ticket listings from vividseats.com
pub struct VividseatsExtractor {
    base_url: String,
    page_url: String,
}

impl Default for VividseatsExtractor {
    fn default() -> Self {
        Self {
            base_url: VIVIDSEATS_BASE_URL.to_string(),
            page_url: VIVIDSEATS_PAGE_URL.to_string(),
        }
    }
}

impl VividseatsExtractor {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            base_url: site.base_url.clone(),
            page_url: site.page_url.clone(),
        }
    }
}

/// Split a day glued to its year: "Jan 182026" becomes "Jan 18 2026".
/// Anything else is returned unchanged.
pub fn split_glued_year(date: &str) -> String {
    let parts: Vec<&str> = date.split_whitespace().collect();
    if parts.len() >= 2 {
        if let Some(caps) = DAY_YEAR.captures(parts[1]) {
            let mut fixed = vec![parts[0], &caps[1], &caps[2]];
            fixed.extend_from_slice(&parts[2..]);
            return fixed.join(" ");
        }
    }
    date.to_string()
}

#[async_trait::async_trait]
impl TicketSource for VividseatsExtractor {
    fn source(&self) -> Source {
        Source::Vividseats
    }

    fn page_url(&self) -> &str {
        &self.page_url
    }

    fn extract(&self, html: &str) -> Extraction {
        let document = Html::parse_document(html);
        let mut extraction = Extraction::default();

        for (index, item) in document.select(&ITEM).enumerate() {
            let Some(link) = attr_of(&item, &LINK, "href") else {
                extraction.skip(index, "missing link");
                continue;
            };

            let weekday = text_of(&item, &WEEKDAY);
            let month_day = split_glued_year(&text_of(&item, &MONTH_DAY));
            let time = text_of(&item, &TIME);

            extraction.push_event(TicketEvent {
                date_time: join_parts(&[&month_day, &weekday, &time]),
                event: text_of(&item, &NAME),
                link: absolute_url(&self.base_url, &link),
                source: Source::Vividseats,
            });
        }

        extraction
    }
}
