use super::{absolute_url, attr_of, join_parts, text_of};
use crate::config::SiteConfig;
use crate::constants::{HELLOTICKETS_BASE_URL, HELLOTICKETS_PAGE_URL};
use crate::types::{Extraction, Source, TicketEvent, TicketSource};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse("li.performance.performances-list__item").expect("static selector"));
static LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.performance__link").expect("static selector"));
static MONTH: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".performance__date-month").expect("static selector"));
static DAY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".performance__date-day p:first-child").expect("static selector"));
static TIME: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".performance__date-day p:last-child").expect("static selector"));
static NAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".performance__description__name").expect("static selector"));

/// Ticket listings from hellotickets.com
pub struct HelloticketsExtractor {
    base_url: String,
    page_url: String,
}

impl Default for HelloticketsExtractor {
    fn default() -> Self {
        Self {
            base_url: HELLOTICKETS_BASE_URL.to_string(),
            page_url: HELLOTICKETS_PAGE_URL.to_string(),
        }
    }
}

impl HelloticketsExtractor {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            base_url: site.base_url.clone(),
            page_url: site.page_url.clone(),
        }
    }
}

#[async_trait::async_trait]
impl TicketSource for HelloticketsExtractor {
    fn source(&self) -> Source {
        Source::Hellotickets
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

            let month = text_of(&item, &MONTH);
            let day = text_of(&item, &DAY);
            let time = text_of(&item, &TIME);

            extraction.push_event(TicketEvent {
                date_time: join_parts(&[&month, &day, &time]),
                event: text_of(&item, &NAME),
                link: absolute_url(&self.base_url, &link),
                source: Source::Hellotickets,
            });
        }

        extraction
    }
}
