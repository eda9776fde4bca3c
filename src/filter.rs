use crate::dates::{parse_event_date_on, DateRange};
use crate::types::{ScrapingResult, TicketEvent};
use chrono::{Local, NaiveDate};

fn matches_keyword(event: &TicketEvent, keyword_lower: &str) -> bool {
    event.event.to_lowercase().contains(keyword_lower)
        || event.date_time.to_lowercase().contains(keyword_lower)
        || event.source.as_str().contains(keyword_lower)
}

impl ScrapingResult {
    /// Keep events whose name, date text or source contains `keyword`,
    /// ignoring case. An empty keyword keeps everything.
    pub fn filter_by_keyword(&self, keyword: &str) -> ScrapingResult {
        if keyword.is_empty() {
            return self.clone();
        }

        let keyword_lower = keyword.to_lowercase();
        let events = self
            .events()
            .iter()
            .filter(|e| matches_keyword(e, &keyword_lower))
            .cloned()
            .collect();
        self.with_events(events)
    }

    /// Keep events dated within `range` (inclusive). Events whose date
    /// cannot be parsed are kept.
    pub fn filter_by_date(&self, range: DateRange) -> ScrapingResult {
        self.filter_by_date_on(range, Local::now().date_naive())
    }

    /// [`filter_by_date`](Self::filter_by_date) with an explicit "today" for
    /// year inference.
    pub fn filter_by_date_on(&self, range: DateRange, today: NaiveDate) -> ScrapingResult {
        let events = self
            .events()
            .iter()
            .filter(|e| match parse_event_date_on(&e.date_time, today) {
                Some(when) => range.contains(when.date()),
                None => true,
            })
            .cloned()
            .collect();
        self.with_events(events)
    }
}
