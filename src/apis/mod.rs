//! Event extractors, one per source site.
//!
//! Each extractor is a stateless value holding the site's URLs. `extract`
//! maps page markup to events; elements without a link are skipped and
//! recorded, never treated as a page failure.

pub mod hellotickets;
pub mod sport365;
pub mod vividseats;

use crate::config::SourcesConfig;
use crate::types::{Source, TicketSource};
use scraper::{ElementRef, Selector};

pub use hellotickets::HelloticketsExtractor;
pub use sport365::Sport365Extractor;
pub use vividseats::VividseatsExtractor;

/// Build a fresh extractor for `source`
pub fn create_source(source: Source, sources: &SourcesConfig) -> Box<dyn TicketSource> {
    let site = sources.site(source);
    match source {
        Source::Hellotickets => Box::new(HelloticketsExtractor::new(site)),
        Source::Vividseats => Box::new(VividseatsExtractor::new(site)),
        Source::Sport365 => Box::new(Sport365Extractor::new(site)),
    }
}

/// Whitespace-collapsed text of the first match, empty when nothing matches
pub(crate) fn text_of(element: &ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|el| collapse_text(&el))
        .unwrap_or_default()
}

pub(crate) fn collapse_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Non-empty attribute value of the first match
pub(crate) fn attr_of(element: &ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Join the non-empty parts with single spaces
pub(crate) fn join_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Make `link` absolute against `base_url` unless it already has a scheme
pub fn absolute_url(base_url: &str, link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        return link.to_string();
    }
    if let Some(rest) = link.strip_prefix("//") {
        return format!("https://{rest}");
    }
    let base = base_url.trim_end_matches('/');
    if link.starts_with('/') {
        format!("{base}{link}")
    } else {
        format!("{base}/{link}")
    }
}
