use crate::constants::{TABLE_EVENT_WIDTH, TABLE_LINK_WIDTH};
use crate::error::{Result, ScraperError};
use crate::types::ScrapingResult;
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

const COLUMN_PADDING: usize = 2;
const SAMPLE_EVENTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Table,
    Txt,
}

impl FromStr for ExportFormat {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "table" => Ok(ExportFormat::Table),
            "txt" => Ok(ExportFormat::Txt),
            _ => Err(ScraperError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Shorten to at most `max` characters, ending in "..." when cut
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Lay out rows in left-aligned columns. Every column but the last is
/// padded to its widest cell plus two spaces.
fn render_columns(rows: &[[String; 4]]) -> String {
    let mut widths = [0usize; 4];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            out.push_str(cell);
            if i + 1 < row.len() {
                let pad = widths[i] - cell.chars().count() + COLUMN_PADDING;
                out.extend(std::iter::repeat(' ').take(pad));
            }
        }
        out.push('\n');
    }
    out
}

impl ScrapingResult {
    /// Human-readable table. Long names and links are shortened for
    /// display only.
    pub fn format_as_table(&self) -> String {
        let mut rows = vec![
            ["DATETIME", "EVENT", "LINK", "SOURCE"].map(String::from),
            ["--------", "-----", "----", "------"].map(String::from),
        ];
        rows.extend(self.events().iter().map(|e| {
            [
                e.date_time.clone(),
                truncate(&e.event, TABLE_EVENT_WIDTH),
                truncate(&e.link, TABLE_LINK_WIDTH),
                e.source.to_string(),
            ]
        }));
        render_columns(&rows)
    }

    pub fn format_as_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Short report: totals, where and when, the date span of the listing
    /// and a few sample events.
    pub fn summary(&self) -> String {
        let (Some(first), Some(last)) = (self.events().first(), self.events().last()) else {
            return "No events found".to_string();
        };

        let mut out = String::new();
        let _ = writeln!(out, "Scraping Summary:");
        let _ = writeln!(out, "================");
        let _ = writeln!(out, "Total Events: {}", self.total());
        let _ = writeln!(out, "Source URL: {}", self.source_url());
        let _ = writeln!(out, "Scraped At: {}", self.timestamp().format("%Y-%m-%d %H:%M:%S"));
        if !self.sources().is_empty() {
            let _ = writeln!(out);
            for status in self.sources() {
                match &status.error {
                    Some(error) => {
                        let _ = writeln!(out, "{}: failed ({})", status.source, error);
                    }
                    None => {
                        let _ = writeln!(out, "{}: {} events", status.source, status.events);
                    }
                }
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Date Range: {} to {}", first.date_time, last.date_time);
        let _ = writeln!(out);
        let _ = writeln!(out, "Sample Events:");
        for event in self.events().iter().take(SAMPLE_EVENTS) {
            let _ = writeln!(out, "- {}: {}", event.date_time, event.event);
        }
        out
    }

    /// Write the result to `path`. The format is checked before anything
    /// touches the filesystem.
    pub fn save_to_file(&self, path: impl AsRef<Path>, format: &str) -> Result<()> {
        let content = match format.parse::<ExportFormat>()? {
            ExportFormat::Json => self.format_as_json(true)?,
            ExportFormat::Table | ExportFormat::Txt => self.format_as_table(),
        };
        std::fs::write(path.as_ref(), content)?;
        tracing::info!(path = %path.as_ref().display(), format, events = self.total(), "Saved results");
        Ok(())
    }
}
