/// Source name constants to ensure consistency across the codebase.
/// These are the wire names used by the API, the CLI and the JSON output.

pub const HELLOTICKETS_SOURCE: &str = "hellotickets";
pub const VIVIDSEATS_SOURCE: &str = "vividseats";
pub const SPORT365_SOURCE: &str = "sport365";
pub const ALL_SOURCES: &str = "all";

// Default endpoints for each source
pub const HELLOTICKETS_BASE_URL: &str = "https://www.hellotickets.com";
pub const HELLOTICKETS_PAGE_URL: &str =
    "https://www.hellotickets.com/real-madrid-cf-tickets/p-598?qs=real%20mar";

pub const VIVIDSEATS_BASE_URL: &str = "https://www.vividseats.com";
pub const VIVIDSEATS_PAGE_URL: &str =
    "https://www.vividseats.com/real-madrid-tickets--sports-soccer/performer/3053";

pub const SPORT365_BASE_URL: &str = "https://www.sport365.com";
pub const SPORT365_PAGE_URL: &str =
    "https://www.sport365.com/football/team/real-madrid/1-1973#/fixtures";

/// Source URL recorded on results merged from several sources.
pub const MULTIPLE_SOURCES_URL: &str = "multiple_sources";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Display budget for table columns
pub const TABLE_EVENT_WIDTH: usize = 50;
pub const TABLE_LINK_WIDTH: usize = 60;

