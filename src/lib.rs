pub mod apis;
#[cfg(feature = "browser")]
pub mod browser;
pub mod config;
pub mod constants;
pub mod dates;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod format;
pub mod logging;
pub mod normalizer;
pub mod pipeline;
pub mod rate_limiter;
pub mod server;
pub mod types;
