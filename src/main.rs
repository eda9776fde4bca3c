use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use ticket_scraper::config::Config;
use ticket_scraper::constants::ALL_SOURCES;
use ticket_scraper::dates::parse_date_range;
use ticket_scraper::fetch::{HttpFetcher, PageFetcher};
use ticket_scraper::format::ExportFormat;
use ticket_scraper::logging;
use ticket_scraper::normalizer::TeamNameNormalizer;
use ticket_scraper::pipeline::{run, ScrapeRequest};
use ticket_scraper::rate_limiter::RateLimiter;
use ticket_scraper::server::{start_server, AppState};
use ticket_scraper::types::SourceSelection;

#[derive(Parser)]
#[command(name = "ticket_scraper")]
#[command(about = "Real Madrid ticket and fixture scraper")]
#[command(version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API and the web frontend
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Scrape once and print or save the results
    Scrape {
        /// hellotickets, vividseats, sport365 or all
        #[arg(long, default_value = ALL_SOURCES)]
        source: String,
        /// Canonicalize team names
        #[arg(long)]
        normalize: bool,
        /// Keep only events containing this keyword
        #[arg(long)]
        filter: Option<String>,
        /// Earliest event date, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// Latest event date, YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
        /// Write the results to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// json, table or txt
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Keep the guard alive so file logs are flushed on exit
    let _guard = logging::init_logging();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    let limiter = Arc::new(RateLimiter::new(config.http.request_delay()));
    let fetcher: Arc<dyn PageFetcher> = Arc::new(
        HttpFetcher::new(&config.http, limiter).context("failed to build HTTP client")?,
    );
    let normalizer = Arc::new(TeamNameNormalizer::from_config(&config.normalizer));
    let sources = Arc::new(config.sources.clone());

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            info!(port, aliases = normalizer.aliases().len(), "Starting server");
            let state = AppState { fetcher, normalizer, sources };
            start_server(state, config.server.web_dir.clone(), port)
                .await
                .map_err(|e| anyhow::anyhow!("server error: {e}"))?;
        }
        Commands::Scrape { source, normalize, filter, from, to, output, format } => {
            // Validate everything before touching the network
            let export_format: ExportFormat = format.parse()?;
            let selection: SourceSelection = source.parse()?;
            let date_range = parse_date_range(
                from.as_deref(),
                to.as_deref(),
                chrono::Local::now().date_naive(),
            )?;

            let request = ScrapeRequest {
                selection,
                normalize,
                keyword: filter.unwrap_or_default(),
                date_range,
            };

            let result = match run(&request, fetcher.as_ref(), &sources, &normalizer).await {
                Ok(result) => result,
                Err(e) => {
                    error!(error = %e, "Scrape failed");
                    return Err(e.into());
                }
            };

            match output {
                Some(path) => {
                    result
                        .save_to_file(&path, &format)
                        .with_context(|| format!("failed to save results to {}", path.display()))?;
                    println!("💾 Saved {} events to {}", result.total(), path.display());
                    println!("\n{}", result.summary());
                }
                None => match export_format {
                    ExportFormat::Json => println!("{}", result.format_as_json(true)?),
                    ExportFormat::Table | ExportFormat::Txt => {
                        println!("{}", result.format_as_table());
                        println!("{}", result.summary());
                    }
                },
            }
        }
    }

    Ok(())
}
