mod common;

use anyhow::Result;
use chrono::NaiveDate;
use common::StubFetcher;
use std::io::Write;
use std::sync::Arc;
use tempfile::{tempdir, NamedTempFile};
use ticket_scraper::config::{Config, HttpConfig, SiteConfig, SourcesConfig};
use ticket_scraper::dates::{parse_date_range, DateRange};
use ticket_scraper::error::ScraperError;
use ticket_scraper::normalizer::TeamNameNormalizer;
use ticket_scraper::fetch::HttpFetcher;
use ticket_scraper::pipeline::{run, scrape_all, scrape_selection, ScrapeRequest};
use ticket_scraper::rate_limiter::RateLimiter;
use ticket_scraper::types::{ScrapingResult, Source, SourceSelection};

#[tokio::test]
async fn test_scrape_all_sources_in_order() -> Result<()> {
    let config = Config::default();
    let result =
        scrape_selection(SourceSelection::All, &StubFetcher::all_sources(), &config.sources).await?;

    assert_eq!(result.total(), 4);
    let sources: Vec<Source> = result.events().iter().map(|e| e.source).collect();
    assert_eq!(
        sources,
        vec![Source::Hellotickets, Source::Hellotickets, Source::Vividseats, Source::Sport365]
    );
    assert_eq!(result.events()[2].date_time, "Jan 18 2026 Sun 8:00pm");
    assert_eq!(
        result.events()[3].link,
        "https://www.sport365.com/football/match/getafe-real-madrid/7"
    );
    assert!(result.sources().iter().all(|s| s.ok));
    Ok(())
}

#[tokio::test]
async fn test_configured_page_urls_are_used() -> Result<()> {
    let config = Config::from_toml(
        r#"
        [sources.hellotickets]
        base_url = "https://mirror.example.com"
        page_url = "https://mirror.example.com/real-madrid"
        "#,
    )?;
    let err = scrape_selection(
        SourceSelection::One(Source::Hellotickets),
        &StubFetcher::all_sources(),
        &config.sources,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("mirror.example.com/real-madrid"));
    // Other sources keep their defaults
    assert_eq!(config.sources.sport365.base_url, "https://www.sport365.com");
    Ok(())
}

#[tokio::test]
async fn test_unrecognized_date_layouts_pass_date_filter() -> Result<()> {
    let config = Config::default();
    // "Jan 18 2026 Sun 8:00pm" matches none of the known layouts
    let range = DateRange {
        start: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(1990, 1, 31).unwrap(),
    };
    let request = ScrapeRequest {
        date_range: Some(range),
        ..ScrapeRequest::new(SourceSelection::One(Source::Vividseats))
    };
    let result = run(
        &request,
        &StubFetcher::all_sources(),
        &config.sources,
        &TeamNameNormalizer::default(),
    )
    .await?;
    assert_eq!(result.total(), 1);
    assert!(!result.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_export_round_trip() -> Result<()> {
    let config = Config::default();
    let request = ScrapeRequest {
        normalize: true,
        ..ScrapeRequest::new(SourceSelection::All)
    };
    let result = run(
        &request,
        &StubFetcher::all_sources(),
        &config.sources,
        &TeamNameNormalizer::from_config(&config.normalizer),
    )
    .await?;

    let dir = tempdir()?;
    let path = dir.path().join("real_madrid.json");
    result.save_to_file(&path, "json")?;
    let saved: ScrapingResult = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(saved, result);
    assert_eq!(saved.events()[2].event, "Real Madrid vs Sevilla");

    let table_path = dir.path().join("real_madrid.txt");
    result.save_to_file(&table_path, "table")?;
    let table = std::fs::read_to_string(&table_path)?;
    assert!(table.starts_with("DATETIME"));
    assert_eq!(table.lines().count(), result.total() + 2);

    let rejected = dir.path().join("real_madrid.xml");
    assert!(matches!(
        result.save_to_file(&rejected, "xml"),
        Err(ScraperError::UnsupportedFormat(_))
    ));
    assert!(!rejected.exists());
    Ok(())
}

#[test]
fn test_config_file_loading() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        r#"
        [server]
        port = 9090

        [http]
        request_delay_ms = 250

        [normalizer]
        aliases = {{ "los blancos" = "Real Madrid" }}
        "#
    )?;

    let config = Config::load(Some(file.path()))?;
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.http.request_delay_ms, 250);
    assert_eq!(config.http.timeout_seconds, 30);

    let normalizer = TeamNameNormalizer::from_config(&config.normalizer);
    assert_eq!(normalizer.normalize_team_name("Los Blancos"), "Real Madrid");
    Ok(())
}

#[test]
fn test_date_range_defaults() -> Result<()> {
    let today = NaiveDate::from_ymd_opt(2025, 9, 20).unwrap();
    assert_eq!(parse_date_range(None, None, today)?, None);

    let range = parse_date_range(Some("2025-10-01"), None, today)?.unwrap();
    assert_eq!(range.start, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
    assert_eq!(range.end, NaiveDate::from_ymd_opt(2027, 9, 20).unwrap());

    let range = parse_date_range(None, Some("2025-12-31"), today)?.unwrap();
    assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 9, 20).unwrap());
    Ok(())
}

/// Serves the hellotickets fixture over real HTTP; other paths are 404.
#[cfg(not(feature = "browser"))]
fn fixture_server() -> Result<std::net::SocketAddr> {
    use axum::response::Html;
    use axum::routing::get;

    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    listener.set_nonblocking(true)?;
    let addr = listener.local_addr()?;
    let app = axum::Router::new().route("/real-madrid", get(|| async { Html(common::HELLOTICKETS_PAGE) }));
    let server = hyper::Server::from_tcp(listener)?.serve(app.into_make_service());
    tokio::spawn(server);
    Ok(addr)
}

/// Accepts connections and never answers them.
#[cfg(not(feature = "browser"))]
async fn silent_server() -> Result<std::net::SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });
    Ok(addr)
}

#[cfg(not(feature = "browser"))]
#[tokio::test]
async fn test_http_fetcher_partial_failure() -> Result<()> {
    let live = fixture_server()?;
    let silent = silent_server().await?;
    let sources = SourcesConfig {
        hellotickets: SiteConfig {
            base_url: format!("http://{live}"),
            page_url: format!("http://{live}/real-madrid"),
        },
        vividseats: SiteConfig {
            base_url: format!("http://{live}"),
            page_url: format!("http://{live}/missing"),
        },
        sport365: SiteConfig {
            base_url: format!("http://{silent}"),
            page_url: format!("http://{silent}/fixtures"),
        },
    };
    let config = HttpConfig {
        request_delay_ms: 0,
        render_timeout_seconds: 1,
        ..HttpConfig::default()
    };
    let fetcher = HttpFetcher::new(&config, Arc::new(RateLimiter::new(config.request_delay())))?;

    let result = scrape_all(&fetcher, &sources).await?;
    assert_eq!(result.total(), 2);
    assert!(result.events().iter().all(|e| e.source == Source::Hellotickets));
    assert!(result.events()[0].link.starts_with(&format!("http://{live}/spain/madrid")));

    let statuses: Vec<bool> = result.sources().iter().map(|s| s.ok).collect();
    assert_eq!(statuses, vec![true, false, false]);
    let sport365_error = result.sources()[2].error.clone().unwrap_or_default();
    assert!(sport365_error.starts_with("Timed out after 1s"), "{sport365_error}");
    Ok(())
}
