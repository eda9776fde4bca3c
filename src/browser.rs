//! Headless Chrome rendering via chromiumoxide, for pages that build their
//! markup with JavaScript.

use crate::error::{Result, ScraperError};
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// Extra time for late rows after the first match appears
const SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Aborts the browser's handler task when dropped, including when the
/// caller's timeout cancels the render midway.
struct HandlerGuard(JoinHandle<()>);

impl Drop for HandlerGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Launch a browser, load `url`, wait for `wait_for` and return the page HTML.
/// The caller bounds the whole call with a timeout.
pub async fn render_page(url: &str, wait_for: &str, user_agent: &str) -> Result<String> {
    let config = BrowserConfig::builder()
        .no_sandbox()
        .arg("--headless=new")
        .arg("--disable-gpu")
        .arg("--disable-dev-shm-usage")
        .arg("--no-first-run")
        .arg("--disable-extensions")
        .arg(format!("--user-agent={user_agent}"))
        .window_size(1920, 1080)
        .build()
        .map_err(ScraperError::Render)?;

    let (mut browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| ScraperError::Render(format!("failed to launch browser: {e}")))?;

    // The handler must be polled for the browser to make progress.
    let _handler = HandlerGuard(tokio::spawn(async move {
        while handler.next().await.is_some() {}
    }));

    let result = load_and_wait(&browser, url, wait_for).await;

    let _ = browser.close().await;
    result
}

async fn load_and_wait(browser: &Browser, url: &str, wait_for: &str) -> Result<String> {
    info!(url, "Rendering page");
    let page = browser
        .new_page(url)
        .await
        .map_err(|e| ScraperError::Render(format!("failed to open page: {e}")))?;

    while page.find_element(wait_for).await.is_err() {
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    debug!(url, selector = wait_for, "Awaited markup is present");
    tokio::time::sleep(SETTLE_DELAY).await;

    let html = page
        .content()
        .await
        .map_err(|e| ScraperError::Render(format!("failed to read page content: {e}")))?;
    let _ = page.close().await;
    Ok(html)
}
