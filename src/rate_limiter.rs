use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Fixed politeness delay between consecutive requests to the same host.
///
/// Each caller reserves the next free slot for its host while holding the
/// lock, then sleeps outside of it, so concurrent requests queue up one
/// delay apart instead of firing together.
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    /// Wait until a request to `host` is allowed.
    pub async fn acquire(&self, host: &str) {
        if self.delay.is_zero() {
            return;
        }

        let wait = {
            let mut slots = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = slots.get(host).copied().filter(|s| *s > now).unwrap_or(now);
            slots.insert(host.to_string(), slot + self.delay);
            slot.saturating_duration_since(now)
        };

        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_millis(200));
        let start = Instant::now();
        limiter.acquire("www.hellotickets.com").await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_same_host_waits_for_delay() {
        let limiter = RateLimiter::new(Duration::from_millis(60));
        let start = Instant::now();
        limiter.acquire("www.vividseats.com").await;
        limiter.acquire("www.vividseats.com").await;
        limiter.acquire("www.vividseats.com").await;
        assert!(start.elapsed() >= Duration::from_millis(120));
    }

    #[tokio::test]
    async fn test_hosts_are_independent() {
        let limiter = RateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();
        limiter.acquire("www.hellotickets.com").await;
        limiter.acquire("www.vividseats.com").await;
        limiter.acquire("www.sport365.com").await;
        assert!(start.elapsed() < Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_zero_delay_never_waits() {
        let limiter = RateLimiter::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire("example.com").await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
