//! Minimum-interval rate limiting for provider requests.

use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Enforces a minimum interval between consecutive requests.
///
/// The first request goes out immediately. Share one limiter behind
/// `Arc<tokio::sync::Mutex<_>>` to bound the request rate across tasks.
#[derive(Debug)]
pub struct RateLimiter {
    last_request: Option<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    /// Create a limiter with the given minimum interval.
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_request: None,
            min_interval,
        }
    }

    /// Minimum interval between requests.
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next request is allowed, then record it.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60));
        let start = Instant::now();
        limiter.wait().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_spaces_consecutive_requests() {
        let interval = Duration::from_millis(30);
        let mut limiter = RateLimiter::new(interval);
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;
        assert!(start.elapsed() >= interval * 2);
    }

    #[tokio::test]
    async fn test_zero_interval_never_sleeps() {
        let mut limiter = RateLimiter::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..100 {
            limiter.wait().await;
        }
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(limiter.min_interval(), Duration::ZERO);
    }
}
