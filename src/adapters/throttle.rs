use std::time::Duration;
use tokio::sync::Mutex;

const MAX_BACKOFF_MS: u64 = 60_000;

const DESKTOP_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0",
];

/// Sleeps a randomized delay before every request to the listings site.
///
/// Each failure past the second doubles the delay, capped at one minute.
pub struct Throttle {
    min_interval_ms: u64,
    max_interval_ms: u64,
    state: Mutex<ThrottleState>,
}

struct ThrottleState {
    consecutive_failures: u32,
}

impl Throttle {
    pub fn new(min_interval_ms: u64, max_interval_ms: u64) -> Self {
        Self {
            min_interval_ms,
            max_interval_ms: max_interval_ms.max(min_interval_ms),
            state: Mutex::new(ThrottleState {
                consecutive_failures: 0,
            }),
        }
    }

    pub fn next_interval(&self, consecutive_failures: u32) -> Duration {
        let base = if self.max_interval_ms > self.min_interval_ms {
            rand::random_range(self.min_interval_ms..self.max_interval_ms)
        } else {
            self.min_interval_ms
        };

        if consecutive_failures > 2 {
            let multiplier = 2u64.saturating_pow(consecutive_failures - 2);
            Duration::from_millis(base.saturating_mul(multiplier).min(MAX_BACKOFF_MS))
        } else {
            Duration::from_millis(base)
        }
    }

    /// The full interval is slept each time, including before the first request
    /// and regardless of how long the previous request took.
    pub async fn wait(&self) -> Duration {
        let failures = self.state.lock().await.consecutive_failures;
        let interval = self.next_interval(failures);
        if !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
        interval
    }

    pub async fn record_failure(&self) {
        self.state.lock().await.consecutive_failures += 1;
    }

    pub async fn record_success(&self) {
        self.state.lock().await.consecutive_failures = 0;
    }

    pub async fn consecutive_failures(&self) -> u32 {
        self.state.lock().await.consecutive_failures
    }
}

pub fn random_user_agent() -> &'static str {
    DESKTOP_USER_AGENTS[rand::random_range(0..DESKTOP_USER_AGENTS.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_within_bounds() {
        let throttle = Throttle::new(100, 200);
        for _ in 0..50 {
            let interval = throttle.next_interval(0);
            assert!(interval >= Duration::from_millis(100));
            assert!(interval < Duration::from_millis(200));
        }
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let throttle = Throttle::new(1000, 1000);
        assert_eq!(throttle.next_interval(2), Duration::from_millis(1000));
        assert_eq!(throttle.next_interval(3), Duration::from_millis(2000));
        assert_eq!(throttle.next_interval(4), Duration::from_millis(4000));
        assert_eq!(throttle.next_interval(30), Duration::from_millis(MAX_BACKOFF_MS));
    }

    #[test]
    fn test_failure_counter_resets() {
        let throttle = Throttle::new(0, 0);
        tokio_test::block_on(async {
            throttle.record_failure().await;
            throttle.record_failure().await;
            assert_eq!(throttle.consecutive_failures().await, 2);
            throttle.record_success().await;
            assert_eq!(throttle.consecutive_failures().await, 0);
            throttle.wait().await;
        });
    }

    #[tokio::test]
    async fn test_every_wait_sleeps_full_interval() {
        let throttle = Throttle::new(40, 40);

        let started = std::time::Instant::now();
        assert_eq!(throttle.wait().await, Duration::from_millis(40));
        assert!(started.elapsed() >= Duration::from_millis(40));

        // 前一個請求花的時間不抵銷下一次的延遲
        tokio::time::sleep(Duration::from_millis(60)).await;
        let started = std::time::Instant::now();
        throttle.wait().await;
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_wait_backs_off_after_failures() {
        let throttle = Throttle::new(10, 10);
        for _ in 0..4 {
            throttle.record_failure().await;
        }
        assert_eq!(throttle.wait().await, Duration::from_millis(40));
    }

    #[test]
    fn test_user_agent_from_pool() {
        assert!(DESKTOP_USER_AGENTS.contains(&random_user_agent()));
    }
}
