use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::FixedWindowRateLimiter;

/// Periodically evicts idle visitors from a set of limiters, independent of
/// request traffic. Stops when its cancellation token fires.
pub struct RateLimitSweeper {
    limiters: Vec<Arc<FixedWindowRateLimiter>>,
    period: Duration,
}

impl RateLimitSweeper {
    pub fn new(limiters: Vec<Arc<FixedWindowRateLimiter>>, period: Duration) -> Self {
        Self { limiters, period }
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; nothing can be stale yet.
        ticker.tick().await;

        info!(
            period_secs = self.period.as_secs(),
            limiters = self.limiters.len(),
            "Rate limit sweeper started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    for limiter in &self.limiters {
                        let removed = limiter.sweep();
                        debug!(limiter = limiter.name(), removed, "Sweep finished");
                    }
                }
            }
        }

        info!("Rate limit sweeper stopped");
    }
}
