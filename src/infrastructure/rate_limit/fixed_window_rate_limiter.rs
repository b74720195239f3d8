use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct VisitorRecord {
    last_seen: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client identity.
///
/// A client may make `limit` requests; the count resets to one on the first
/// request arriving more than `window` after the client was last seen. Denied
/// requests leave the record untouched.
pub struct FixedWindowRateLimiter {
    name: &'static str,
    limit: u32,
    window: Duration,
    visitors: Mutex<HashMap<String, VisitorRecord>>,
}

impl FixedWindowRateLimiter {
    pub fn new(name: &'static str, limit: u32, window: Duration) -> Self {
        Self {
            name,
            limit,
            window,
            visitors: Mutex::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn admit(&self, client_key: &str) -> bool {
        self.admit_at(client_key, Instant::now())
    }

    pub fn admit_at(&self, client_key: &str, now: Instant) -> bool {
        let mut visitors = self.visitors.lock();

        let Some(record) = visitors.get_mut(client_key) else {
            visitors.insert(
                client_key.to_string(),
                VisitorRecord {
                    last_seen: now,
                    count: 1,
                },
            );
            return true;
        };

        if now.saturating_duration_since(record.last_seen) > self.window {
            record.count = 1;
            record.last_seen = now;
            return true;
        }

        if record.count >= self.limit {
            return false;
        }

        record.count += 1;
        record.last_seen = now;
        true
    }

    /// Drops every record idle for longer than the window. Returns how many
    /// were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut visitors = self.visitors.lock();
        let before = visitors.len();
        visitors.retain(|_, record| now.saturating_duration_since(record.last_seen) <= self.window);
        let removed = before - visitors.len();

        if removed > 0 {
            debug!(limiter = self.name, removed, remaining = visitors.len(), "Evicted idle visitors");
        }
        removed
    }

    pub fn tracked_clients(&self) -> usize {
        self.visitors.lock().len()
    }

    pub fn request_count(&self, client_key: &str) -> Option<u32> {
        self.visitors.lock().get(client_key).map(|record| record.count)
    }
}
