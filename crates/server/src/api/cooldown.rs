//! Per-client cooldown for download submissions.
//!
//! The cloud account is shared, so one client must not be able to flood it
//! with offline-download tasks: a fixed window has to elapse between
//! submissions from the same IP.

use std::collections::HashMap;
use std::net::IpAddr;

use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

/// Tracks the last submission time per client IP.
pub struct CooldownTracker {
    window: Duration,
    last_seen: RwLock<HashMap<IpAddr, Instant>>,
}

impl CooldownTracker {
    /// Create a tracker with the given window. A zero window disables the
    /// cooldown entirely.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: RwLock::new(HashMap::new()),
        }
    }

    /// Record an attempt from `ip`.
    ///
    /// Returns `Ok(())` when the attempt is allowed (and starts a new
    /// window), or `Err(remaining)` with the time left in the current one.
    pub async fn try_acquire(&self, ip: IpAddr) -> Result<(), Duration> {
        if self.window.is_zero() {
            return Ok(());
        }

        let mut last_seen = self.last_seen.write().await;
        let now = Instant::now();

        if let Some(last) = last_seen.get(&ip) {
            let elapsed = now.duration_since(*last);
            if elapsed < self.window {
                return Err(self.window - elapsed);
            }
        }

        last_seen.insert(ip, now);
        Ok(())
    }
}
