//! Per-client token bucket admission control.
//!
//! Each client identifier (normally the client IP) owns a bucket holding up
//! to `burst_size` tokens that refills continuously at
//! `requests_per_minute / 60` tokens per second. Every admitted request spends
//! one token; a request arriving at an empty bucket is rejected without
//! spending anything.
//!
//! Buckets live in a sharded [`DashMap`]; `admit` holds the shard lock for the
//! key it touches, so concurrent checks for the same client never lose an
//! update. A background sweep evicts buckets idle for longer than the cleanup
//! interval. The sweep stops when [`TokenBucketLimiter::stop`] is called or
//! when the last limiter handle is dropped.
//!
//! Time is read from [`tokio::time::Instant`], so tests can drive refill and
//! eviction with a paused runtime clock.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Default idle window and sweep period.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Token bucket parameters shared by every client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimiterConfig {
    pub requests_per_minute: u32,
    pub burst_size: u32,
    pub cleanup_interval: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            burst_size: 10,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ClientRecord {
    tokens: f64,
    last_refill: Instant,
}

#[derive(Debug)]
struct Registry {
    clients: DashMap<String, ClientRecord>,
    refill_per_sec: f64,
    burst: f64,
    idle_window: Duration,
}

impl Registry {
    fn new(config: &RateLimiterConfig) -> Self {
        Self {
            clients: DashMap::new(),
            refill_per_sec: f64::from(config.requests_per_minute) / 60.0,
            burst: f64::from(config.burst_size),
            idle_window: config.cleanup_interval,
        }
    }

    fn admit(&self, client_id: &str, now: Instant) -> bool {
        match self.clients.entry(client_id.to_owned()) {
            Entry::Vacant(slot) => {
                // The admitting request spends its token immediately.
                slot.insert(ClientRecord {
                    tokens: self.burst - 1.0,
                    last_refill: now,
                });
                true
            }
            Entry::Occupied(mut slot) => {
                let record = slot.get_mut();
                let elapsed = now.saturating_duration_since(record.last_refill);
                record.tokens =
                    (record.tokens + elapsed.as_secs_f64() * self.refill_per_sec).min(self.burst);
                record.last_refill = now;

                if record.tokens >= 1.0 {
                    record.tokens -= 1.0;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn evict_idle(&self, now: Instant) -> usize {
        let mut evicted = 0;
        self.clients.retain(|_, record| {
            let keep = now.saturating_duration_since(record.last_refill) <= self.idle_window;
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }
}

/// Shared handle to the per-client token buckets.
///
/// Cloning is cheap; all clones see the same buckets. Construct one per
/// server (or per test) and pass it to request handlers explicitly.
#[derive(Debug, Clone)]
pub struct TokenBucketLimiter {
    registry: Arc<Registry>,
    config: RateLimiterConfig,
    stop_tx: Arc<watch::Sender<bool>>,
}

impl TokenBucketLimiter {
    /// Creates the limiter and spawns its eviction sweep.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn new(config: RateLimiterConfig) -> Self {
        let registry = Arc::new(Registry::new(&config));
        let (stop_tx, stop_rx) = watch::channel(false);

        tokio::spawn(run_cleanup(
            Arc::downgrade(&registry),
            config.cleanup_interval,
            stop_rx,
        ));

        Self {
            registry,
            config,
            stop_tx: Arc::new(stop_tx),
        }
    }

    /// Decides whether a request from `client_id` may proceed.
    ///
    /// Never fails: exhaustion is reported only as `false`, which callers
    /// translate into a 429 response.
    pub fn admit(&self, client_id: &str) -> bool {
        self.registry.admit(client_id, Instant::now())
    }

    /// Runs one eviction pass immediately and returns the number of removed buckets.
    pub fn sweep(&self) -> usize {
        self.registry.evict_idle(Instant::now())
    }

    /// Number of clients currently holding a bucket.
    pub fn tracked_clients(&self) -> usize {
        self.registry.clients.len()
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Signals the eviction sweep to terminate. Idempotent.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    /// Returns true while the eviction sweep is still alive.
    pub fn is_sweeping(&self) -> bool {
        !self.stop_tx.is_closed()
    }
}

async fn run_cleanup(registry: Weak<Registry>, period: Duration, mut stop_rx: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(registry) = registry.upgrade() else {
                    break;
                };
                let evicted = registry.evict_idle(Instant::now());
                if evicted > 0 {
                    debug!(
                        evicted,
                        remaining = registry.clients.len(),
                        "Evicted idle rate limit buckets"
                    );
                }
            }
            changed = stop_rx.changed() => {
                // An error means every limiter handle has been dropped.
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
        }
    }

    debug!("Rate limiter sweep stopped");
}
