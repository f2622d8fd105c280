use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::{task::JoinHandle, time::sleep};
use tracing::debug;

use crate::settings::ContactLimitConfig;

/// A token bucket which allows fractional tokens for precise refill
#[derive(Debug)]
struct TokenBucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, refill_per_sec: f64, now: Instant) -> Self {
        Self {
            capacity,
            tokens: capacity,
            refill_per_sec,
            last_refill: now,
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
            self.last_refill = now;
        }
    }

    /// Small epsilon to avoid fp surprises
    fn has_token(&self) -> bool {
        self.tokens + 1e-12 >= 1.0
    }

    fn consume(&mut self) {
        self.tokens = (self.tokens - 1.0).max(0.0);
    }

    /// Seconds until one whole token is available
    fn wait_secs(&self) -> u64 {
        let needed = 1.0 - self.tokens;
        if needed <= 0.0 || self.refill_per_sec <= 0.0 {
            return 1;
        }
        ((needed / self.refill_per_sec).ceil() as u64).max(1)
    }
}

/// Sliding window counter weighted by the previous window's count
#[derive(Debug)]
struct SlidingWindow {
    window_size: Duration,
    limit: u64,
    current_window_start: Instant,
    current_count: u64,
    prev_count: u64,
}

impl SlidingWindow {
    fn new(window_size: Duration, limit: u64, now: Instant) -> Self {
        Self {
            window_size,
            limit,
            current_window_start: now,
            current_count: 0,
            prev_count: 0,
        }
    }

    fn roll(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.current_window_start);
        if elapsed >= self.window_size * 2 {
            self.prev_count = 0;
            self.current_count = 0;
            self.current_window_start = now;
        } else if elapsed >= self.window_size {
            self.prev_count = self.current_count;
            self.current_count = 0;
            self.current_window_start += self.window_size;
        }
    }

    fn effective(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.current_window_start);
        let weight = (elapsed.as_secs_f64() / self.window_size.as_secs_f64()).min(1.0);
        (self.prev_count as f64) * (1.0 - weight) + (self.current_count as f64)
    }

    fn has_room(&self, now: Instant) -> bool {
        self.effective(now) < self.limit as f64
    }

    fn record(&mut self) {
        self.current_count += 1;
    }

    /// Seconds until the current window rolls over
    fn wait_secs(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.current_window_start);
        self.window_size.saturating_sub(elapsed).as_secs().max(1)
    }
}

/// Both the burst bucket and the hourly window must have room.
#[derive(Debug)]
struct HybridLimiter {
    bucket: TokenBucket,
    window: SlidingWindow,
    last_seen: Instant,
}

impl HybridLimiter {
    fn new(config: &ContactLimitConfig, now: Instant) -> Self {
        Self {
            bucket: TokenBucket::new(config.capacity, config.refill_per_sec, now),
            window: SlidingWindow::new(config.window(), config.limit, now),
            last_seen: now,
        }
    }

    fn check(&mut self, now: Instant) -> RateDecision {
        self.last_seen = now;
        self.bucket.refill(now);
        self.window.roll(now);

        let bucket_ok = self.bucket.has_token();
        let window_ok = self.window.has_room(now);

        if bucket_ok && window_ok {
            self.bucket.consume();
            self.window.record();
            return RateDecision::allowed();
        }

        let mut retry_after = 0;
        if !bucket_ok {
            retry_after = retry_after.max(self.bucket.wait_secs());
        }
        if !window_ok {
            retry_after = retry_after.max(self.window.wait_secs(now));
        }

        RateDecision {
            allowed: false,
            retry_after: Some(retry_after),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub retry_after: Option<u64>,
}

impl RateDecision {
    fn allowed() -> Self {
        Self {
            allowed: true,
            retry_after: None,
        }
    }
}

type Key = String;

/// Per-client limiter map shared by all workers.
#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<Key, Arc<Mutex<HybridLimiter>>>>,
    config: ContactLimitConfig,
    idle_ttl: Duration,
}

impl RateLimiterStore {
    pub fn new(config: ContactLimitConfig) -> Self {
        // An idle client's window has fully drained after two window lengths.
        let idle_ttl = config.window() * 2;
        Self {
            map: Arc::new(DashMap::new()),
            config,
            idle_ttl,
        }
    }

    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let limiter = self
            .map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(HybridLimiter::new(&self.config, now))))
            .clone();

        let mut guard = limiter.lock();
        guard.check(now)
    }

    pub fn tracked_clients(&self) -> usize {
        self.map.len()
    }

    fn evict_idle(&self, now: Instant) -> usize {
        let before = self.map.len();
        let ttl = self.idle_ttl;
        self.map
            .retain(|_, limiter| now.saturating_duration_since(limiter.lock().last_seen) <= ttl);
        before.saturating_sub(self.map.len())
    }

    /// Drops limiters that have been idle longer than the TTL, every `interval`.
    pub fn spawn_eviction(&self, interval: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            loop {
                sleep(interval).await;
                let evicted = store.evict_idle(Instant::now());
                if evicted > 0 {
                    debug!(evicted, remaining = store.tracked_clients(), "Evicted idle rate limiters");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(capacity: f64, refill_per_sec: f64, window_secs: u64, limit: u64) -> ContactLimitConfig {
        ContactLimitConfig {
            capacity,
            refill_per_sec,
            window_secs,
            limit,
        }
    }

    #[test]
    fn burst_beyond_capacity_is_rejected() {
        let store = RateLimiterStore::new(config(3.0, 0.05, 3600, 10));
        let now = Instant::now();

        for _ in 0..3 {
            assert!(store.check_at("1.2.3.4", now).allowed);
        }
        let rejected = store.check_at("1.2.3.4", now);
        assert!(!rejected.allowed);
        assert_eq!(rejected.retry_after, Some(20));
    }

    #[test]
    fn clients_are_limited_independently() {
        let store = RateLimiterStore::new(config(1.0, 0.0, 3600, 10));
        let now = Instant::now();

        assert!(store.check_at("a", now).allowed);
        assert!(!store.check_at("a", now).allowed);
        assert!(store.check_at("b", now).allowed);
    }

    #[test]
    fn tokens_refill_over_time() {
        let store = RateLimiterStore::new(config(1.0, 0.5, 3600, 10));
        let now = Instant::now();

        assert!(store.check_at("a", now).allowed);
        assert!(!store.check_at("a", now).allowed);
        assert!(store.check_at("a", now + Duration::from_secs(2)).allowed);
    }

    #[test]
    fn window_caps_total_even_with_tokens() {
        let store = RateLimiterStore::new(config(100.0, 1.0, 60, 2));
        let now = Instant::now();

        assert!(store.check_at("a", now).allowed);
        assert!(store.check_at("a", now).allowed);
        let rejected = store.check_at("a", now + Duration::from_secs(10));
        assert!(!rejected.allowed);
        assert_eq!(rejected.retry_after, Some(50));
    }

    #[test]
    fn idle_clients_are_evicted() {
        let store = RateLimiterStore::new(config(3.0, 0.05, 60, 10));
        let now = Instant::now();
        store.check_at("a", now);
        store.check_at("b", now + Duration::from_secs(100));

        let evicted = store.evict_idle(now + Duration::from_secs(150));

        assert_eq!(evicted, 1);
        assert_eq!(store.tracked_clients(), 1);
    }
}
