//! Fail-fast sliding-window rate limiter for generation calls.
//!
//! The limiter keeps timestamps of recent admitted calls in a deque behind a
//! mutex. An attempt evicts expired timestamps, checks the remaining count
//! against the cap, and records the new call, all inside one lock hold so
//! concurrent attempts can never over-admit. Denied attempts are not queued
//! and leave no timestamp behind.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sliding-window rate limiter. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    period: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter admitting at most `max_calls` per `period`.
    ///
    /// A `max_calls` of zero denies every attempt.
    pub fn new(max_calls: usize, period: Duration) -> Self {
        Self {
            max_calls,
            period,
            calls: Mutex::new(VecDeque::with_capacity(max_calls)),
        }
    }

    /// Limiter with the system defaults (10 calls per 60 seconds).
    pub fn with_defaults() -> Self {
        Self::new(
            crate::defaults::RATE_LIMIT_CALLS,
            Duration::from_secs(crate::defaults::RATE_LIMIT_PERIOD_SECS),
        )
    }

    /// Maximum admissions per window.
    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    /// Window length.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Try to admit one call right now. Returns `true` when admitted.
    ///
    /// Fail-fast: a denied call returns immediately and is never retried or
    /// queued by the limiter itself.
    pub fn attempt(&self) -> bool {
        self.attempt_at(Instant::now())
    }

    /// Number of admissions still recorded in the current window.
    pub fn in_flight(&self) -> usize {
        let mut calls = match self.calls.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();
        Self::evict(&mut calls, now, self.period);
        calls.len()
    }

    // Deterministic seam for window tests. Timestamps must be fed in
    // monotonically non-decreasing order, which Instant::now() guarantees
    // for the public path.
    fn attempt_at(&self, now: Instant) -> bool {
        let mut calls = match self.calls.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        Self::evict(&mut calls, now, self.period);

        if calls.len() >= self.max_calls {
            tracing::warn!(
                component = "limiter",
                op = "attempt",
                max_calls = self.max_calls,
                period_secs = self.period.as_secs(),
                "rate limit window full, call denied"
            );
            return false;
        }

        calls.push_back(now);
        true
    }

    fn evict(calls: &mut VecDeque<Instant>, now: Instant, period: Duration) {
        while let Some(front) = calls.front() {
            // duration_since saturates to zero for later fronts, so only
            // genuinely expired entries satisfy >= period.
            if now.duration_since(*front) >= period {
                calls.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn admits_up_to_max_calls() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let t0 = Instant::now();

        assert!(limiter.attempt_at(t0));
        assert!(limiter.attempt_at(t0));
        assert!(limiter.attempt_at(t0));
        assert!(!limiter.attempt_at(t0));
    }

    #[test]
    fn denied_attempt_leaves_no_timestamp() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let t0 = Instant::now();

        assert!(limiter.attempt_at(t0));
        // Hammer the full window; none of these may extend the window.
        for i in 1..=10 {
            assert!(!limiter.attempt_at(t0 + Duration::from_secs(i)));
        }
        // First admission expires exactly one period after t0.
        assert!(limiter.attempt_at(t0 + Duration::from_secs(60)));
    }

    #[test]
    fn window_slides_per_timestamp() {
        let limiter = RateLimiter::new(2, Duration::from_secs(10));
        let t0 = Instant::now();

        assert!(limiter.attempt_at(t0));
        assert!(limiter.attempt_at(t0 + Duration::from_secs(5)));
        assert!(!limiter.attempt_at(t0 + Duration::from_secs(9)));
        // t0 falls out at t0+10; the t0+5 admission remains.
        assert!(limiter.attempt_at(t0 + Duration::from_secs(10)));
        assert!(!limiter.attempt_at(t0 + Duration::from_secs(14)));
        assert!(limiter.attempt_at(t0 + Duration::from_secs(15)));
    }

    #[test]
    fn zero_max_calls_denies_everything() {
        let limiter = RateLimiter::new(0, Duration::from_secs(60));
        assert!(!limiter.attempt());
        assert!(!limiter.attempt());
    }

    #[test]
    fn in_flight_tracks_window() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        assert_eq!(limiter.in_flight(), 0);
        assert!(limiter.attempt());
        assert!(limiter.attempt());
        assert_eq!(limiter.in_flight(), 2);
    }

    #[test]
    fn concurrent_attempts_admit_exactly_max_calls() {
        let limiter = Arc::new(RateLimiter::new(10, Duration::from_secs(60)));
        let admitted = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let admitted = Arc::clone(&admitted);
                std::thread::spawn(move || {
                    if limiter.attempt() {
                        admitted.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(admitted.load(Ordering::SeqCst), 10);
        assert_eq!(limiter.in_flight(), 10);
    }

    #[test]
    fn defaults_match_constants() {
        let limiter = RateLimiter::with_defaults();
        assert_eq!(limiter.max_calls(), crate::defaults::RATE_LIMIT_CALLS);
        assert_eq!(
            limiter.period(),
            Duration::from_secs(crate::defaults::RATE_LIMIT_PERIOD_SECS)
        );
    }
}
