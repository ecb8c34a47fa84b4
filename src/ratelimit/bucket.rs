//! Per-invoker bucket state.

use std::time::{Duration, Instant};

use super::RateWindow;

#[derive(Debug)]
struct WindowState {
    limit: RateWindow,
    remaining: u32,
    /// Start of the current window; `None` until the first call.
    opened_at: Option<Instant>,
}

impl WindowState {
    fn new(limit: RateWindow) -> Self {
        Self {
            limit,
            remaining: limit.rate,
            opened_at: None,
        }
    }

    fn refresh(&mut self, now: Instant) {
        let expired = self
            .opened_at
            .is_some_and(|opened| now.saturating_duration_since(opened) >= self.limit.per);
        if expired {
            self.remaining = self.limit.rate;
            self.opened_at = None;
        }
    }

    fn retry_after(&self, now: Instant) -> Option<Duration> {
        if self.remaining > 0 {
            return None;
        }
        Some(match self.opened_at {
            Some(opened) => self
                .limit
                .per
                .saturating_sub(now.saturating_duration_since(opened)),
            None => self.limit.per,
        })
    }

    fn consume(&mut self, now: Instant) {
        self.opened_at.get_or_insert(now);
        self.remaining -= 1;
    }
}

/// A rejected call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    pub retry_after: Duration,
    /// First rejection of this cooldown; later ones until it ends are not.
    pub first: bool,
}

/// Fixed-window counters, one per configured window.
///
/// A call is admitted only if every window has room; a rejected call
/// consumes nothing.
#[derive(Debug)]
pub struct Bucket {
    windows: Vec<WindowState>,
    /// End of the cooldown the last first rejection reported.
    cooldown_until: Option<Instant>,
}

impl Bucket {
    pub fn new(limits: &[RateWindow]) -> Self {
        Self {
            windows: limits.iter().copied().map(WindowState::new).collect(),
            cooldown_until: None,
        }
    }

    /// Admit a call at `now`, or return how long until one would be.
    pub fn try_acquire(&mut self, now: Instant) -> Result<(), Cooldown> {
        for window in &mut self.windows {
            window.refresh(now);
        }

        if let Some(retry_after) = self
            .windows
            .iter()
            .filter_map(|w| w.retry_after(now))
            .max()
        {
            let first = self.cooldown_until.is_none_or(|until| now >= until);
            if first {
                self.cooldown_until = Some(now + retry_after);
            }
            return Err(Cooldown { retry_after, first });
        }

        for window in &mut self.windows {
            window.consume(now);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    fn retry_after(bucket: &mut Bucket, at: Instant) -> Option<Duration> {
        bucket.try_acquire(at).err().map(|c| c.retry_after)
    }

    #[test]
    fn test_second_call_in_burst_is_rejected() {
        let start = Instant::now();
        let mut bucket = Bucket::new(&[RateWindow::per_secs(1, 3)]);

        assert_eq!(bucket.try_acquire(start), Ok(()));

        let cooldown = bucket.try_acquire(start + secs(0.5)).unwrap_err();
        assert_eq!(cooldown.retry_after, secs(2.5));
        assert!(cooldown.first);
    }

    #[test]
    fn test_window_reopens_after_period() {
        let start = Instant::now();
        let mut bucket = Bucket::new(&[RateWindow::per_secs(1, 3)]);

        assert!(bucket.try_acquire(start).is_ok());
        assert!(bucket.try_acquire(start + secs(2.9)).is_err());
        assert!(bucket.try_acquire(start + secs(3.0)).is_ok());
    }

    #[test]
    fn test_sustained_window_limits_spaced_calls() {
        let start = Instant::now();
        let mut bucket = Bucket::new(&[RateWindow::per_secs(3, 1), RateWindow::per_secs(5, 60)]);

        for _ in 0..3 {
            assert!(bucket.try_acquire(start).is_ok());
        }
        // Burst window full.
        assert_eq!(retry_after(&mut bucket, start), Some(secs(1.0)));

        assert!(bucket.try_acquire(start + secs(1.0)).is_ok());
        assert!(bucket.try_acquire(start + secs(1.0)).is_ok());

        // Burst has room again, sustained does not.
        assert_eq!(retry_after(&mut bucket, start + secs(2.0)), Some(secs(58.0)));
    }

    #[test]
    fn test_rejected_call_consumes_nothing() {
        let start = Instant::now();
        let mut bucket = Bucket::new(&[RateWindow::per_secs(1, 3), RateWindow::per_secs(2, 60)]);

        assert!(bucket.try_acquire(start).is_ok());
        assert!(bucket.try_acquire(start + secs(1.0)).is_err());
        // The rejected call above did not use the sustained allowance.
        assert!(bucket.try_acquire(start + secs(3.0)).is_ok());
        assert_eq!(retry_after(&mut bucket, start + secs(6.0)), Some(secs(54.0)));
    }

    #[test]
    fn test_zero_rate_always_rejects() {
        let mut bucket = Bucket::new(&[RateWindow::per_secs(0, 5)]);
        assert_eq!(retry_after(&mut bucket, Instant::now()), Some(secs(5.0)));
    }

    #[test]
    fn test_only_first_rejection_of_a_cooldown_is_flagged() {
        let start = Instant::now();
        let mut bucket = Bucket::new(&[RateWindow::per_secs(1, 3)]);
        assert!(bucket.try_acquire(start).is_ok());

        let flags: Vec<bool> = (1..20)
            .map(|i| bucket.try_acquire(start + secs(0.1 * i as f64)).unwrap_err().first)
            .collect();
        assert!(flags[0]);
        assert!(flags[1..].iter().all(|first| !first));

        // Next cooldown gets its own notice.
        assert!(bucket.try_acquire(start + secs(3.0)).is_ok());
        assert!(bucket.try_acquire(start + secs(3.5)).unwrap_err().first);
    }
}
