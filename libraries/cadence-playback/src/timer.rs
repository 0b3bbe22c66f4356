//! Progress timer
//!
//! A deadline-based periodic scheduler. It does not own a thread; whoever runs the
//! loop asks how long to wait (`time_until_due`) and whether a tick is due (`poll`).

use std::time::{Duration, Instant};

/// Periodic progress timer, armed while playing
#[derive(Debug, Clone)]
pub struct ProgressTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl ProgressTimer {
    /// Create a disarmed timer
    ///
    /// A zero interval is bumped to 1ms so the loop never spins.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            deadline: None,
        }
    }

    /// Arm (or re-arm) the timer; the first tick is one interval from `now`
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left until the next tick, `None` when disarmed
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Check whether a tick is due at `now`
    ///
    /// When it is, the deadline moves to the first interval boundary after `now`.
    /// Ticks missed while the loop was busy are dropped rather than replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }

        let mut next = deadline + self.interval;
        while next <= now {
            next += self.interval;
        }
        self.deadline = Some(next);
        true
    }
}

impl Default for ProgressTimer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disarmed_timer_never_fires() {
        let mut timer = ProgressTimer::default();
        let now = Instant::now();
        assert!(!timer.is_armed());
        assert_eq!(timer.time_until_due(now), None);
        assert!(!timer.poll(now + Duration::from_secs(10)));
    }

    #[test]
    fn fires_once_per_interval() {
        let mut timer = ProgressTimer::new(Duration::from_secs(1));
        let start = Instant::now();
        timer.arm(start);

        assert!(!timer.poll(start + Duration::from_millis(999)));
        assert!(timer.poll(start + Duration::from_secs(1)));
        assert!(!timer.poll(start + Duration::from_millis(1500)));
        assert!(timer.poll(start + Duration::from_secs(2)));
    }

    #[test]
    fn missed_ticks_are_skipped() {
        let mut timer = ProgressTimer::new(Duration::from_secs(1));
        let start = Instant::now();
        timer.arm(start);

        // Loop stalled for 5.5 seconds: one tick, then the next boundary is 6s
        assert!(timer.poll(start + Duration::from_millis(5500)));
        assert!(!timer.poll(start + Duration::from_millis(5900)));
        assert_eq!(
            timer.time_until_due(start + Duration::from_millis(5500)),
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn rearm_restarts_the_period() {
        let mut timer = ProgressTimer::new(Duration::from_secs(1));
        let start = Instant::now();
        timer.arm(start);
        timer.arm(start + Duration::from_millis(800));

        assert!(!timer.poll(start + Duration::from_secs(1)));
        assert!(timer.poll(start + Duration::from_millis(1800)));
    }

    #[test]
    fn disarm_cancels_pending_tick() {
        let mut timer = ProgressTimer::default();
        let start = Instant::now();
        timer.arm(start);
        timer.disarm();
        assert!(!timer.poll(start + Duration::from_secs(2)));
    }

    #[test]
    fn zero_interval_is_clamped() {
        let timer = ProgressTimer::new(Duration::ZERO);
        assert_eq!(timer.interval(), Duration::from_millis(1));
    }
}
