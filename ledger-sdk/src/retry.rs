//! Retry policies
//!
//! Two independent policies:
//!
//! - [`ExponentialBackoff`] paces the attempts of a single request against
//!   nodes that are unreachable, busy, or have not reached consensus yet.
//! - [`CongestionPolicy`] paces resubmission of a whole transaction under a
//!   new id after the network reports congestion at consensus.

use std::time::Duration;

/// Doubling delay between attempts of one request, capped at a maximum
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    current: Duration,
    max: Duration,
}

impl ExponentialBackoff {
    /// Start at `min`, never exceed `max`
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            current: min.min(max),
            max,
        }
    }

    /// Delay to wait before the next attempt
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }
}

/// Resubmission budget for transactions throttled at consensus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CongestionPolicy {
    /// Congested receipts tolerated before giving up
    pub max_attempts: u32,
    /// Delay before the first resubmission
    pub initial_backoff: Duration,
    /// Upper bound on any single delay
    pub max_backoff: Duration,
}

impl CongestionPolicy {
    /// Create the per-operation state for this policy
    pub fn start(&self) -> CongestionBackoff {
        CongestionBackoff {
            policy: *self,
            attempts: 0,
            backoff: self.initial_backoff,
        }
    }
}

impl Default for CongestionPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_millis(8000),
        }
    }
}

/// Congestion state of one `get_receipt` call
#[derive(Debug, Clone)]
pub struct CongestionBackoff {
    policy: CongestionPolicy,
    attempts: u32,
    backoff: Duration,
}

impl CongestionBackoff {
    /// Record one congested receipt.
    ///
    /// Returns the delay to wait before resubmitting, or `None` once the
    /// attempt budget is spent.
    pub fn on_congestion(&mut self) -> Option<Duration> {
        self.attempts += 1;
        if self.attempts >= self.policy.max_attempts {
            return None;
        }

        let delay = self.backoff.min(self.policy.max_backoff);
        self.backoff = self.backoff.saturating_mul(2);
        Some(delay)
    }

    /// Congested receipts seen so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_backoff() {
        let mut backoff =
            ExponentialBackoff::new(Duration::from_millis(250), Duration::from_millis(1000));

        assert_eq!(backoff.next_delay().as_millis(), 250);
        assert_eq!(backoff.next_delay().as_millis(), 500);
        assert_eq!(backoff.next_delay().as_millis(), 1000);
        assert_eq!(backoff.next_delay().as_millis(), 1000);
    }

    #[test]
    fn test_min_above_max_is_capped() {
        let mut backoff = ExponentialBackoff::new(Duration::from_secs(10), Duration::from_secs(1));
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_congestion_schedule() {
        let mut state = CongestionPolicy::default().start();

        assert_eq!(state.on_congestion(), Some(Duration::from_millis(250)));
        assert_eq!(state.on_congestion(), Some(Duration::from_millis(500)));
        assert_eq!(state.on_congestion(), Some(Duration::from_millis(1000)));
        assert_eq!(state.on_congestion(), Some(Duration::from_millis(2000)));
        assert_eq!(state.on_congestion(), None);
        assert_eq!(state.attempts(), 5);
    }

    #[test]
    fn test_congestion_delay_cap() {
        let policy = CongestionPolicy {
            max_attempts: 10,
            ..CongestionPolicy::default()
        };
        let mut state = policy.start();
        let delays: Vec<_> = std::iter::from_fn(|| state.on_congestion()).collect();

        assert_eq!(delays.len(), 9);
        assert_eq!(delays[5], Duration::from_millis(8000));
        assert!(delays.iter().all(|d| *d <= Duration::from_millis(8000)));
    }
}
