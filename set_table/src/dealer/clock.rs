//! Round deadline owned by the dealer.

use std::time::Duration;
use tokio::time::Instant;

/// Round countdown. The deadline only ever moves forward.
#[derive(Debug, Clone, Copy)]
pub struct RoundClock {
    deadline: Instant,
    timeout: Duration,
    warning: Duration,
}

impl RoundClock {
    /// A clock that has already expired; the first `extend` starts the round
    pub fn new(timeout: Duration, warning: Duration) -> Self {
        Self {
            deadline: Instant::now(),
            timeout,
            warning,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Push the deadline to `now + timeout`, unless it is already later
    pub fn extend(&mut self) -> Instant {
        let candidate = Instant::now() + self.timeout;
        if candidate > self.deadline {
            self.deadline = candidate;
        }
        self.deadline
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Inside the warning window at the end of the round
    pub fn in_warning(&self) -> bool {
        self.remaining() <= self.warning
    }
}
