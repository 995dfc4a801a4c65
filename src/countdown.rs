use std::time::{Duration, Instant};

/// Single-shot deadline for one question.
///
/// Holding the question index lets the owner drop a countdown that outlived
/// its question instead of firing it against the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    question_index: usize,
    limit: Duration,
    deadline: Instant,
}

impl Countdown {
    pub fn start(question_index: usize, limit: Duration, now: Instant) -> Self {
        Self {
            question_index,
            limit,
            deadline: now + limit,
        }
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Whole seconds left, rounded up so the display reaches 0 only on expiry.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        let remaining = self.remaining(now);
        let secs = remaining.as_secs();
        if remaining.subsec_nanos() > 0 { secs + 1 } else { secs }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}
