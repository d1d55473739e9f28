//! Process-wide game counters.
use std::sync::atomic::{AtomicU64, Ordering};

static ROUNDS_STARTED: AtomicU64 = AtomicU64::new(0);
static ROUNDS_WON: AtomicU64 = AtomicU64::new(0);
static ROUNDS_LOST: AtomicU64 = AtomicU64::new(0);
static FETCH_FAILURES: AtomicU64 = AtomicU64::new(0);
static SCORES_SUBMITTED: AtomicU64 = AtomicU64::new(0);

pub fn inc_rounds_started() {
    ROUNDS_STARTED.fetch_add(1, Ordering::Relaxed);
}
pub fn inc_rounds_won() {
    ROUNDS_WON.fetch_add(1, Ordering::Relaxed);
}
pub fn inc_rounds_lost() {
    ROUNDS_LOST.fetch_add(1, Ordering::Relaxed);
}
pub fn inc_fetch_failures() {
    FETCH_FAILURES.fetch_add(1, Ordering::Relaxed);
}
pub fn inc_scores_submitted() {
    SCORES_SUBMITTED.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub rounds_started: u64,
    pub rounds_won: u64,
    pub rounds_lost: u64,
    pub fetch_failures: u64,
    pub scores_submitted: u64,
}

impl Snapshot {
    pub fn summary(&self) -> String {
        format!(
            "rounds={} won={} lost={} fetch_failures={} submitted={}",
            self.rounds_started,
            self.rounds_won,
            self.rounds_lost,
            self.fetch_failures,
            self.scores_submitted
        )
    }
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        rounds_started: ROUNDS_STARTED.load(Ordering::Relaxed),
        rounds_won: ROUNDS_WON.load(Ordering::Relaxed),
        rounds_lost: ROUNDS_LOST.load(Ordering::Relaxed),
        fetch_failures: FETCH_FAILURES.load(Ordering::Relaxed),
        scores_submitted: SCORES_SUBMITTED.load(Ordering::Relaxed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Counters are global and other tests bump them concurrently, so only check monotonicity.
    #[test]
    fn counters_only_grow() {
        let before = snapshot();
        inc_rounds_started();
        inc_rounds_won();
        let after = snapshot();
        assert!(after.rounds_started > before.rounds_started);
        assert!(after.rounds_won > before.rounds_won);
        assert!(after.summary().starts_with("rounds="));
    }
}
