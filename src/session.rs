/// Scoreboard for one round. Every mutation goes through `Round`; the UI
/// only ever reads a snapshot of this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub time_remaining: u64,
    pub clean_taps: u32,
    pub dirty_taps: u32,
    pub running: bool,
}

impl SessionState {
    /// State at the moment a round starts: everything zeroed, the clock
    /// loaded, and the running flag raised.
    pub fn fresh(round_seconds: u64) -> Self {
        Self {
            time_remaining: round_seconds,
            running: true,
            ..Self::default()
        }
    }

    /// Fraction of the milestone threshold reached, capped at 1.0 so it
    /// can feed a gauge directly.
    pub fn milestone_progress(&self, threshold: u32) -> f64 {
        if threshold == 0 {
            return 1.0;
        }

        (self.score as f64 / threshold as f64).min(1.0)
    }
}
