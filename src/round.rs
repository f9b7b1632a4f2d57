use itertools::Itertools;
use std::time::{Duration, Instant};

use crate::config::GameConfig;
use crate::session::SessionState;
use crate::spawner::{SpawnEvent, Spawner, TargetKind};
use crate::util::{mean, std_dev};

/// What the round tells its presentation layer. Consumers only ever read
/// these; none of them call back into the round while handling one.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    StatsChanged(SessionState),
    TargetActivated { slot: usize, kind: TargetKind },
    TargetCleared { slot: usize },
    Miss,
    MilestoneCrossed,
    Ended(SessionState),
}

/// One timed round: scoreboard rules on top of the spawner, plus the
/// per-second countdown. All time comes in through method arguments.
#[derive(Debug)]
pub struct Round {
    pub config: GameConfig,
    pub state: SessionState,
    spawner: Spawner,
    countdown: Option<Instant>,
    reactions_ms: Vec<f64>,
}

impl Round {
    pub fn new(config: GameConfig) -> Self {
        let spawner = Spawner::new(config.clone());
        Self::with_spawner(config, spawner)
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let spawner = Spawner::with_seed(config.clone(), seed);
        Self::with_spawner(config, spawner)
    }

    fn with_spawner(config: GameConfig, spawner: Spawner) -> Self {
        Self {
            config,
            state: SessionState::default(),
            spawner,
            countdown: None,
            reactions_ms: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Slot and kind of the target currently on the board, if any. The UI
    /// draws the grid from this rather than mirroring notifications.
    pub fn active_target(&self) -> Option<(usize, TargetKind)> {
        self.spawner.active().map(|t| (t.slot, t.kind))
    }

    /// Resets the scoreboard, arms the countdown, and spawns the first
    /// target. A zero round length falls back to the default. Restarting a
    /// round that is mid-flight clears whatever was on the board first.
    pub fn start(&mut self, round_seconds: u64, now: Instant, out: &mut Vec<Notification>) {
        if let Some(slot) = self.spawner.cancel_all() {
            out.push(Notification::TargetCleared { slot });
        }

        let seconds = if round_seconds == 0 {
            self.config.default_round_seconds
        } else {
            round_seconds
        };
        self.state = SessionState::fresh(seconds);
        self.reactions_ms.clear();
        self.countdown = Some(now + Duration::from_secs(1));
        out.push(Notification::StatsChanged(self.state.clone()));

        let mut spawned = Vec::new();
        self.spawner.begin(now, &mut spawned);
        self.apply_spawn_events(&spawned, out);
    }

    /// Applies a tap on `slot`. Returns the kind that was hit so the
    /// caller can phrase its feedback, or `None` when the tap landed on an
    /// empty slot or the round is not running.
    pub fn tap(
        &mut self,
        slot: usize,
        now: Instant,
        out: &mut Vec<Notification>,
    ) -> Option<TargetKind> {
        if !self.state.running {
            return None;
        }

        let hit = self.spawner.resolve_tap(slot)?;
        match hit.kind {
            TargetKind::Clean => {
                let before = self.state.score;
                self.state.score = self.state.score.saturating_add(self.config.clean_points);
                self.state.streak += 1;
                self.state.best_streak = self.state.best_streak.max(self.state.streak);
                self.state.clean_taps += 1;

                let reaction = now.saturating_duration_since(hit.shown_at);
                self.reactions_ms.push(reaction.as_secs_f64() * 1000.0);

                if before < self.config.milestone_threshold
                    && self.state.score >= self.config.milestone_threshold
                {
                    out.push(Notification::MilestoneCrossed);
                }
            }
            TargetKind::Dirty => {
                self.state.score = self.state.score.saturating_sub(self.config.dirty_penalty_points);
                self.state.time_remaining = self
                    .state
                    .time_remaining
                    .saturating_sub(self.config.dirty_penalty_seconds);
                self.state.streak = 0;
                self.state.dirty_taps += 1;
            }
        }

        out.push(Notification::TargetCleared { slot });
        out.push(Notification::StatsChanged(self.state.clone()));
        Some(hit.kind)
    }

    /// Advances every due deadline: countdown seconds first, then the
    /// spawner's timers. A penalty can leave the clock at zero mid-second;
    /// the round still only ends when the countdown next fires.
    pub fn poll(&mut self, now: Instant, out: &mut Vec<Notification>) {
        if !self.state.running {
            return;
        }

        while let Some(due) = self.countdown {
            if due > now {
                break;
            }
            self.countdown = Some(due + Duration::from_secs(1));
            self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
            out.push(Notification::StatsChanged(self.state.clone()));
            if self.state.time_remaining == 0 {
                self.stop(out);
                return;
            }
        }

        let mut spawned = Vec::new();
        self.spawner.poll(now, &mut spawned);
        self.apply_spawn_events(&spawned, out);
    }

    /// Ends the round: freezes the scoreboard, disarms every timer, and
    /// reports the final state. Safe to call repeatedly; only the first
    /// call emits anything.
    pub fn stop(&mut self, out: &mut Vec<Notification>) {
        if !self.state.running {
            return;
        }

        self.state.running = false;
        self.countdown = None;
        if let Some(slot) = self.spawner.cancel_all() {
            out.push(Notification::TargetCleared { slot });
        }
        out.push(Notification::Ended(self.state.clone()));
    }

    /// Player-initiated abandon. Same teardown as a natural finish.
    pub fn quit(&mut self, out: &mut Vec<Notification>) {
        self.stop(out);
    }

    pub fn average_reaction_ms(&self) -> Option<f64> {
        mean(&self.reactions_ms)
    }

    pub fn reaction_std_dev_ms(&self) -> Option<f64> {
        std_dev(&self.reactions_ms)
    }

    /// Fastest and slowest clean-tap reaction, when at least one landed.
    pub fn reaction_extremes_ms(&self) -> Option<(f64, f64)> {
        self.reactions_ms
            .iter()
            .copied()
            .minmax()
            .into_option()
    }

    fn apply_spawn_events(&mut self, events: &[SpawnEvent], out: &mut Vec<Notification>) {
        for event in events {
            match *event {
                SpawnEvent::Activated { slot, kind } => {
                    out.push(Notification::TargetActivated { slot, kind });
                }
                SpawnEvent::Cleared { slot } => {
                    out.push(Notification::TargetCleared { slot });
                }
                SpawnEvent::Expired { slot } => {
                    // An untapped target costs the streak, nothing else.
                    out.push(Notification::TargetCleared { slot });
                    self.state.streak = 0;
                    out.push(Notification::Miss);
                    out.push(Notification::StatsChanged(self.state.clone()));
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn force_spawn(&mut self, slot: usize, kind: TargetKind, now: Instant) {
        self.spawner.force_spawn(slot, kind, now);
    }
}
