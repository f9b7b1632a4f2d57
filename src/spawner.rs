use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

use crate::config::GameConfig;

/// What occupies a slot: a clean can worth points, or a dirty can that
/// costs points and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TargetKind {
    Clean,
    Dirty,
}

/// The one target currently on the board.
#[derive(Debug, Clone, Copy)]
pub struct ActiveTarget {
    pub slot: usize,
    pub kind: TargetKind,
    pub shown_at: Instant,
    cycle: u64,
}

/// A tap that landed on the active target.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub kind: TargetKind,
    pub shown_at: Instant,
}

/// Board transitions the spawner reports back to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEvent {
    Activated { slot: usize, kind: TargetKind },
    /// Target left the board without blame: replaced by the next spawn
    /// or cancelled outright.
    Cleared { slot: usize },
    /// Target timed out untapped.
    Expired { slot: usize },
}

#[derive(Debug, Clone, Copy)]
struct ExpiryTimer {
    due: Instant,
    slot: usize,
    cycle: u64,
}

/// Schedules at most one active target at a time. Deadlines are held as
/// data and fired by `poll`, so time is always injected and nothing here
/// sleeps or spawns threads.
#[derive(Debug)]
pub struct Spawner {
    config: GameConfig,
    rng: StdRng,
    active: Option<ActiveTarget>,
    expiry: Option<ExpiryTimer>,
    next_spawn: Option<Instant>,
    cycle: u64,
}

impl Spawner {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Seeded constructor; the same seed and poll cadence replays the same
    /// slot/kind/timing sequence.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            active: None,
            expiry: None,
            next_spawn: None,
            cycle: 0,
        }
    }

    pub fn active(&self) -> Option<&ActiveTarget> {
        self.active.as_ref()
    }

    /// Puts the first target on the board. Any later spawning is driven
    /// entirely by `poll`.
    pub fn begin(&mut self, now: Instant, out: &mut Vec<SpawnEvent>) {
        self.spawn_next(now, out);
    }

    /// Checks the tapped slot against the active target. On a hit the
    /// target and its expiry are retired; anything else is a no-op.
    pub fn resolve_tap(&mut self, slot: usize) -> Option<Hit> {
        match self.active {
            Some(target) if target.slot == slot => {
                self.active = None;
                self.expiry = None;
                Some(Hit {
                    kind: target.kind,
                    shown_at: target.shown_at,
                })
            }
            _ => None,
        }
    }

    /// Fires every armed deadline that is due at `now`, oldest first, with
    /// an expiry winning a tie against a spawn for the same instant.
    pub fn poll(&mut self, now: Instant, out: &mut Vec<SpawnEvent>) {
        loop {
            let expiry_due = self.expiry.filter(|timer| timer.due <= now);
            let spawn_due = self.next_spawn.filter(|at| *at <= now);

            match (expiry_due, spawn_due) {
                (Some(timer), Some(at)) if timer.due <= at => self.fire_expiry(out),
                (Some(_), None) => self.fire_expiry(out),
                (_, Some(_)) => self.spawn_next(now, out),
                (None, None) => break,
            }
        }
    }

    /// Disarms both timers and takes the active target off the board.
    /// Returns the vacated slot so the caller can report it.
    pub fn cancel_all(&mut self) -> Option<usize> {
        self.expiry = None;
        self.next_spawn = None;
        self.active.take().map(|target| target.slot)
    }

    fn spawn_next(&mut self, now: Instant, out: &mut Vec<SpawnEvent>) {
        // The board transitions through empty: a lingering target is
        // cleared (without blame) before the replacement shows.
        if let Some(prev) = self.active.take() {
            out.push(SpawnEvent::Cleared { slot: prev.slot });
        }

        let slot = self.rng.gen_range(0..self.config.slot_count);
        let kind = if self.rng.gen_bool(self.config.dirty_probability) {
            TargetKind::Dirty
        } else {
            TargetKind::Clean
        };

        self.cycle += 1;
        self.active = Some(ActiveTarget {
            slot,
            kind,
            shown_at: now,
            cycle: self.cycle,
        });
        out.push(SpawnEvent::Activated { slot, kind });

        let show_for = self.sample(self.config.show_time_min, self.config.show_time_max);
        self.expiry = Some(ExpiryTimer {
            due: now + show_for,
            slot,
            cycle: self.cycle,
        });

        let gap = self.sample(self.config.spawn_interval_min, self.config.spawn_interval_max);
        self.next_spawn = Some(now + gap);
    }

    fn fire_expiry(&mut self, out: &mut Vec<SpawnEvent>) {
        if let Some(timer) = self.expiry.take() {
            // A fired deadline only counts against the target it was armed
            // for. A replacement may have landed on the same slot, which is
            // why the cycle id is checked and not just the slot.
            match self.active {
                Some(target) if target.slot == timer.slot && target.cycle == timer.cycle => {
                    self.active = None;
                    out.push(SpawnEvent::Expired { slot: timer.slot });
                }
                _ => {}
            }
        }
    }

    fn sample(&mut self, min: Duration, max: Duration) -> Duration {
        let lo = min.as_millis() as u64;
        let hi = max.as_millis() as u64;
        Duration::from_millis(self.rng.gen_range(lo..=hi))
    }

    /// Plants a specific target with deterministic timers. Scenario tests
    /// use this to pin down slot and kind without steering the rng. The
    /// expiry is armed at the earliest show time and the next spawn at the
    /// latest gap, so the forced target expires before it can be replaced.
    #[cfg(test)]
    pub(crate) fn force_spawn(&mut self, slot: usize, kind: TargetKind, now: Instant) {
        self.cycle += 1;
        self.active = Some(ActiveTarget {
            slot,
            kind,
            shown_at: now,
            cycle: self.cycle,
        });
        self.expiry = Some(ExpiryTimer {
            due: now + self.config.show_time_min,
            slot,
            cycle: self.cycle,
        });
        self.next_spawn = Some(now + self.config.spawn_interval_max);
    }
}
