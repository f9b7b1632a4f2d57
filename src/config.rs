use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound on grid slots; the keyboard map covers nine keys.
pub const MAX_SLOTS: usize = 9;

/// Fixed tuning for a round: spawn pacing, target lifetimes, and the
/// scoreboard rules. Not persisted; `Settings` carries the player-facing
/// knobs.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub slot_count: usize,
    pub spawn_interval_min: Duration,
    pub spawn_interval_max: Duration,
    pub show_time_min: Duration,
    pub show_time_max: Duration,
    pub dirty_probability: f64,
    pub clean_points: u32,
    pub dirty_penalty_points: u32,
    pub dirty_penalty_seconds: u64,
    pub milestone_threshold: u32,
    pub default_round_seconds: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            slot_count: 9,
            spawn_interval_min: Duration::from_millis(450),
            spawn_interval_max: Duration::from_millis(900),
            show_time_min: Duration::from_millis(500),
            show_time_max: Duration::from_millis(900),
            dirty_probability: 0.22,
            clean_points: 10,
            dirty_penalty_points: 15,
            dirty_penalty_seconds: 2,
            milestone_threshold: 100,
            default_round_seconds: 30,
        }
    }
}

impl From<&Settings> for GameConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            slot_count: settings.slot_count.clamp(1, MAX_SLOTS),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub round_seconds: u64,
    pub slot_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_seconds: 30,
            slot_count: 9,
        }
    }
}

impl Settings {
    /// Pulls out-of-range values back into the playable window. A config
    /// file is user-editable, so loads never trust it blindly.
    pub fn sanitized(mut self) -> Self {
        if self.round_seconds == 0 {
            self.round_seconds = Settings::default().round_seconds;
        }
        self.slot_count = self.slot_count.clamp(1, MAX_SLOTS);
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Settings;
    fn save(&self, settings: &Settings) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "plink") {
            pd.config_dir().join("settings.json")
        } else {
            PathBuf::from("plink_settings.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Settings {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(settings) = serde_json::from_slice::<Settings>(&bytes) {
                return settings.sanitized();
            }
        }
        Settings::default()
    }

    fn save(&self, settings: &Settings) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(settings).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
