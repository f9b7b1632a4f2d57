use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use webbrowser::Browser;

use crate::celebration::Celebration;
use crate::config::{GameConfig, Settings};
use crate::round::{Notification, Round};
use crate::session::SessionState;
use crate::spawner::TargetKind;

/// Round lengths the menu cycles through with left/right.
pub const ROUND_LENGTH_PRESETS: [u64; 4] = [15, 30, 45, 60];

/// Keys for the left-hand grid, row by row. Digits 1-9 map to the same
/// slots.
pub const GRID_KEYS: [char; 9] = ['q', 'w', 'e', 'a', 's', 'd', 'z', 'x', 'c'];

const WELCOME: &str = "Tap the clean cans, dodge the dirty ones.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    Playing,
    Results,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Good,
    Bad,
}

/// One-line feedback shown under the scoreboard.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub tone: Tone,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Info,
        }
    }

    pub fn good(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Good,
        }
    }

    pub fn bad(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Bad,
        }
    }
}

/// Maps a pressed character to a grid slot, if it names one the current
/// board actually has.
pub fn slot_for_key(c: char, slot_count: usize) -> Option<usize> {
    let slot = match c {
        '1'..='9' => (c as u8 - b'1') as usize,
        _ => GRID_KEYS.iter().position(|&k| k == c.to_ascii_lowercase())?,
    };

    if slot < slot_count {
        Some(slot)
    } else {
        None
    }
}

fn preset_up(current: u64) -> u64 {
    ROUND_LENGTH_PRESETS
        .iter()
        .copied()
        .find(|&preset| preset > current)
        .unwrap_or(current)
}

fn preset_down(current: u64) -> u64 {
    ROUND_LENGTH_PRESETS
        .iter()
        .rev()
        .copied()
        .find(|&preset| preset < current)
        .unwrap_or(current)
}

/// Top-level application state: which screen is up, the round being
/// played, and the feedback channel between them.
pub struct App {
    pub state: AppState,
    pub round: Round,
    pub settings: Settings,
    pub message: StatusMessage,
    pub celebration: Celebration,
    pub last_summary: Option<SessionState>,
    size: (u16, u16),
}

impl App {
    pub fn new(settings: Settings, seed: Option<u64>) -> Self {
        let settings = settings.sanitized();
        let config = GameConfig::from(&settings);
        let round = match seed {
            Some(seed) => Round::with_seed(config, seed),
            None => Round::new(config),
        };

        Self {
            state: AppState::Menu,
            round,
            settings,
            message: StatusMessage::info(WELCOME),
            celebration: Celebration::default(),
            last_summary: None,
            size: (80, 24),
        }
    }

    /// Tracked so the celebration burst fits the current terminal.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.size = (width, height);
    }

    /// True while something on screen moves without key input.
    pub fn is_animating(&self) -> bool {
        self.state == AppState::Playing || self.celebration.is_active
    }

    pub fn start_round(&mut self, now: Instant) {
        let mut notes = Vec::new();
        self.round
            .start(self.settings.round_seconds, now, &mut notes);
        self.state = AppState::Playing;
        self.message = StatusMessage::info("Tap the cans!");
        self.last_summary = None;
        self.apply_notifications(&notes);
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.state {
            AppState::Menu => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Action::Quit,
                KeyCode::Enter | KeyCode::Char(' ') => self.start_round(now),
                KeyCode::Left | KeyCode::Char('h') => {
                    self.settings.round_seconds = preset_down(self.settings.round_seconds);
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.settings.round_seconds = preset_up(self.settings.round_seconds);
                }
                _ => {}
            },
            AppState::Playing => match key.code {
                // While playing, letters belong to the grid ('q' included);
                // esc is the one way to bail out early.
                KeyCode::Esc => {
                    let mut notes = Vec::new();
                    self.round.quit(&mut notes);
                    self.apply_notifications(&notes);
                }
                KeyCode::Char(c) => self.tap_key(c, now),
                _ => {}
            },
            AppState::Results => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Action::Quit,
                KeyCode::Char('r') => self.start_round(now),
                KeyCode::Char('m') => {
                    self.state = AppState::Menu;
                    self.message = StatusMessage::info(WELCOME);
                }
                KeyCode::Char('t') => {
                    if Browser::is_available() {
                        webbrowser::open(&self.share_url()).unwrap_or_default();
                    }
                }
                _ => {}
            },
        }

        Action::Continue
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.state == AppState::Playing {
            let mut notes = Vec::new();
            self.round.poll(now, &mut notes);
            self.apply_notifications(&notes);
        }
        self.celebration.update();
    }

    pub fn share_text(&self) -> String {
        let summary = self.last_summary.clone().unwrap_or_default();
        format!(
            "I scored {} in plink with {} clean taps and a best streak of {}",
            summary.score, summary.clean_taps, summary.best_streak
        )
    }

    fn share_url(&self) -> String {
        let text = self.share_text().replace(' ', "%20");
        format!("https://twitter.com/intent/tweet?text={text}")
    }

    fn tap_key(&mut self, c: char, now: Instant) {
        let slot = match slot_for_key(c, self.round.config.slot_count) {
            Some(slot) => slot,
            None => return,
        };

        let mut notes = Vec::new();
        match self.round.tap(slot, now, &mut notes) {
            Some(TargetKind::Clean) => {
                self.message = StatusMessage::good(format!(
                    "+{} {} Water!",
                    self.round.config.clean_points,
                    TargetKind::Clean
                ));
            }
            Some(TargetKind::Dirty) => {
                self.message = StatusMessage::bad(format!(
                    "{} can! -{} and -{}s",
                    TargetKind::Dirty,
                    self.round.config.dirty_penalty_points,
                    self.round.config.dirty_penalty_seconds
                ));
            }
            None => {}
        }

        // Milestone and end-of-round lines win over the tap feedback.
        self.apply_notifications(&notes);
    }

    fn apply_notifications(&mut self, notes: &[Notification]) {
        for note in notes {
            match note {
                Notification::Miss => {
                    self.message = StatusMessage::bad("Miss!");
                }
                Notification::MilestoneCrossed => {
                    self.message = StatusMessage::good("Milestone hit! Nice work!");
                    let (width, height) = self.size;
                    self.celebration.start(width, height);
                }
                Notification::Ended(summary) => {
                    let threshold = self.round.config.milestone_threshold;
                    self.message = if summary.score >= threshold {
                        StatusMessage::good(format!(
                            "You scored {}. You hit the milestone!",
                            summary.score
                        ))
                    } else {
                        StatusMessage::info(format!(
                            "You scored {}. Try again and hit {}!",
                            summary.score, threshold
                        ))
                    };
                    self.last_summary = Some(summary.clone());
                    self.state = AppState::Results;
                }
                // The grid and scoreboard are drawn straight from round
                // state, so activations and stat updates need no bookkeeping
                // here.
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> App {
        App::new(Settings::default(), Some(7))
    }

    fn playing_app(t0: Instant) -> App {
        let mut app = test_app();
        assert_eq!(app.on_key(key(KeyCode::Enter), t0), Action::Continue);
        assert_eq!(app.state, AppState::Playing);
        app
    }

    #[test]
    fn starts_in_menu() {
        let app = test_app();
        assert_eq!(app.state, AppState::Menu);
        assert!(!app.round.is_running());
        assert_eq!(app.message.tone, Tone::Info);
    }

    #[test]
    fn enter_starts_a_round() {
        let t0 = Instant::now();
        let app = playing_app(t0);
        assert!(app.round.is_running());
        assert_eq!(app.round.state.time_remaining, 30);
        assert!(app.round.active_target().is_some());
        assert_eq!(app.message.text, "Tap the cans!");
    }

    #[test]
    fn space_also_starts_a_round() {
        let mut app = test_app();
        app.on_key(key(KeyCode::Char(' ')), Instant::now());
        assert_eq!(app.state, AppState::Playing);
    }

    #[test]
    fn menu_arrows_cycle_presets_without_wrapping() {
        let mut app = test_app();
        app.on_key(key(KeyCode::Right), Instant::now());
        assert_eq!(app.settings.round_seconds, 45);
        app.on_key(key(KeyCode::Right), Instant::now());
        app.on_key(key(KeyCode::Right), Instant::now());
        assert_eq!(app.settings.round_seconds, 60);

        for _ in 0..5 {
            app.on_key(key(KeyCode::Left), Instant::now());
        }
        assert_eq!(app.settings.round_seconds, 15);
    }

    #[test]
    fn preset_stepping_snaps_custom_values() {
        assert_eq!(preset_up(20), 30);
        assert_eq!(preset_down(20), 15);
        assert_eq!(preset_up(60), 60);
        assert_eq!(preset_down(15), 15);
    }

    #[test]
    fn menu_q_quits() {
        let mut app = test_app();
        assert_eq!(app.on_key(key(KeyCode::Char('q')), Instant::now()), Action::Quit);
    }

    #[test]
    fn ctrl_c_quits_mid_round() {
        let t0 = Instant::now();
        let mut app = playing_app(t0);
        let combo = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.on_key(combo, t0), Action::Quit);
    }

    #[test]
    fn q_taps_the_grid_while_playing() {
        let t0 = Instant::now();
        let mut app = playing_app(t0);
        app.round.force_spawn(0, TargetKind::Clean, t0);

        let action = app.on_key(key(KeyCode::Char('q')), t0 + Duration::from_millis(100));
        assert_eq!(action, Action::Continue);
        assert_eq!(app.round.state.score, 10);
    }

    #[test]
    fn clean_tap_sets_good_message() {
        let t0 = Instant::now();
        let mut app = playing_app(t0);
        app.round.force_spawn(4, TargetKind::Clean, t0);

        app.on_key(key(KeyCode::Char('5')), t0 + Duration::from_millis(100));
        assert_eq!(app.message.text, "+10 Clean Water!");
        assert_eq!(app.message.tone, Tone::Good);
        assert_eq!(app.round.state.score, 10);
    }

    #[test]
    fn dirty_tap_sets_bad_message() {
        let t0 = Instant::now();
        let mut app = playing_app(t0);
        app.round.force_spawn(2, TargetKind::Dirty, t0);

        app.on_key(key(KeyCode::Char('3')), t0 + Duration::from_millis(100));
        assert_eq!(app.message.text, "Dirty can! -15 and -2s");
        assert_eq!(app.message.tone, Tone::Bad);
    }

    #[test]
    fn tap_on_empty_slot_keeps_message() {
        let t0 = Instant::now();
        let mut app = playing_app(t0);
        app.round.force_spawn(0, TargetKind::Clean, t0);

        app.on_key(key(KeyCode::Char('9')), t0 + Duration::from_millis(100));
        assert_eq!(app.message.text, "Tap the cans!");
    }

    #[test]
    fn miss_sets_bad_message() {
        let t0 = Instant::now();
        let mut app = playing_app(t0);
        app.round.force_spawn(0, TargetKind::Clean, t0);

        // Default show time tops out at 900ms, so by one second in the
        // forced target has expired.
        app.on_tick(t0 + Duration::from_secs(1));
        assert_eq!(app.message.text, "Miss!");
        assert_eq!(app.message.tone, Tone::Bad);
    }

    #[test]
    fn milestone_tap_starts_celebration() {
        let t0 = Instant::now();
        let mut app = playing_app(t0);
        app.round.state.score = 95;
        app.round.force_spawn(0, TargetKind::Clean, t0);

        app.on_key(key(KeyCode::Char('1')), t0 + Duration::from_millis(100));
        assert_eq!(app.message.text, "Milestone hit! Nice work!");
        assert!(app.celebration.is_active);
    }

    #[test]
    fn esc_ends_round_and_shows_results() {
        let t0 = Instant::now();
        let mut app = playing_app(t0);
        app.round.state.score = 40;

        app.on_key(key(KeyCode::Esc), t0 + Duration::from_secs(2));
        assert_eq!(app.state, AppState::Results);
        let summary = app.last_summary.clone().unwrap();
        assert!(!summary.running);
        assert_eq!(summary.score, 40);
        assert!(app.message.text.contains("You scored 40"));
    }

    #[test]
    fn countdown_running_out_shows_results() {
        let t0 = Instant::now();
        let mut app = App::new(
            Settings {
                round_seconds: 2,
                slot_count: 9,
            },
            Some(7),
        );
        app.on_key(key(KeyCode::Enter), t0);

        app.on_tick(t0 + Duration::from_secs(1));
        assert_eq!(app.state, AppState::Playing);

        app.on_tick(t0 + Duration::from_secs(2));
        assert_eq!(app.state, AppState::Results);
        assert!(app.last_summary.is_some());
    }

    #[test]
    fn results_r_plays_again() {
        let t0 = Instant::now();
        let mut app = playing_app(t0);
        app.on_key(key(KeyCode::Esc), t0 + Duration::from_secs(1));
        assert_eq!(app.state, AppState::Results);

        app.on_key(key(KeyCode::Char('r')), t0 + Duration::from_secs(2));
        assert_eq!(app.state, AppState::Playing);
        assert!(app.round.is_running());
        assert_eq!(app.round.state.score, 0);
        assert!(app.last_summary.is_none());
    }

    #[test]
    fn results_m_returns_to_menu() {
        let t0 = Instant::now();
        let mut app = playing_app(t0);
        app.on_key(key(KeyCode::Esc), t0 + Duration::from_secs(1));

        app.on_key(key(KeyCode::Char('m')), t0 + Duration::from_secs(2));
        assert_eq!(app.state, AppState::Menu);
        assert!(!app.round.is_running());
    }

    #[test]
    fn settings_survive_a_round() {
        let t0 = Instant::now();
        let mut app = test_app();
        app.on_key(key(KeyCode::Right), t0);
        assert_eq!(app.settings.round_seconds, 45);

        app.on_key(key(KeyCode::Enter), t0);
        assert_eq!(app.round.state.time_remaining, 45);
        app.on_key(key(KeyCode::Esc), t0 + Duration::from_secs(1));
        assert_eq!(app.settings.round_seconds, 45);
    }

    #[test]
    fn share_text_reports_the_summary() {
        let mut app = test_app();
        app.last_summary = Some(SessionState {
            score: 120,
            clean_taps: 12,
            best_streak: 7,
            ..SessionState::default()
        });
        assert_eq!(
            app.share_text(),
            "I scored 120 in plink with 12 clean taps and a best streak of 7"
        );
        assert!(!app.share_url().contains(' '));
    }

    #[test]
    fn slot_for_key_covers_digits_and_letters() {
        assert_eq!(slot_for_key('1', 9), Some(0));
        assert_eq!(slot_for_key('9', 9), Some(8));
        assert_eq!(slot_for_key('q', 9), Some(0));
        assert_eq!(slot_for_key('w', 9), Some(1));
        assert_eq!(slot_for_key('e', 9), Some(2));
        assert_eq!(slot_for_key('a', 9), Some(3));
        assert_eq!(slot_for_key('s', 9), Some(4));
        assert_eq!(slot_for_key('d', 9), Some(5));
        assert_eq!(slot_for_key('z', 9), Some(6));
        assert_eq!(slot_for_key('x', 9), Some(7));
        assert_eq!(slot_for_key('c', 9), Some(8));
        assert_eq!(slot_for_key('Q', 9), Some(0));
    }

    #[test]
    fn slot_for_key_rejects_out_of_board_keys() {
        assert_eq!(slot_for_key('0', 9), None);
        assert_eq!(slot_for_key('p', 9), None);
        assert_eq!(slot_for_key('5', 4), None);
        assert_eq!(slot_for_key('s', 4), None);
        assert_eq!(slot_for_key('4', 4), Some(3));
    }

    #[test]
    fn animates_while_playing_or_celebrating() {
        let t0 = Instant::now();
        let mut app = test_app();
        assert!(!app.is_animating());

        app.on_key(key(KeyCode::Enter), t0);
        assert!(app.is_animating());

        app.on_key(key(KeyCode::Esc), t0 + Duration::from_secs(1));
        assert!(!app.is_animating());
    }
}
