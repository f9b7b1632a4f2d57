use ratatui::Frame;

use crate::app::{App, AppState};

/// A UI screen boundary; each screen knows how to draw itself.
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Start menu with the round-length selector
pub struct MenuScreen;

impl Screen for MenuScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// The board mid-round
pub struct PlayScreen;

impl Screen for PlayScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// Round summary once the clock runs out
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Menu => Box::new(MenuScreen),
        AppState::Playing => Box::new(PlayScreen),
        AppState::Results => Box::new(ResultsScreen),
    }
}
