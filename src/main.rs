use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use plink::{
    app::{Action, App, AppState},
    config::{ConfigStore, FileConfigStore, Settings},
    runtime::{CrosstermEventSource, FixedTicker, PlinkEvent, Runner},
    ui::screen::current_screen,
    TICK_RATE_MS,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};

/// fast-paced tap-the-target reaction game for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A fast-paced reaction game: clean cans pop up on a grid, tap them before they vanish, dodge the dirty ones, and chase the milestone before the clock runs out."
)]
pub struct Cli {
    /// round length in seconds
    #[clap(short = 's', long)]
    seconds: Option<u64>,

    /// number of board slots (1-9)
    #[clap(long)]
    slots: Option<usize>,

    /// seed the spawn sequence for reproducible rounds
    #[clap(long)]
    seed: Option<u64>,
}

impl Cli {
    /// Overlays the flags on top of stored settings.
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(seconds) = self.seconds {
            settings.round_seconds = seconds;
        }
        if let Some(slots) = self.slots {
            settings.slot_count = slots;
        }
        settings.sanitized()
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let store = FileConfigStore::new();
    let settings = cli.apply(store.load());
    let app = App::new(settings, cli.seed);

    let res = run(&mut terminal, app, &store);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    store: &dyn ConfigStore,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| draw(&mut app, f))?;

    loop {
        match runner.step() {
            PlinkEvent::Tick => {
                let was_playing = app.state == AppState::Playing;
                app.on_tick(Instant::now());
                // Repaint while anything moves, and once more when the
                // round ends on this tick so the results appear promptly.
                if app.is_animating() || was_playing {
                    terminal.draw(|f| draw(&mut app, f))?;
                }
            }
            PlinkEvent::Resize => {
                terminal.draw(|f| draw(&mut app, f))?;
            }
            PlinkEvent::Key(key) => {
                if app.on_key(key, Instant::now()) == Action::Quit {
                    break;
                }
                terminal.draw(|f| draw(&mut app, f))?;
            }
        }
    }

    // Round length tweaks made in the menu stick for the next launch.
    let _ = store.save(&app.settings);

    Ok(())
}

fn draw(app: &mut App, f: &mut Frame) {
    let size = f.area();
    app.set_size(size.width, size.height);
    current_screen(&app.state).render(app, f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use plink::config::MAX_SLOTS;

    #[test]
    fn cli_defaults_leave_settings_alone() {
        let cli = Cli::parse_from(["plink"]);
        assert_eq!(cli.seconds, None);
        assert_eq!(cli.slots, None);
        assert_eq!(cli.seed, None);

        let settings = cli.apply(Settings::default());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn cli_overrides_round_length_and_slots() {
        let cli = Cli::parse_from(["plink", "-s", "60", "--slots", "4"]);
        let settings = cli.apply(Settings::default());
        assert_eq!(settings.round_seconds, 60);
        assert_eq!(settings.slot_count, 4);
    }

    #[test]
    fn cli_long_flag_for_seconds() {
        let cli = Cli::parse_from(["plink", "--seconds", "15"]);
        assert_eq!(cli.seconds, Some(15));
    }

    #[test]
    fn cli_out_of_range_values_are_clamped() {
        let cli = Cli::parse_from(["plink", "-s", "0", "--slots", "40"]);
        let settings = cli.apply(Settings::default());
        assert_eq!(settings.round_seconds, 30);
        assert_eq!(settings.slot_count, MAX_SLOTS);
    }

    #[test]
    fn cli_accepts_a_seed() {
        let cli = Cli::parse_from(["plink", "--seed", "1234"]);
        assert_eq!(cli.seed, Some(1234));
    }
}
