use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the app loop
#[derive(Clone, Debug)]
pub enum PlinkEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait PlinkEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if one arrives in time, or Err(Timeout) otherwise.
    fn recv_timeout(&self, timeout: Duration) -> Result<PlinkEvent, RecvTimeoutError>;
}

/// Production event source backed by crossterm
pub struct CrosstermEventSource {
    rx: Receiver<PlinkEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(PlinkEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(PlinkEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PlinkEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PlinkEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable tick cadence
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Scripted event source for headless tests
pub struct TestEventSource {
    rx: Receiver<PlinkEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<PlinkEvent>) -> Self {
        Self { rx }
    }
}

impl PlinkEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PlinkEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the application one event or tick at a time
pub struct Runner<E: PlinkEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: PlinkEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to one tick interval and returns the next event, or Tick
    /// on timeout. A disconnected source also yields Tick so a headless
    /// drive keeps the countdown moving after its script runs out.
    pub fn step(&self) -> PlinkEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                PlinkEvent::Tick
            }
        }
    }
}
