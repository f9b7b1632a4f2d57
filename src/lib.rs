// Library surface for headless/integration tests and reuse.
pub mod app;
pub mod celebration;
pub mod config;
pub mod round;
pub mod runtime;
pub mod session;
pub mod spawner;
pub mod ui;
pub mod util;

/// Cadence of the event loop's timeout tick, in milliseconds. Deadlines
/// fire on the first tick at or after they fall due.
pub const TICK_RATE_MS: u64 = 50;
