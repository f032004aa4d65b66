//! Trail Arena - a toroidal light-trail arena simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, agents, AI, tick resolution)
//! - `settings`: Arena dimensions, rules, walls and roster
//! - `input`: Key presses to steering requests for human agents
//! - `scoreboard`: Kill/death/bonus standings

pub mod error;
pub mod input;
pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use error::ArenaError;
pub use scoreboard::Scoreboard;
pub use settings::ArenaSettings;

/// Arena configuration constants
pub mod consts {
    /// Default grid size (720x480 arena in 10px squares)
    pub const DEFAULT_WIDTH: u32 = 72;
    pub const DEFAULT_HEIGHT: u32 = 48;

    /// Wall-clock pacing for real-time runs
    pub const DEFAULT_TICK_RATE_MS: u64 = 50;

    /// Ticks an uneaten bonus stays on the grid
    pub const DEFAULT_BONUS_TIMEOUT: u32 = 74;
}
