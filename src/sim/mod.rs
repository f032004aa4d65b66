//! Deterministic simulation module
//!
//! All arena logic lives here. This module must be pure and deterministic:
//! - One seeded RNG, drawn in a fixed order
//! - Stable iteration order (agents by registration index)
//! - No rendering or platform dependencies

pub mod agent;
pub mod ai;
pub mod cell;
pub mod grid;
pub mod state;
pub mod tick;

pub use agent::{Agent, AgentId, AgentKind, Direction, KeyBindings, TailLimits};
pub use cell::{BonusKind, Cell};
pub use grid::{Grid, WallRect};
pub use state::{AgentView, ArenaEvent, ArenaRules, ArenaSnapshot, ArenaState, CrashCause};
pub use tick::{TickInput, tick};

use rand::Rng;

/// Draw one outcome from a `(value, weight)` table with a single RNG call.
/// Weights must not all be zero.
pub(crate) fn pick_weighted<T: Copy, R: Rng + ?Sized>(rng: &mut R, table: &[(T, u32)]) -> T {
    let total: u32 = table.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0..total);
    for &(value, weight) in table {
        if roll < weight {
            return value;
        }
        roll -= weight;
    }
    // Unreachable while `roll < total`
    table[table.len() - 1].0
}
