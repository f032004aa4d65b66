//! Direction decisions for each agent kind
//!
//! Drones wander: mostly straight, occasionally turning, never reversing.
//! Cpu agents probe a random distance ahead and turn away from trails and
//! walls, hold course toward bonuses, and otherwise wander like drones.
//! Humans keep whatever direction input last requested.

use rand::Rng;

use super::agent::{Agent, AgentKind, Direction};
use super::cell::Cell;
use super::grid::Grid;
use super::pick_weighted;

/// Relative move out of the current facing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Straight,
    Clockwise,
    CounterClockwise,
}

impl Turn {
    pub fn apply(self, dir: Direction) -> Direction {
        match self {
            Turn::Straight => dir,
            Turn::Clockwise => dir.clockwise(),
            Turn::CounterClockwise => dir.counter_clockwise(),
        }
    }
}

/// Free-roaming table: 62 straight, 2 clockwise, 1 counter-clockwise out of 65
pub const WANDER_TURNS: [(Turn, u32); 3] = [
    (Turn::Straight, 62),
    (Turn::Clockwise, 2),
    (Turn::CounterClockwise, 1),
];

/// Obstacle ahead: never straight, 3 clockwise to 1 counter-clockwise
pub const AVOID_TURNS: [(Turn, u32); 2] = [(Turn::Clockwise, 3), (Turn::CounterClockwise, 1)];

/// How far a cpu agent looks ahead
pub const LOOKAHEAD: [(u32, u32); 3] = [(2, 1), (4, 2), (8, 3)];

/// Choose the direction `agent` takes this tick
pub fn decide_direction<R: Rng + ?Sized>(agent: &Agent, grid: &Grid, rng: &mut R) -> Direction {
    match agent.kind {
        AgentKind::Human => agent.next_dir,
        AgentKind::Drone => wander(agent.dir, rng),
        AgentKind::Cpu => {
            let distance = pick_weighted(rng, &LOOKAHEAD);
            let probe = grid.get(grid.offset(agent.pos, agent.dir, distance));
            react(agent.dir, probe, rng)
        }
    }
}

/// Straight-biased random walk
pub fn wander<R: Rng + ?Sized>(dir: Direction, rng: &mut R) -> Direction {
    pick_weighted(rng, &WANDER_TURNS).apply(dir)
}

/// Cpu response to the cell found at the probe point
pub fn react<R: Rng + ?Sized>(dir: Direction, probe: Cell, rng: &mut R) -> Direction {
    match probe {
        Cell::Empty => wander(dir, rng),
        Cell::Trail { .. } | Cell::Wall => pick_weighted(rng, &AVOID_TURNS).apply(dir),
        Cell::Bonus { .. } => dir,
    }
}
