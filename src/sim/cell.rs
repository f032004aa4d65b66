//! Cell state
//!
//! Every grid cell is one of four variants. The numeric `(occupant, age)`
//! encoding is kept at the boundary for external readers:
//! - `0`: empty
//! - `1..=20`: trail owned by the agent with that id
//! - `21..=40`: bonus token (`21` good, `22` mild)
//! - `255`: wall

use serde::{Deserialize, Serialize};

use super::agent::AgentId;

/// Highest agent id a trail cell can carry
pub const MAX_AGENT_ID: AgentId = 20;
/// Raw occupant code for the good bonus
pub const GOOD_BONUS_CODE: u8 = 21;
/// Raw occupant code for the mild bonus
pub const MILD_BONUS_CODE: u8 = 22;
/// Raw occupant code for a wall
pub const WALL_CODE: u8 = 255;

const BONUS_CODES: std::ops::RangeInclusive<u8> = 21..=40;

/// Bonus token flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    /// +1 score, tail +10
    Good,
    /// +2 score, tail -5
    Mild,
}

impl BonusKind {
    pub fn code(self) -> u8 {
        match self {
            BonusKind::Good => GOOD_BONUS_CODE,
            BonusKind::Mild => MILD_BONUS_CODE,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            GOOD_BONUS_CODE => Some(BonusKind::Good),
            MILD_BONUS_CODE => Some(BonusKind::Mild),
            _ => None,
        }
    }

    /// Score awarded on pickup
    pub fn score(self) -> u32 {
        match self {
            BonusKind::Good => 1,
            BonusKind::Mild => 2,
        }
    }

    /// Signed change to the eater's tail budget (clamped by the agent)
    pub fn tail_delta(self) -> i32 {
        match self {
            BonusKind::Good => 10,
            BonusKind::Mild => -5,
        }
    }
}

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    /// Claimed by an agent's trail `age` ticks ago
    Trail { owner: AgentId, age: u32 },
    /// Bonus token spawned `age` ticks ago
    Bonus { kind: BonusKind, age: u32 },
    /// Permanent, never ages
    Wall,
}

impl Cell {
    /// Fresh trail cell for `owner`
    pub fn trail(owner: AgentId) -> Self {
        Cell::Trail { owner, age: 0 }
    }

    /// Fresh bonus cell
    pub fn bonus(kind: BonusKind) -> Self {
        Cell::Bonus { kind, age: 0 }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Trails and walls are what agents steer away from.
    pub fn is_obstacle(&self) -> bool {
        matches!(self, Cell::Trail { .. } | Cell::Wall)
    }

    /// Numeric `(occupant, age)` encoding of this cell.
    pub fn to_raw(self) -> (u8, u32) {
        match self {
            Cell::Empty => (0, 0),
            Cell::Trail { owner, age } => (owner, age),
            Cell::Bonus { kind, age } => (kind.code(), age),
            Cell::Wall => (WALL_CODE, 0),
        }
    }

    /// Decode the numeric encoding. Reserved bonus codes (`23..=40`) and
    /// the unused ranges decode to `None`.
    pub fn from_raw(occupant: u8, age: u32) -> Option<Self> {
        match occupant {
            0 => Some(Cell::Empty),
            1..=MAX_AGENT_ID => Some(Cell::Trail { owner: occupant, age }),
            code if BONUS_CODES.contains(&code) => {
                BonusKind::from_code(code).map(|kind| Cell::Bonus { kind, age })
            }
            WALL_CODE => Some(Cell::Wall),
            _ => None,
        }
    }
}
