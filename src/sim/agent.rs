//! Agents ("snakes") and their per-tick mutable state

use glam::{IVec2, UVec2};
use serde::{Deserialize, Serialize};

use super::cell::BonusKind;

/// 1-based agent identifier, stable for the agent's lifetime
pub type AgentId = u8;

/// Facing direction. `(0, 0)` is the bottom-left corner, so `Up` is +y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit step in grid space
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, 1),
            Direction::Right => IVec2::new(1, 0),
            Direction::Down => IVec2::new(0, -1),
            Direction::Left => IVec2::new(-1, 0),
        }
    }

    /// 90° clockwise
    pub fn clockwise(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// 90° counter-clockwise
    pub fn counter_clockwise(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Right => Direction::Up,
            Direction::Down => Direction::Right,
            Direction::Left => Direction::Down,
        }
    }

    pub fn opposite(self) -> Self {
        self.clockwise().clockwise()
    }

    pub fn is_reverse_of(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// Who decides an agent's direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Steered through key bindings
    Human,
    /// Random straight-biased walker with no trail
    Drone,
    /// Looks ahead and turns away from obstacles
    Cpu,
}

/// Tail budget limits for a kind of agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailLimits {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl AgentKind {
    pub fn tail_limits(self) -> TailLimits {
        match self {
            AgentKind::Drone => TailLimits { min: 0, max: 0, default: 0 },
            AgentKind::Human | AgentKind::Cpu => TailLimits { min: 9, max: 299, default: 29 },
        }
    }
}

/// Key names bound to each direction. Only meaningful for human agents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyBindings {
    pub up: String,
    pub right: String,
    pub down: String,
    pub left: String,
}

impl KeyBindings {
    pub fn new(up: &str, right: &str, down: &str, left: &str) -> Self {
        Self {
            up: up.to_string(),
            right: right.to_string(),
            down: down.to_string(),
            left: left.to_string(),
        }
    }

    /// Arrow keys
    pub fn arrows() -> Self {
        Self::new("Up", "Right", "Down", "Left")
    }

    /// Direction bound to `key`, if any
    pub fn direction_for(&self, key: &str) -> Option<Direction> {
        if key.is_empty() {
            return None;
        }
        if key == self.up {
            Some(Direction::Up)
        } else if key == self.right {
            Some(Direction::Right)
        } else if key == self.down {
            Some(Direction::Down)
        } else if key == self.left {
            Some(Direction::Left)
        } else {
            None
        }
    }
}

/// A trail-leaving agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub kind: AgentKind,
    /// Authoritative position
    pub pos: UVec2,
    /// Tentative position computed by `move`, committed during collision resolution
    pub next_pos: UVec2,
    pub dir: Direction,
    /// Direction to take on the next decision (set by input for humans)
    pub next_dir: Direction,
    pub limits: TailLimits,
    /// Current tail budget: maximum age a trail cell may reach
    pub tail: u32,
    pub score: u32,
    pub dead: u32,
    pub kill: u32,
    /// Died during the current tick
    pub reset: bool,
    /// Permanently out of play (single-life mode)
    pub removed: bool,
    pub bindings: KeyBindings,
    /// Palette index for the presentation layer
    pub color: u8,
}

impl Agent {
    /// Position of agents that no longer take part in the simulation.
    /// Never equal to a real cell.
    pub const OFF_GRID: UVec2 = UVec2::MAX;

    pub fn new(
        id: AgentId,
        kind: AgentKind,
        pos: UVec2,
        dir: Direction,
        bindings: KeyBindings,
        color: u8,
    ) -> Self {
        let limits = kind.tail_limits();
        Self {
            id,
            kind,
            pos,
            next_pos: pos,
            dir,
            next_dir: dir,
            limits,
            tail: limits.default,
            score: 0,
            dead: 0,
            kill: 0,
            reset: false,
            removed: false,
            bindings,
            color,
        }
    }

    pub fn is_drone(&self) -> bool {
        self.kind == AgentKind::Drone
    }

    /// Still making decisions and moving
    pub fn in_play(&self) -> bool {
        !self.removed
    }

    /// Record a death. Returns false if this agent already died this tick,
    /// in which case nothing changes.
    pub fn die(&mut self) -> bool {
        if self.reset {
            return false;
        }
        self.reset = true;
        self.tail = self.limits.default;
        self.dead += 1;
        true
    }

    /// Take the agent out of play for good. Its trail stays on the grid
    /// until the aging pass clears it.
    pub fn remove(&mut self) {
        self.removed = true;
        self.reset = true;
        self.tail = 0;
        self.pos = Self::OFF_GRID;
        self.next_pos = Self::OFF_GRID;
    }

    /// Apply a bonus pickup, keeping the tail within limits
    pub fn eat(&mut self, bonus: BonusKind) {
        self.score += bonus.score();
        let tail = self.tail as i64 + bonus.tail_delta() as i64;
        self.tail = tail.clamp(self.limits.min as i64, self.limits.max as i64) as u32;
    }
}
