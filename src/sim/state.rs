//! Arena state and core simulation types
//!
//! Everything a tick reads or writes lives in `ArenaState`; there is no
//! other mutable state anywhere in the crate.

use glam::UVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::agent::{Agent, AgentId, AgentKind, Direction, KeyBindings};
use super::cell::{BonusKind, Cell, MAX_AGENT_ID};
use super::grid::{Grid, WallRect};
use crate::consts::DEFAULT_BONUS_TIMEOUT;
use crate::error::ArenaError;

/// Rule switches fixed for the lifetime of an arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaRules {
    /// Dead agents leave play for good instead of carrying on
    pub single_life: bool,
    /// Ticks an uneaten bonus survives
    pub bonus_timeout: u32,
}

impl Default for ArenaRules {
    fn default() -> Self {
        Self {
            single_life: false,
            bonus_timeout: DEFAULT_BONUS_TIMEOUT,
        }
    }
}

/// What an agent crashed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Trail owned by the given agent (possibly the crasher itself)
    Trail(AgentId),
    Wall,
}

/// Things that happened during a tick, in the order they happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaEvent {
    BonusSpawned { pos: UVec2, kind: BonusKind },
    BonusEaten { agent: AgentId, kind: BonusKind },
    /// Two agents aimed at the same cell
    HeadOn { first: AgentId, second: AgentId, pos: UVec2 },
    Crashed { agent: AgentId, cause: CrashCause },
    Killed { victim: AgentId, killer: AgentId },
    Removed { agent: AgentId },
}

/// Read-only view of one agent for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub kind: AgentKind,
    pub pos: UVec2,
    pub dir: Direction,
    pub score: u32,
    pub dead: u32,
    pub kill: u32,
    pub tail: u32,
    pub reset: bool,
    pub removed: bool,
    pub color: u8,
}

impl From<&Agent> for AgentView {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            kind: agent.kind,
            pos: agent.pos,
            dir: agent.dir,
            score: agent.score,
            dead: agent.dead,
            kill: agent.kill,
            tail: agent.tail,
            reset: agent.reset,
            removed: agent.removed,
            color: agent.color,
        }
    }
}

/// Complete post-tick state as seen by observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub tick: u64,
    pub width: u32,
    pub height: u32,
    /// Row-major, row 0 at the bottom
    pub cells: Vec<Cell>,
    pub agents: Vec<AgentView>,
}

/// Complete arena state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct ArenaState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rules: ArenaRules,
    pub grid: Grid,
    /// Registration order; agent `id` is its index + 1
    pub agents: Vec<Agent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// The shared generator every random draw goes through
    pub(super) rng: Pcg32,
}

impl ArenaState {
    /// Create an empty arena with the given seed
    pub fn new(width: u32, height: u32, seed: u64, rules: ArenaRules) -> Result<Self, ArenaError> {
        let grid = Grid::new(width, height)?;
        log::info!("Arena {}x{} created with seed {}", width, height, seed);
        Ok(Self {
            seed,
            rules,
            grid,
            agents: Vec::new(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn place_wall(&mut self, rect: WallRect) {
        let placed = self.grid.place_wall(rect);
        log::debug!("Wall {:?}: {} cells", rect, placed);
    }

    /// Add an agent at a random empty cell, claiming that cell immediately.
    ///
    /// Returns `Ok(None)` when the grid has no empty cell; the agent is
    /// simply not created.
    pub fn register_agent(
        &mut self,
        kind: AgentKind,
        bindings: KeyBindings,
        color: u8,
    ) -> Result<Option<AgentId>, ArenaError> {
        if self.agents.len() >= MAX_AGENT_ID as usize {
            return Err(ArenaError::RosterFull { max: MAX_AGENT_ID as usize });
        }
        let Some(pos) = self.grid.random_empty_cell(&mut self.rng) else {
            log::warn!("No empty cell for new {:?} agent, skipping", kind);
            return Ok(None);
        };
        let dir = Direction::ALL[self.rng.random_range(0..4)];
        let id = self.agents.len() as AgentId + 1;

        self.agents.push(Agent::new(id, kind, pos, dir, bindings, color));
        self.grid.set(pos, Cell::trail(id));
        log::info!("Agent {} ({:?}) enters at {} facing {:?}", id, kind, pos, dir);
        Ok(Some(id))
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        id.checked_sub(1).and_then(|i| self.agents.get(i as usize))
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        id.checked_sub(1).and_then(|i| self.agents.get_mut(i as usize))
    }

    /// Agents still taking part in play
    pub fn active_agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.in_play())
    }

    /// Capture the observable state. Never mutates anything.
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            tick: self.time_ticks,
            width: self.grid.width(),
            height: self.grid.height(),
            cells: self.grid.cells().to_vec(),
            agents: self.agents.iter().map(AgentView::from).collect(),
        }
    }
}
