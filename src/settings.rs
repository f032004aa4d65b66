//! Arena settings
//!
//! Loaded from a JSON file; any missing field falls back to the reference
//! arena (72x48, four wall bars, one human, three cpu, two drones).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ArenaError;
use crate::sim::state::ArenaRules;
use crate::sim::{AgentKind, ArenaState, KeyBindings, WallRect};

/// One roster entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub kind: AgentKind,
    /// Only used by human agents
    #[serde(default)]
    pub bindings: KeyBindings,
    /// Palette index
    #[serde(default)]
    pub color: u8,
}

impl AgentSpec {
    pub fn new(kind: AgentKind, bindings: KeyBindings, color: u8) -> Self {
        Self { kind, bindings, color }
    }
}

/// Everything needed to set up an arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    pub width: u32,
    pub height: u32,
    /// Milliseconds between ticks when pacing in real time
    pub tick_rate_ms: u64,
    pub bonus_timeout: u32,
    /// Dead agents leave play instead of carrying on
    pub single_life: bool,
    /// Fixed seed; a random one is drawn when absent
    pub seed: Option<u64>,
    pub walls: Vec<WallRect>,
    pub roster: Vec<AgentSpec>,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
            bonus_timeout: DEFAULT_BONUS_TIMEOUT,
            single_life: false,
            seed: None,
            walls: vec![
                WallRect::new(22, 10, 48, 11),
                WallRect::new(22, 36, 48, 37),
                WallRect::new(10, 22, 11, 24),
                WallRect::new(60, 22, 61, 24),
            ],
            roster: vec![
                AgentSpec::new(AgentKind::Human, KeyBindings::arrows(), 1),
                AgentSpec::new(AgentKind::Cpu, KeyBindings::new("W", "D", "S", "A"), 2),
                AgentSpec::new(AgentKind::Cpu, KeyBindings::new("R", "G", "F", "D"), 3),
                AgentSpec::new(AgentKind::Cpu, KeyBindings::new("U", "K", "J", "H"), 4),
                AgentSpec::new(AgentKind::Drone, KeyBindings::default(), 8),
                AgentSpec::new(AgentKind::Drone, KeyBindings::default(), 8),
            ],
        }
    }
}

impl ArenaSettings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ArenaError> {
        let json = std::fs::read_to_string(path).map_err(|source| ArenaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json).map_err(|source| ArenaError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject configurations that cannot produce a grid
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.width == 0 || self.height == 0 {
            return Err(ArenaError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn rules(&self) -> ArenaRules {
        ArenaRules {
            single_life: self.single_life,
            bonus_timeout: self.bonus_timeout,
        }
    }

    /// Seed to run with: the configured one, or a fresh random draw
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Build a ready-to-tick arena: walls first, then the roster in order
    pub fn build(&self, seed: u64) -> Result<ArenaState, ArenaError> {
        self.validate()?;
        let mut state = ArenaState::new(self.width, self.height, seed, self.rules())?;
        for rect in &self.walls {
            state.place_wall(*rect);
        }
        for spec in &self.roster {
            state.register_agent(spec.kind, spec.bindings.clone(), spec.color)?;
        }
        Ok(state)
    }
}
