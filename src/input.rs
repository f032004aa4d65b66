//! Input adapter
//!
//! Collects key presses between ticks and turns them into steering
//! requests for human agents. A press that would reverse an agent onto
//! its own head is dropped here; the simulation never sees it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ArenaError;
use crate::sim::{AgentKind, ArenaState, TickInput};

/// Key presses waiting for the next tick
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    pressed: Vec<String>,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a key press (key names match `KeyBindings`)
    pub fn press(&mut self, key: impl Into<String>) {
        self.pressed.push(key.into());
    }

    pub fn has_pending(&self) -> bool {
        !self.pressed.is_empty()
    }

    /// Turn queued presses into this tick's input and clear the queue.
    ///
    /// Presses are applied in order, so the last valid press for an agent
    /// wins. Reversals are checked against the agent's current facing.
    pub fn drain(&mut self, state: &ArenaState) -> TickInput {
        let mut input = TickInput::default();
        for key in self.pressed.drain(..) {
            for agent in state.active_agents().filter(|a| a.kind == AgentKind::Human) {
                let Some(dir) = agent.bindings.direction_for(&key) else {
                    continue;
                };
                if dir.is_reverse_of(agent.dir) {
                    log::debug!("Agent {}: dropping reversal {:?}", agent.id, dir);
                    continue;
                }
                input.steer(agent.id, dir);
            }
        }
        input
    }
}

/// A key press at a given tick, for scripted runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedPress {
    pub tick: u64,
    pub key: String,
}

/// Fixed sequence of key presses fed to headless runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputScript {
    pub presses: Vec<ScriptedPress>,
}

impl InputScript {
    /// Load a JSON script: `{ "presses": [{ "tick": 3, "key": "Up" }, ...] }`
    pub fn load(path: &Path) -> Result<Self, ArenaError> {
        let json = std::fs::read_to_string(path).map_err(|source| ArenaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut script: Self = serde_json::from_str(&json).map_err(|source| ArenaError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        script.presses.sort_by_key(|p| p.tick);
        Ok(script)
    }

    /// Queue every press scheduled for `tick`
    pub fn feed(&self, tick: u64, adapter: &mut InputAdapter) {
        self.presses
            .iter()
            .filter(|p| p.tick == tick)
            .for_each(|p| adapter.press(p.key.clone()));
    }
}
