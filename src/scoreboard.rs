//! Scoreboard
//!
//! Standings for every non-drone agent, best first.

use serde::{Deserialize, Serialize};

use crate::sim::{Agent, AgentId};

/// A single agent's standing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub agent: AgentId,
    /// Bonus score
    pub score: u32,
    pub kill: u32,
    pub dead: u32,
    /// Out of play (single-life mode)
    pub removed: bool,
}

impl ScoreEntry {
    /// `KILL k  , DEATH d  , BONUS s  ` line for the stats panel
    pub fn line(&self) -> String {
        format!(
            "KILL {:<3}, DEATH {:<3}, BONUS {:<3}",
            self.kill, self.dead, self.score
        )
    }
}

/// Ranked standings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    /// Rank agents by score, then kills, then fewest deaths, then id.
    /// Drones are not ranked.
    pub fn from_agents<'a>(agents: impl IntoIterator<Item = &'a Agent>) -> Self {
        let mut entries: Vec<ScoreEntry> = agents
            .into_iter()
            .filter(|a| !a.is_drone())
            .map(|a| ScoreEntry {
                agent: a.id,
                score: a.score,
                kill: a.kill,
                dead: a.dead,
                removed: a.removed,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(b.kill.cmp(&a.kill))
                .then(a.dead.cmp(&b.dead))
                .then(a.agent.cmp(&b.agent))
        });
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best-ranked agent (if any)
    pub fn leader(&self) -> Option<AgentId> {
        self.entries.first().map(|e| e.agent)
    }

    /// 1-indexed rank of an agent
    pub fn rank_of(&self, agent: AgentId) -> Option<usize> {
        self.entries.iter().position(|e| e.agent == agent).map(|i| i + 1)
    }

    /// One formatted line per ranked agent
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let status = if e.removed { " (out)" } else { "" };
                format!("{}. agent {:>2}: {}{}", i + 1, e.agent, e.line(), status)
            })
            .collect()
    }
}
