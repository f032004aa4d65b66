//! Fixed-order simulation tick
//!
//! One call advances the arena by exactly one step:
//!   1. Bonus spawn
//!   2. Agents in registration order: decide, move, head-on check against
//!      lower-indexed agents, commit, resolve the occupied cell
//!   3. Aging pass over every cell
//!
//! Later agents see the tentative positions of earlier ones, so the
//! iteration order is part of the rules.

use super::agent::{Agent, AgentId, AgentKind, Direction};
use super::ai;
use super::cell::Cell;
use super::state::{ArenaEvent, ArenaState, CrashCause};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Direction requests for human agents, already checked against reversal
    pub steering: Vec<(AgentId, Direction)>,
}

impl TickInput {
    pub fn steer(&mut self, agent: AgentId, dir: Direction) {
        self.steering.push((agent, dir));
    }

    pub fn is_empty(&self) -> bool {
        self.steering.is_empty()
    }
}

/// Advance the arena by one tick and report what happened
pub fn tick(state: &mut ArenaState, input: &TickInput) -> Vec<ArenaEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    apply_steering(state, input);

    if let Some((pos, kind)) = state.grid.spawn_bonus(&mut state.rng) {
        log::debug!("Tick {}: {:?} bonus at {}", state.time_ticks, kind, pos);
        events.push(ArenaEvent::BonusSpawned { pos, kind });
    }

    for index in 0..state.agents.len() {
        advance_agent(state, index, &mut events);
    }

    age_cells(state);

    events
}

fn apply_steering(state: &mut ArenaState, input: &TickInput) {
    for &(id, dir) in &input.steering {
        let Some(agent) = state.agent_mut(id) else {
            log::warn!("Steering for unknown agent {}", id);
            continue;
        };
        if agent.kind != AgentKind::Human || !agent.in_play() {
            log::warn!("Agent {} does not take steering", id);
            continue;
        }
        if dir.is_reverse_of(agent.dir) {
            log::warn!("Agent {} cannot reverse from {:?} to {:?}", id, agent.dir, dir);
            continue;
        }
        agent.next_dir = dir;
    }
}

/// Record a death, taking the agent out of play in single-life mode.
/// Drones keep wandering whatever the rules.
fn kill(agent: &mut Agent, single_life: bool, events: &mut Vec<ArenaEvent>) {
    if agent.die() && single_life && !agent.is_drone() {
        agent.remove();
        log::debug!("Agent {} removed from play", agent.id);
        events.push(ArenaEvent::Removed { agent: agent.id });
    }
}

/// Step 2 for the agent at `index`
fn advance_agent(state: &mut ArenaState, index: usize, events: &mut Vec<ArenaEvent>) {
    let single_life = state.rules.single_life;
    let (earlier, rest) = state.agents.split_at_mut(index);
    let agent = &mut rest[0];

    if !agent.in_play() {
        return;
    }
    agent.reset = false;

    let dir = ai::decide_direction(agent, &state.grid, &mut state.rng);
    agent.dir = dir;
    agent.next_dir = dir;
    agent.next_pos = state.grid.step(agent.pos, dir);
    let target = agent.next_pos;
    let id = agent.id;

    // Head-on: only lower-indexed agents have a tentative position this tick.
    // Removed agents sit at OFF_GRID and never match.
    let mut head_on = false;
    for other in earlier.iter_mut().filter(|o| o.next_pos == target && o.id != id) {
        head_on = true;
        log::debug!("Agents {} and {} collide head-on at {}", other.id, id, target);
        events.push(ArenaEvent::HeadOn { first: other.id, second: id, pos: target });
        kill(other, single_life, events);
        kill(agent, single_life, events);
    }
    if agent.removed {
        return;
    }

    agent.pos = target;
    if head_on {
        // The contested cell belongs to the earlier agent, whose trail is
        // already doomed; resolving it would charge a second death.
        return;
    }

    let mut killer = None;
    match state.grid.get(target) {
        Cell::Empty => state.grid.set(target, Cell::trail(id)),
        Cell::Trail { .. } if agent.is_drone() => state.grid.set(target, Cell::trail(id)),
        Cell::Trail { owner, .. } => {
            log::debug!("Agent {} hit trail of agent {}", id, owner);
            events.push(ArenaEvent::Crashed { agent: id, cause: CrashCause::Trail(owner) });
            kill(agent, single_life, events);
            if owner != id {
                killer = Some(owner);
            }
        }
        Cell::Bonus { kind, .. } => {
            state.grid.set(target, Cell::trail(id));
            agent.eat(kind);
            log::debug!("Agent {} ate {:?} bonus, tail now {}", id, kind, agent.tail);
            events.push(ArenaEvent::BonusEaten { agent: id, kind });
        }
        Cell::Wall => {
            log::debug!("Agent {} hit a wall", id);
            events.push(ArenaEvent::Crashed { agent: id, cause: CrashCause::Wall });
            kill(agent, single_life, events);
        }
    }

    if let Some(owner) = killer {
        if let Some(credited) = state.agent_mut(owner) {
            credited.kill += 1;
            events.push(ArenaEvent::Killed { victim: id, killer: owner });
        }
    }
}

/// Step 3: expire or age every trail and bonus cell
pub fn age_cells(state: &mut ArenaState) {
    let agents = &state.agents;
    let bonus_timeout = state.rules.bonus_timeout;

    for cell in state.grid.cells_mut() {
        *cell = match *cell {
            Cell::Trail { owner, age } => {
                let owner_agent = owner.checked_sub(1).and_then(|i| agents.get(i as usize));
                match owner_agent {
                    Some(a) if !a.reset && age <= a.tail => Cell::Trail { owner, age: age + 1 },
                    _ => Cell::Empty,
                }
            }
            Cell::Bonus { age, .. } if age > bonus_timeout => Cell::Empty,
            Cell::Bonus { kind, age } => Cell::Bonus { kind, age: age + 1 },
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::agent::KeyBindings;
    use crate::sim::cell::BonusKind;
    use crate::sim::state::ArenaRules;
    use glam::UVec2;

    fn arena(width: u32, height: u32, single_life: bool) -> ArenaState {
        let rules = ArenaRules { single_life, ..ArenaRules::default() };
        ArenaState::new(width, height, 12345, rules).unwrap()
    }

    /// Register an agent and move it to a known cell and facing
    fn spawn(state: &mut ArenaState, kind: AgentKind, x: u32, y: u32, dir: Direction) -> AgentId {
        let id = state.register_agent(kind, KeyBindings::arrows(), 1).unwrap().unwrap();
        let pos = UVec2::new(x, y);
        let old = state.agent(id).unwrap().pos;
        state.grid.clear(old);
        state.grid.set(pos, Cell::trail(id));
        let agent = state.agent_mut(id).unwrap();
        agent.pos = pos;
        agent.next_pos = pos;
        agent.dir = dir;
        agent.next_dir = dir;
        id
    }

    fn surround(state: &mut ArenaState, x: u32, y: u32, cell: Cell) {
        let pos = UVec2::new(x, y);
        for dir in Direction::ALL {
            let n = state.grid.step(pos, dir);
            state.grid.set(n, cell);
        }
    }

    #[test]
    fn test_tick_wraps_at_edges() {
        let mut state = arena(10, 10, false);
        let a = spawn(&mut state, AgentKind::Human, 9, 4, Direction::Right);
        let b = spawn(&mut state, AgentKind::Human, 2, 0, Direction::Down);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.agent(a).unwrap().pos, UVec2::new(0, 4));
        assert_eq!(state.agent(b).unwrap().pos, UVec2::new(2, 9));
        assert!(matches!(state.grid.get(UVec2::new(0, 4)), Cell::Trail { owner, .. } if owner == a));
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_head_on_kills_both_once() {
        let mut state = arena(10, 10, false);
        let a = spawn(&mut state, AgentKind::Human, 2, 5, Direction::Right);
        let b = spawn(&mut state, AgentKind::Human, 4, 5, Direction::Left);
        let events = tick(&mut state, &TickInput::default());

        let (first, second) = (state.agent(a).unwrap(), state.agent(b).unwrap());
        assert!(first.reset && second.reset);
        assert_eq!((first.dead, second.dead), (1, 1));
        assert_eq!((first.kill, second.kill), (0, 0));
        assert_eq!(first.tail, 29);
        assert_eq!(second.pos, UVec2::new(3, 5));
        assert!(events.contains(&ArenaEvent::HeadOn { first: a, second: b, pos: UVec2::new(3, 5) }));
        // Both trails are wiped by the aging pass
        assert_eq!(state.grid.count(|c| matches!(c, Cell::Trail { .. })), 0);
    }

    #[test]
    fn test_three_way_head_on_counts_one_death_each() {
        let mut state = arena(11, 11, false);
        let ids = [
            spawn(&mut state, AgentKind::Human, 4, 5, Direction::Right),
            spawn(&mut state, AgentKind::Human, 6, 5, Direction::Left),
            spawn(&mut state, AgentKind::Human, 5, 6, Direction::Down),
        ];
        tick(&mut state, &TickInput::default());
        for id in ids {
            let agent = state.agent(id).unwrap();
            assert_eq!(agent.dead, 1, "agent {id}");
            assert_eq!(agent.kill, 0);
        }
    }

    #[test]
    fn test_head_on_single_life_removes_both() {
        let mut state = arena(10, 10, true);
        let a = spawn(&mut state, AgentKind::Human, 2, 5, Direction::Right);
        let b = spawn(&mut state, AgentKind::Human, 4, 5, Direction::Left);
        tick(&mut state, &TickInput::default());

        for id in [a, b] {
            let agent = state.agent(id).unwrap();
            assert!(agent.removed);
            assert_eq!(agent.dead, 1);
            assert_eq!(agent.tail, 0);
            assert_eq!(agent.pos, Agent::OFF_GRID);
        }
        assert_eq!(state.grid.count(|c| matches!(c, Cell::Trail { .. })), 0);

        // Removed agents never move again
        tick(&mut state, &TickInput::default());
        assert_eq!(state.agent(a).unwrap().dead, 1);
        assert_eq!(state.active_agents().count(), 0);
    }

    #[test]
    fn test_trail_crash_credits_owner() {
        let mut state = arena(10, 10, false);
        let a = spawn(&mut state, AgentKind::Human, 2, 2, Direction::Right);
        let b = spawn(&mut state, AgentKind::Human, 7, 7, Direction::Up);
        state.grid.set(UVec2::new(3, 2), Cell::Trail { owner: b, age: 4 });

        let events = tick(&mut state, &TickInput::default());
        let (victim, owner) = (state.agent(a).unwrap(), state.agent(b).unwrap());
        assert_eq!((victim.dead, victim.kill), (1, 0));
        assert_eq!((owner.dead, owner.kill), (0, 1));
        assert!(victim.reset);
        assert!(events.contains(&ArenaEvent::Killed { victim: a, killer: b }));
        // The crash site keeps the owner's trail, aged by one
        assert_eq!(state.grid.get(UVec2::new(3, 2)), Cell::Trail { owner: b, age: 5 });
    }

    #[test]
    fn test_own_trail_crash_credits_nobody() {
        let mut state = arena(10, 10, false);
        let a = spawn(&mut state, AgentKind::Human, 2, 2, Direction::Right);
        state.grid.set(UVec2::new(3, 2), Cell::Trail { owner: a, age: 6 });
        let events = tick(&mut state, &TickInput::default());
        let agent = state.agent(a).unwrap();
        assert_eq!((agent.dead, agent.kill), (1, 0));
        assert!(!events.iter().any(|e| matches!(e, ArenaEvent::Killed { .. })));
        assert_eq!(state.grid.count(|c| matches!(c, Cell::Trail { .. })), 0);
    }

    #[test]
    fn test_wall_crash_leaves_wall() {
        let mut state = arena(10, 10, false);
        let a = spawn(&mut state, AgentKind::Human, 1, 1, Direction::Right);
        state.agent_mut(a).unwrap().tail = 120;
        state.grid.set(UVec2::new(2, 1), Cell::Wall);
        let events = tick(&mut state, &TickInput::default());
        let agent = state.agent(a).unwrap();
        assert_eq!(agent.dead, 1);
        assert_eq!(agent.tail, 29);
        assert_eq!(state.grid.get(UVec2::new(2, 1)), Cell::Wall);
        assert!(events.contains(&ArenaEvent::Crashed { agent: a, cause: CrashCause::Wall }));
    }

    #[test]
    fn test_single_life_wall_crash_removes_agent() {
        let mut state = arena(10, 10, true);
        let a = spawn(&mut state, AgentKind::Human, 1, 1, Direction::Right);
        state.grid.set(UVec2::new(2, 1), Cell::Wall);
        tick(&mut state, &TickInput::default());
        let agent = state.agent(a).unwrap();
        assert!(agent.removed);
        assert_eq!(agent.pos, Agent::OFF_GRID);
        assert!(state.grid.get(UVec2::new(1, 1)).is_empty());
    }

    #[test]
    fn test_drone_passes_through_trails() {
        let mut state = arena(12, 12, false);
        let owner = spawn(&mut state, AgentKind::Human, 0, 0, Direction::Up);
        let drone = spawn(&mut state, AgentKind::Drone, 6, 6, Direction::Up);
        surround(&mut state, 6, 6, Cell::Trail { owner, age: 0 });

        tick(&mut state, &TickInput::default());
        let d = state.agent(drone).unwrap();
        assert_eq!(d.dead, 0);
        assert_eq!(state.agent(owner).unwrap().kill, 0);
        assert_eq!(state.grid.get(d.pos), Cell::Trail { owner: drone, age: 1 });
    }

    #[test]
    fn test_drone_survives_single_life_wall() {
        let mut state = arena(12, 12, true);
        let drone = spawn(&mut state, AgentKind::Drone, 6, 6, Direction::Up);
        surround(&mut state, 6, 6, Cell::Wall);
        tick(&mut state, &TickInput::default());
        let d = state.agent(drone).unwrap();
        assert_eq!(d.dead, 1);
        assert!(!d.removed);
        assert!(d.in_play());
        assert_eq!(d.tail, 0);
    }

    #[test]
    fn test_bonus_pickup() {
        let mut state = arena(10, 10, false);
        let a = spawn(&mut state, AgentKind::Human, 1, 1, Direction::Right);
        state.grid.set(UVec2::new(2, 1), Cell::Bonus { kind: BonusKind::Good, age: 30 });
        state.grid.set(UVec2::new(3, 1), Cell::bonus(BonusKind::Mild));

        tick(&mut state, &TickInput::default());
        let agent = state.agent(a).unwrap();
        assert_eq!((agent.score, agent.tail), (1, 39));
        assert_eq!(state.grid.get(UVec2::new(2, 1)), Cell::Trail { owner: a, age: 1 });

        tick(&mut state, &TickInput::default());
        let agent = state.agent(a).unwrap();
        assert_eq!((agent.score, agent.tail), (3, 34));
    }

    #[test]
    fn test_steering_rejects_reversal_and_non_humans() {
        let mut state = arena(10, 10, false);
        let human = spawn(&mut state, AgentKind::Human, 5, 5, Direction::Right);
        let cpu = spawn(&mut state, AgentKind::Cpu, 1, 8, Direction::Up);

        let mut input = TickInput::default();
        input.steer(human, Direction::Left);
        input.steer(cpu, Direction::Down);
        input.steer(42, Direction::Up);
        tick(&mut state, &input);
        assert_eq!(state.agent(human).unwrap().pos, UVec2::new(6, 5));

        let mut input = TickInput::default();
        input.steer(human, Direction::Up);
        tick(&mut state, &input);
        let agent = state.agent(human).unwrap();
        assert_eq!(agent.pos, UVec2::new(6, 6));
        assert_eq!(agent.dir, Direction::Up);
    }

    #[test]
    fn test_trail_expiry_boundary() {
        let mut state = arena(10, 10, false);
        let a = spawn(&mut state, AgentKind::Human, 0, 0, Direction::Up);
        let tail = state.agent(a).unwrap().tail;
        let keep = UVec2::new(4, 4);
        let drop = UVec2::new(5, 5);
        state.grid.set(keep, Cell::Trail { owner: a, age: tail });
        state.grid.set(drop, Cell::Trail { owner: a, age: tail + 1 });

        age_cells(&mut state);
        assert_eq!(state.grid.get(keep), Cell::Trail { owner: a, age: tail + 1 });
        assert!(state.grid.get(drop).is_empty());

        age_cells(&mut state);
        assert!(state.grid.get(keep).is_empty());
    }

    #[test]
    fn test_reset_owner_loses_whole_trail() {
        let mut state = arena(10, 10, false);
        let a = spawn(&mut state, AgentKind::Human, 0, 0, Direction::Up);
        for x in 1..6 {
            state.grid.set(UVec2::new(x, 3), Cell::Trail { owner: a, age: x });
        }
        state.agent_mut(a).unwrap().reset = true;
        age_cells(&mut state);
        assert_eq!(state.grid.count(|c| matches!(c, Cell::Trail { .. })), 0);
    }

    #[test]
    fn test_bonus_timeout() {
        let mut state = arena(10, 10, false);
        let timeout = state.rules.bonus_timeout;
        let keep = UVec2::new(1, 1);
        let drop = UVec2::new(2, 2);
        state.grid.set(keep, Cell::Bonus { kind: BonusKind::Good, age: timeout });
        state.grid.set(drop, Cell::Bonus { kind: BonusKind::Mild, age: timeout + 1 });
        state.grid.set(UVec2::new(3, 3), Cell::Wall);

        age_cells(&mut state);
        assert_eq!(state.grid.get(keep), Cell::Bonus { kind: BonusKind::Good, age: timeout + 1 });
        assert!(state.grid.get(drop).is_empty());
        assert_eq!(state.grid.get(UVec2::new(3, 3)), Cell::Wall);
    }

    #[test]
    fn test_unknown_owner_is_cleared() {
        let mut state = arena(4, 4, false);
        state.grid.set(UVec2::new(1, 1), Cell::Trail { owner: 9, age: 0 });
        age_cells(&mut state);
        assert!(state.grid.get(UVec2::new(1, 1)).is_empty());
    }

    #[test]
    fn test_trail_age_increases_each_tick() {
        let mut state = arena(30, 3, false);
        let a = spawn(&mut state, AgentKind::Human, 0, 1, Direction::Right);
        let start = UVec2::new(0, 1);
        let mut last_age = 0;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
            let Cell::Trail { owner, age } = state.grid.get(start) else {
                panic!("trail at start expired early");
            };
            assert_eq!(owner, a);
            assert!(age > last_age);
            last_age = age;
        }
    }

    #[test]
    fn test_determinism() {
        let build = || {
            let mut state = ArenaState::new(24, 16, 99999, ArenaRules::default()).unwrap();
            state.place_wall(crate::sim::WallRect::new(8, 4, 15, 5));
            state.register_agent(AgentKind::Human, KeyBindings::arrows(), 1).unwrap();
            for _ in 0..3 {
                state.register_agent(AgentKind::Cpu, KeyBindings::default(), 2).unwrap();
            }
            for _ in 0..2 {
                state.register_agent(AgentKind::Drone, KeyBindings::default(), 8).unwrap();
            }
            state
        };
        let mut state1 = build();
        let mut state2 = build();

        let turns = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];
        for n in 0..400u32 {
            let mut input = TickInput::default();
            if n % 7 == 0 {
                let current = state1.agent(1).unwrap().dir;
                let turn = turns[(n as usize / 7) % 4];
                if !turn.is_reverse_of(current) {
                    input.steer(1, turn);
                }
            }
            let e1 = tick(&mut state1, &input);
            let e2 = tick(&mut state2, &input);
            assert_eq!(e1, e2);
        }

        assert_eq!(state1.snapshot(), state2.snapshot());
    }
}
