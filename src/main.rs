//! Trail Arena entry point
//!
//! Runs the tick loop headless: no rendering reads, same state evolution
//! as any rendering front-end given the same seed and inputs.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;

use trail_arena::input::{InputAdapter, InputScript};
use trail_arena::sim::{ArenaEvent, ArenaState, tick};
use trail_arena::{ArenaError, ArenaSettings, Scoreboard};

#[derive(Parser, Debug)]
#[command(name = "trail-arena", about = "Run a light-trail arena simulation headless")]
struct Cli {
    /// JSON settings file (defaults to the reference arena)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Remove agents from play when they die
    #[arg(long)]
    single_life: bool,

    /// Pace ticks at the configured tick rate instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// JSON key-press script for human agents
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Write the final snapshot as JSON to this path
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("trail-arena: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), ArenaError> {
    let mut settings = match &cli.config {
        Some(path) => ArenaSettings::load(path)?,
        None => ArenaSettings::default(),
    };
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    if cli.single_life {
        settings.single_life = true;
    }

    let seed = settings.resolve_seed();
    let mut state = settings.build(seed)?;
    log::info!(
        "Trail Arena starting: {} agents, seed {}, {} ticks",
        state.agents.len(),
        seed,
        cli.ticks
    );

    let script = match &cli.inputs {
        Some(path) => InputScript::load(path)?,
        None => InputScript::default(),
    };

    run_loop(&mut state, &script, cli.ticks, cli.realtime.then(|| {
        Duration::from_millis(settings.tick_rate_ms)
    }));

    println!("Final standings after {} ticks (seed {}):", state.time_ticks, seed);
    for line in Scoreboard::from_agents(&state.agents).lines() {
        println!("  {line}");
    }

    if let Some(path) = &cli.snapshot {
        write_snapshot(&state, path)?;
    }
    Ok(())
}

/// Tick until `ticks` have run or every non-drone agent is out of play
fn run_loop(state: &mut ArenaState, script: &InputScript, ticks: u64, pace: Option<Duration>) {
    let mut adapter = InputAdapter::new();
    let mut next_deadline = Instant::now();
    let has_contenders = state.agents.iter().any(|a| !a.is_drone());

    for _ in 0..ticks {
        script.feed(state.time_ticks + 1, &mut adapter);
        let input = adapter.drain(state);
        let events = tick(state, &input);

        for event in &events {
            if let ArenaEvent::Killed { victim, killer } = event {
                log::info!("Tick {}: agent {} killed agent {}", state.time_ticks, killer, victim);
            }
        }

        if has_contenders && state.rules.single_life && state.active_agents().all(|a| a.is_drone()) {
            log::info!("No contenders left after tick {}", state.time_ticks);
            break;
        }

        if let Some(pace) = pace {
            next_deadline += pace;
            let now = Instant::now();
            if next_deadline > now {
                std::thread::sleep(next_deadline - now);
            } else {
                // Fell behind; don't try to catch up
                next_deadline = now;
            }
        }
    }
}

fn write_snapshot(state: &ArenaState, path: &Path) -> Result<(), ArenaError> {
    let json = serde_json::to_string(&state.snapshot()).map_err(|source| ArenaError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| ArenaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Snapshot written to {}", path.display());
    Ok(())
}
