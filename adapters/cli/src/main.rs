#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Outbreak sessions in the terminal.

mod commands;
mod config;
mod driver;
mod layout_transfer;
mod terminal;

use std::{
    io::{self, BufReader},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use outbreak_core::{Command, Event, Grid, PlayMode};
use outbreak_rendering::{Presentation, RenderingBackend};
use outbreak_system_scenario::generate_seeded;
use outbreak_world::{self as world, query, World};
use tracing::{info, warn};

use crate::{
    config::{FileConfig, PresetChoice, SessionConfig},
    driver::{Driver, StopRules},
    layout_transfer::GridLayoutSnapshot,
    terminal::TerminalBackend,
};

/// Zombie outbreak simulator: humans run for shelter, zombies give chase.
#[derive(Debug, Parser)]
#[command(name = "outbreak", version)]
struct CliArgs {
    /// Grid edge length (6..=60).
    #[arg(long)]
    size: Option<u32>,
    /// Maximum number of turns to simulate.
    #[arg(long)]
    turns: Option<u64>,
    /// Delay between frames in milliseconds (50..=1000).
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,
    /// Scenario used to populate the initial grid.
    #[arg(long, value_enum)]
    preset: Option<PresetChoice>,
    /// Seed for preset generation.
    #[arg(long)]
    seed: Option<u64>,
    /// Layout string to load instead of a preset.
    #[arg(long)]
    layout: Option<String>,
    /// TOML session file providing defaults for the flags above.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the initial grid as a layout string and exit.
    #[arg(long)]
    export: bool,
    /// Stop as soon as a turn moves nothing.
    #[arg(long)]
    until_stable: bool,
    /// Print only the final frame.
    #[arg(long)]
    quiet: bool,
    /// Start paused and read edit commands from stdin (brush, paint, erase,
    /// look, start, pause, step, reset, quit).
    #[arg(long)]
    interactive: bool,
    /// Paint cells with 24-bit terminal colours.
    #[arg(long)]
    color: bool,
}

impl CliArgs {
    fn overrides(&self) -> FileConfig {
        FileConfig {
            size: self.size,
            turns: self.turns,
            tick_ms: self.tick_ms,
            preset: self.preset,
            seed: self.seed,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let file = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let config = SessionConfig::resolve(&args.overrides(), &file);

    let mut world = World::with_size(config.size);
    let mut events = Vec::new();
    if let Some(grid) = initial_grid(&args, &config)? {
        world::apply(&mut world, Command::LoadGrid { grid }, &mut events);
    }

    if args.export {
        let encoded = GridLayoutSnapshot::new(query::grid_snapshot(&world))
            .encode()
            .context("failed to encode layout")?;
        println!("{encoded}");
        return Ok(());
    }

    if !args.interactive {
        world::apply(
            &mut world,
            Command::SetPlayMode {
                mode: PlayMode::Running,
            },
            &mut events,
        );
        if let Some(reason) = events.iter().find_map(|event| match event {
            Event::StartRejected { reason } => Some(*reason),
            _ => None,
        }) {
            warn!(%reason, "simulation cannot start");
            bail!("cannot start the simulation: {reason}; pass --preset, --layout or --interactive");
        }
    }

    info!(
        size = query::size(&world),
        turns = config.turns,
        tick_ms = config.tick.as_millis(),
        interactive = args.interactive,
        "starting session"
    );

    let rules = StopRules {
        turn_limit: config.turns,
        until_stable: args.until_stable,
        interactive: args.interactive,
    };
    let mut driver = Driver::new(world, events, rules);
    let presentation = Presentation::new("Outbreak", driver.scene());
    let mut backend = TerminalBackend::new(io::stdout(), config.tick, args.quiet).with_color(args.color);
    if args.interactive {
        backend = backend.with_input(commands::spawn_reader(BufReader::new(io::stdin()))?);
    }
    backend.run(presentation, move |_, input, scene| driver.frame(input, scene))
}

fn initial_grid(args: &CliArgs, config: &SessionConfig) -> Result<Option<Grid>> {
    if let Some(layout) = &args.layout {
        let snapshot = GridLayoutSnapshot::decode(layout).context("invalid --layout string")?;
        let grid = snapshot.into_grid();
        info!(size = grid.size(), "loaded layout");
        return Ok(Some(grid));
    }

    Ok(config.preset.map(|preset| {
        info!(?preset, seed = config.seed, size = config.size, "generating preset");
        generate_seeded(config.size, preset.params(), config.seed)
    }))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}
