#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for the Outbreak simulator.
//!
//! The world owns the live grid, the turn counter and the play mode. All
//! mutations arrive as [`Command`] values through [`apply`], which reports the
//! resulting changes as [`Event`] values. Turns are delegated to the pure
//! movement engine, which receives a snapshot and hands back the next grid.

use outbreak_core::{
    Cell, CellCoord, Command, Event, Grid, PlacementError, PlayMode, StartError,
    DEFAULT_GRID_SIZE,
};
use outbreak_system_movement::advance_turn;
use tracing::{debug, trace};

/// Represents the authoritative Outbreak session state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    turn: u64,
    play_mode: PlayMode,
}

impl World {
    /// Creates a new session with an empty default-sized grid.
    #[must_use]
    pub fn new() -> Self {
        Self::with_size(DEFAULT_GRID_SIZE)
    }

    /// Creates a new session with an empty `size`×`size` grid.
    #[must_use]
    pub fn with_size(size: u32) -> Self {
        Self {
            grid: Grid::new(size.max(1)),
            turn: 0,
            play_mode: PlayMode::Setup,
        }
    }

    fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.turn = 0;
        self.play_mode = PlayMode::Setup;
    }

    fn place(&mut self, brush: Cell, cell: CellCoord) -> Result<Option<Event>, PlacementError> {
        if self.play_mode == PlayMode::Running {
            return Err(PlacementError::SimulationRunning);
        }

        let current = self.grid.get(cell).ok_or(PlacementError::OutOfBounds)?;
        let Some(next) = self.grid.paint_outcome(brush, cell)? else {
            return Ok(None);
        };

        self.grid.set(cell, next);
        Ok(Some(Event::CellChanged {
            cell,
            from: current,
            to: next,
        }))
    }

    fn check_start(&self) -> Result<(), StartError> {
        let counts = self.grid.placement_counts();
        if counts.humans == 0 {
            return Err(StartError::NoHumans);
        }
        if counts.zombies == 0 {
            return Err(StartError::NoZombies);
        }
        if counts.safes == 0 {
            return Err(StartError::NoSafeZones);
        }
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { size } => {
            let size = size.max(1);
            world.replace_grid(Grid::new(size));
            out_events.push(Event::GridConfigured { size });
        }
        Command::Place { brush, cell } => match world.place(brush, cell) {
            Ok(Some(event)) => out_events.push(event),
            Ok(None) => {}
            Err(reason) => {
                debug!(?brush, ?cell, %reason, "placement rejected");
                out_events.push(Event::PlacementRejected {
                    cell,
                    brush,
                    reason,
                });
            }
        },
        Command::LoadGrid { grid } => {
            let size = grid.size();
            world.replace_grid(grid);
            out_events.push(Event::GridLoaded { size });
        }
        Command::SetPlayMode { mode } => {
            if world.play_mode == mode {
                return;
            }
            if mode == PlayMode::Running {
                if let Err(reason) = world.check_start() {
                    debug!(%reason, "simulation start rejected");
                    out_events.push(Event::StartRejected { reason });
                    return;
                }
            }
            world.play_mode = mode;
            out_events.push(Event::PlayModeChanged { mode });
        }
        Command::AdvanceTurn => {
            let outcome = advance_turn(&world.grid);
            world.turn = world.turn.saturating_add(1);
            trace!(
                turn = world.turn,
                moves = outcome.moves.len(),
                human_phase_ran = outcome.human_phase_ran,
                zombie_phase_ran = outcome.zombie_phase_ran,
                "turn advanced"
            );

            for applied in &outcome.moves {
                out_events.push(Event::AgentMoved {
                    class: applied.class,
                    from: applied.from,
                    to: applied.to,
                });
                if applied.caught {
                    out_events.push(Event::HumanCaught { cell: applied.to });
                }
            }
            out_events.push(Event::TurnAdvanced {
                turn: world.turn,
                human_phase_ran: outcome.human_phase_ran,
                zombie_phase_ran: outcome.zombie_phase_ran,
            });
            world.grid = outcome.grid;
        }
        Command::Reset => {
            let size = world.grid.size();
            world.replace_grid(Grid::new(size));
            out_events.push(Event::GridConfigured { size });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use outbreak_core::{Grid, PlacementCounts, PlayMode};

    use super::World;

    /// Provides read-only access to the live grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Independent copy of the live grid.
    #[must_use]
    pub fn grid_snapshot(world: &World) -> Grid {
        world.grid.snapshot()
    }

    /// Edge length of the live grid.
    #[must_use]
    pub fn size(world: &World) -> u32 {
        world.grid.size()
    }

    /// Number of turns completed since the grid was last replaced.
    #[must_use]
    pub fn turn(world: &World) -> u64 {
        world.turn
    }

    /// Currently active play mode.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.play_mode
    }

    /// Number of humans, zombies and safe zones on the grid.
    #[must_use]
    pub fn placement_counts(world: &World) -> PlacementCounts {
        world.grid.placement_counts()
    }
}
