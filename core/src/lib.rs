#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Outbreak simulator.
//!
//! This crate defines the spatial model and the message surface that connects
//! adapters, the authoritative session world, and the pure simulation systems.
//! Adapters submit [`Command`] values describing desired mutations, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values describing what changed. The simulation engine itself only
//! ever sees a [`Grid`] snapshot and hands back the next one.

mod grid;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use grid::{Grid, GridError, PlacementCounts};

/// Maximum number of cells of each counted type (humans, zombies, safe zones).
pub const MAX_PLACEMENT: u32 = 5;

/// Grid edge length used when a session starts without explicit configuration.
pub const DEFAULT_GRID_SIZE: u32 = 20;

/// Smallest grid edge length offered by interactive drivers.
pub const MIN_GRID_SIZE: u32 = 6;

/// Largest grid edge length offered by interactive drivers.
pub const MAX_GRID_SIZE: u32 = 60;

/// Occupancy state of a single grid cell.
///
/// Every cell holds exactly one state; agents never stack with safe zones or
/// barricades.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Unoccupied open ground.
    #[default]
    Empty,
    /// A living human heading for shelter.
    Human,
    /// A zombie hunting the nearest human.
    Zombie,
    /// A safe zone humans try to reach.
    Safe,
    /// Impassable obstacle.
    Barricade,
}

impl Cell {
    /// All cell states in declaration order.
    pub const ALL: [Cell; 5] = [
        Cell::Empty,
        Cell::Human,
        Cell::Zombie,
        Cell::Safe,
        Cell::Barricade,
    ];

    /// Single-character label used by text layouts and terminal frames.
    #[must_use]
    pub const fn label(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Human => 'H',
            Self::Zombie => 'Z',
            Self::Safe => 'S',
            Self::Barricade => '#',
        }
    }

    /// Parses a label produced by [`Cell::label`].
    #[must_use]
    pub const fn from_label(label: char) -> Option<Self> {
        match label {
            '.' => Some(Self::Empty),
            'H' => Some(Self::Human),
            'Z' => Some(Self::Zombie),
            'S' => Some(Self::Safe),
            '#' => Some(Self::Barricade),
            _ => None,
        }
    }

    /// Reports whether distance fields may traverse the cell.
    ///
    /// Only barricades block traversal; occupancy by an agent does not.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Barricade)
    }

    /// Reports whether the cell counts against [`MAX_PLACEMENT`].
    #[must_use]
    pub const fn is_counted(self) -> bool {
        matches!(self, Self::Human | Self::Zombie | Self::Safe)
    }
}

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.row().abs_diff(other.row()) + self.column().abs_diff(other.column())
    }

    /// Neighbouring cell one step in `direction`, if it lies inside an
    /// `size`×`size` grid.
    #[must_use]
    pub fn step(self, direction: Direction, size: u32) -> Option<CellCoord> {
        let (row, column) = match direction {
            Direction::North => (self.row.checked_sub(1)?, self.column),
            Direction::South => (self.row.checked_add(1)?, self.column),
            Direction::West => (self.row, self.column.checked_sub(1)?),
            Direction::East => (self.row, self.column.checked_add(1)?),
        };

        if row < size && column < size {
            Some(CellCoord::new(row, column))
        } else {
            None
        }
    }
}

/// Cardinal movement directions available to agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices (up).
    North,
    /// Movement toward increasing row indices (down).
    South,
    /// Movement toward decreasing column indices (left).
    West,
    /// Movement toward increasing column indices (right).
    East,
}

impl Direction {
    /// Fixed evaluation order: up, down, left, right.
    ///
    /// Breadth-first expansion and move selection both iterate in this order,
    /// and ties between equally good neighbours go to the earliest entry.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];
}

/// The two classes of moving agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentClass {
    /// Humans walk toward the nearest safe zone.
    Human,
    /// Zombies walk toward the nearest human.
    Zombie,
}

impl AgentClass {
    /// Cell state that represents an agent of this class.
    #[must_use]
    pub const fn cell(self) -> Cell {
        match self {
            Self::Human => Cell::Human,
            Self::Zombie => Cell::Zombie,
        }
    }

    /// Reports whether an agent of this class may end its move on `target`.
    ///
    /// Humans may enter empty ground or a safe zone. Zombies may additionally
    /// enter a cell held by a human, which catches that human.
    #[must_use]
    pub const fn may_enter(self, target: Cell) -> bool {
        match self {
            Self::Human => matches!(target, Cell::Empty | Cell::Safe),
            Self::Zombie => matches!(target, Cell::Empty | Cell::Safe | Cell::Human),
        }
    }

    /// Reports whether an agent of this class may plan a move onto `target`.
    ///
    /// Humans plan only onto cells they may enter. Zombies plan onto anything
    /// but a barricade; a cell still held by another zombie is re-checked
    /// with [`AgentClass::may_enter`] once earlier moves of the phase have
    /// been applied, so a zombie can follow one that is moving away.
    #[must_use]
    pub const fn may_target(self, target: Cell) -> bool {
        match self {
            Self::Human => self.may_enter(target),
            Self::Zombie => !matches!(target, Cell::Barricade),
        }
    }
}

/// Proposed, not yet applied relocation of one agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveIntent {
    /// Cell the agent occupies at the start of the phase.
    pub from: CellCoord,
    /// Neighbouring cell the agent wants to enter.
    pub to: CellCoord,
}

impl MoveIntent {
    /// Creates a new move intent.
    #[must_use]
    pub const fn new(from: CellCoord, to: CellCoord) -> Self {
        Self { from, to }
    }
}

/// Move that survived conflict resolution and was written to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppliedMove {
    /// Class of the agent that moved.
    pub class: AgentClass,
    /// Cell the agent vacated.
    pub from: CellCoord,
    /// Cell the agent now occupies.
    pub to: CellCoord,
    /// Whether a zombie entered a cell held by a human.
    pub caught: bool,
}

/// Describes whether the session is being edited or simulated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    /// Placement is allowed and turns only advance on explicit request.
    #[default]
    Setup,
    /// The driver advances turns periodically and placement is locked.
    Running,
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Replaces the grid with an empty one of the provided edge length.
    ConfigureGrid {
        /// Number of rows and columns of the new grid.
        size: u32,
    },
    /// Paints a single cell with the provided brush, toggling it off when the
    /// cell already holds that state.
    Place {
        /// State to paint; [`Cell::Empty`] erases.
        brush: Cell,
        /// Target cell.
        cell: CellCoord,
    },
    /// Replaces the grid wholesale, e.g. with a generated preset.
    LoadGrid {
        /// Grid that becomes the session grid.
        grid: Grid,
    },
    /// Requests that the session transition to the provided play mode.
    SetPlayMode {
        /// Mode the session should activate.
        mode: PlayMode,
    },
    /// Runs one full simulation turn.
    AdvanceTurn,
    /// Clears the grid and the turn counter.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that a fresh empty grid was configured.
    GridConfigured {
        /// Edge length of the new grid.
        size: u32,
    },
    /// Confirms that a placement changed a cell.
    CellChanged {
        /// Cell that changed.
        cell: CellCoord,
        /// State before the placement.
        from: Cell,
        /// State after the placement.
        to: Cell,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Cell targeted by the request.
        cell: CellCoord,
        /// Brush used by the request.
        brush: Cell,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a grid was loaded wholesale.
    GridLoaded {
        /// Edge length of the loaded grid.
        size: u32,
    },
    /// Announces that the session entered a new play mode.
    PlayModeChanged {
        /// Mode that became active.
        mode: PlayMode,
    },
    /// Reports that the simulation could not start.
    StartRejected {
        /// Missing ingredient that prevented the start.
        reason: StartError,
    },
    /// Confirms that an agent moved during a turn.
    AgentMoved {
        /// Class of the agent that moved.
        class: AgentClass,
        /// Cell the agent vacated.
        from: CellCoord,
        /// Cell the agent entered.
        to: CellCoord,
    },
    /// Announces that a zombie caught the human standing on `cell`.
    HumanCaught {
        /// Cell where the human was caught.
        cell: CellCoord,
    },
    /// Confirms that a turn completed.
    TurnAdvanced {
        /// Turn counter after the increment.
        turn: u64,
        /// Whether the human phase ran.
        human_phase_ran: bool,
        /// Whether the zombie phase ran.
        zombie_phase_ran: bool,
    },
}

/// Reasons a placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// Placement is locked while the simulation runs.
    #[error("placement is disabled while the simulation is running")]
    SimulationRunning,
    /// The grid already holds the maximum number of cells of this type.
    #[error("at most {limit} {brush:?} cells may be placed")]
    LimitReached {
        /// Brush that hit its limit.
        brush: Cell,
        /// Limit in force.
        limit: u32,
    },
}

/// Reasons the simulation may refuse to start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum StartError {
    /// No human was placed.
    #[error("place at least one human")]
    NoHumans,
    /// No zombie was placed.
    #[error("place at least one zombie")]
    NoZombies,
    /// No safe zone was placed.
    #[error("place at least one safe zone")]
    NoSafeZones,
}
