#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure setup-mode system responsible for emitting cell placement commands.

use outbreak_core::{Cell, CellCoord, Command, Event, Grid, PlacementError, PlayMode};

/// Declarative preview describing what painting the hovered cell would do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Brush that would be applied.
    pub brush: Cell,
    /// Hovered cell.
    pub cell: CellCoord,
    /// State the cell would hold afterwards, or the reason the paint would be rejected.
    pub outcome: Result<Option<Cell>, PlacementError>,
}

impl PlacementPreview {
    /// Reports whether confirming the preview would change the grid.
    #[must_use]
    pub fn placeable(&self) -> bool {
        matches!(self.outcome, Ok(Some(_)))
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementInput {
    /// Brush the player switched to on this frame, if any.
    pub select_brush: Option<Cell>,
    /// Cell the player clicked on this frame.
    pub paint: Option<CellCoord>,
    /// Cell the player asked to erase on this frame.
    pub erase: Option<CellCoord>,
}

impl PlacementInput {
    /// Input that paints `cell` with the active brush.
    #[must_use]
    pub const fn paint(cell: CellCoord) -> Self {
        Self {
            select_brush: None,
            paint: Some(cell),
            erase: None,
        }
    }
}

/// Setup-mode system that translates brush + input into placement commands.
#[derive(Debug, Clone)]
pub struct Placement {
    brush: Cell,
    play_mode: PlayMode,
}

impl Default for Placement {
    fn default() -> Self {
        Self::new()
    }
}

impl Placement {
    /// Creates a placement system holding the human brush.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            brush: Cell::Human,
            play_mode: PlayMode::Setup,
        }
    }

    /// Brush applied by the next paint action.
    #[must_use]
    pub const fn brush(&self) -> Cell {
        self.brush
    }

    /// Switches the active brush.
    pub fn set_brush(&mut self, brush: Cell) {
        self.brush = brush;
    }

    /// Previews painting `cell` on `grid` with the active brush.
    #[must_use]
    pub fn preview(&self, grid: &Grid, cell: CellCoord) -> PlacementPreview {
        let outcome = if self.play_mode == PlayMode::Running {
            Err(PlacementError::SimulationRunning)
        } else {
            grid.paint_outcome(self.brush, cell)
        };
        PlacementPreview {
            brush: self.brush,
            cell,
            outcome,
        }
    }

    /// Consumes world events and adapter-derived input to emit placement commands.
    pub fn handle(&mut self, events: &[Event], input: PlacementInput, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::PlayModeChanged { mode } => self.play_mode = *mode,
                Event::GridConfigured { .. } | Event::GridLoaded { .. } => {
                    self.play_mode = PlayMode::Setup;
                }
                _ => {}
            }
        }

        if let Some(brush) = input.select_brush {
            self.brush = brush;
        }

        if self.play_mode != PlayMode::Setup {
            return;
        }

        if let Some(cell) = input.paint {
            out.push(Command::Place {
                brush: self.brush,
                cell,
            });
        }

        if let Some(cell) = input.erase {
            out.push(Command::Place {
                brush: Cell::Empty,
                cell,
            });
        }
    }
}
