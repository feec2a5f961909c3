#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Outbreak adapters.

use std::{fmt::Write as _, time::Duration};

use anyhow::Result as AnyResult;
use outbreak_core::{
    Cell, CellCoord, Event, Grid, PlacementCounts, PlayMode, MAX_PLACEMENT,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Byte RGB channels, ignoring alpha.
    #[must_use]
    pub fn to_rgb_u8(self) -> [u8; 3] {
        [to_byte(self.red), to_byte(self.green), to_byte(self.blue)]
    }
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Fill color used for each cell state.
#[must_use]
pub const fn cell_color(cell: Cell) -> Color {
    match cell {
        Cell::Human => Color::from_rgb_u8(0x25, 0x63, 0xeb),
        Cell::Zombie => Color::from_rgb_u8(0xef, 0x44, 0x44),
        Cell::Safe => Color::from_rgb_u8(0x16, 0xa3, 0x4a),
        Cell::Barricade => Color::from_rgb_u8(0x6b, 0x72, 0x80),
        Cell::Empty => Color::from_rgb_u8(0xf8, 0xfa, 0xfc),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Play mode requested on this frame.
    pub play_mode: Option<PlayMode>,
    /// Whether a single turn was requested on this frame.
    pub step_turn: bool,
    /// Whether a reset was requested on this frame.
    pub reset: bool,
    /// Brush selected on this frame.
    pub brush: Option<Cell>,
    /// Cell painted with the active brush on this frame.
    pub paint: Option<CellCoord>,
    /// Cell erased on this frame.
    pub erase: Option<CellCoord>,
    /// Cell whose placement preview should be reported on this frame.
    pub inspect: Option<CellCoord>,
    /// Whether the user asked to end the session.
    pub quit: bool,
}

/// Visual description of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPresentation {
    /// Location of the cell.
    pub cell: CellCoord,
    /// Occupancy state drawn in the cell.
    pub state: Cell,
    /// Fill color.
    pub color: Color,
}

impl CellPresentation {
    /// Builds the presentation of `state` drawn at `cell`.
    #[must_use]
    pub const fn new(cell: CellCoord, state: Cell) -> Self {
        Self {
            cell,
            state,
            color: cell_color(state),
        }
    }

    /// Character drawn by text backends.
    #[must_use]
    pub const fn label(&self) -> char {
        self.state.label()
    }
}

/// Row-major presentation of every grid cell.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPresentation {
    size: u32,
    cells: Vec<CellPresentation>,
}

impl GridPresentation {
    /// Captures the current contents of `grid`.
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            size: grid.size(),
            cells: grid
                .iter()
                .map(|(cell, state)| CellPresentation::new(cell, state))
                .collect(),
        }
    }

    /// Number of rows and columns.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellPresentation] {
        &self.cells
    }

    /// Iterates over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[CellPresentation]> + '_ {
        self.cells.chunks(self.size.max(1) as usize)
    }
}

/// Status line shown alongside the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Turns completed since the grid was last replaced.
    pub turn: u64,
    /// Placed humans, zombies and safe zones.
    pub counts: PlacementCounts,
    /// Active play mode.
    pub play_mode: PlayMode,
    /// Brush used for painting.
    pub brush: Cell,
    /// Outcome of the last interaction worth reporting.
    pub feedback: Option<String>,
}

impl Hud {
    /// Creates a HUD for a fresh session.
    #[must_use]
    pub fn new(turn: u64, counts: PlacementCounts, play_mode: PlayMode) -> Self {
        Self {
            turn,
            counts,
            play_mode,
            brush: Cell::Human,
            feedback: None,
        }
    }

    /// Single-line summary of the HUD.
    #[must_use]
    pub fn status_line(&self) -> String {
        let mode = match self.play_mode {
            PlayMode::Setup => "setup",
            PlayMode::Running => "running",
        };
        format!(
            "turn {} | {mode} | humans {}/{MAX_PLACEMENT} | zombies {}/{MAX_PLACEMENT} | safe {}/{MAX_PLACEMENT} | brush {}",
            self.turn,
            self.counts.humans,
            self.counts.zombies,
            self.counts.safes,
            self.brush.label(),
        )
    }
}

/// Describes an event as a feedback line, when it is worth surfacing.
#[must_use]
pub fn describe_event(event: &Event) -> Option<String> {
    match event {
        Event::PlacementRejected { reason, .. } => Some(format!("placement rejected: {reason}")),
        Event::StartRejected { reason } => Some(format!("cannot start: {reason}")),
        Event::HumanCaught { cell } => Some(format!(
            "a human was caught at ({}, {})",
            cell.row(),
            cell.column()
        )),
        Event::PlayModeChanged { mode: PlayMode::Running } => Some("simulation running".to_owned()),
        Event::PlayModeChanged { mode: PlayMode::Setup } => Some("simulation paused".to_owned()),
        Event::GridConfigured { size } => Some(format!("new {size}x{size} grid")),
        Event::GridLoaded { size } => Some(format!("loaded {size}x{size} grid")),
        Event::CellChanged { .. } | Event::AgentMoved { .. } | Event::TurnAdvanced { .. } => None,
    }
}

/// Scene description combining the grid and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Cells of the live grid.
    pub grid: GridPresentation,
    /// Status information drawn next to the grid.
    pub hud: Hud,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub const fn new(grid: GridPresentation, hud: Hud) -> Self {
        Self { grid, hud }
    }

    /// Refreshes the grid cells and counts from `grid`.
    pub fn refresh_grid(&mut self, grid: &Grid) {
        self.grid = GridPresentation::from_grid(grid);
        self.hud.counts = grid.placement_counts();
    }

    /// Records the most recent describable event from `events` as feedback.
    pub fn absorb_events(&mut self, events: &[Event]) {
        if let Some(line) = events.iter().rev().find_map(describe_event) {
            self.hud.feedback = Some(line);
        }
    }

    /// Text frame: the status line, one line of labels per row, and the
    /// feedback line when present.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut frame = self.hud.status_line();
        frame.push('\n');
        for row in self.grid.rows() {
            let mut line = String::with_capacity(row.len() * 2);
            for (index, cell) in row.iter().enumerate() {
                if index > 0 {
                    line.push(' ');
                }
                line.push(cell.label());
            }
            frame.push_str(&line);
            frame.push('\n');
        }
        self.push_feedback(&mut frame);
        frame
    }

    /// Text frame for 24-bit colour terminals: each cell is its label on a
    /// background of the cell colour.
    #[must_use]
    pub fn to_ansi(&self) -> String {
        let mut frame = self.hud.status_line();
        frame.push('\n');
        for row in self.grid.rows() {
            for cell in row {
                let [red, green, blue] = cell.color.to_rgb_u8();
                let _ = write!(frame, "\x1b[48;2;{red};{green};{blue}m{} ", cell.label());
            }
            frame.push_str("\x1b[0m\n");
        }
        self.push_feedback(&mut frame);
        frame
    }

    fn push_feedback(&self, frame: &mut String) {
        if let Some(feedback) = &self.hud.feedback {
            let _ = writeln!(frame, "> {feedback}");
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub window_title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Signal returned by the per-frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Keep presenting frames.
    Continue,
    /// Stop after the frame that was just updated.
    Exit,
}

/// Rendering backend capable of presenting Outbreak scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered. Returning [`FrameControl::Exit`] stops the backend once
    /// that frame has been presented.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameControl + 'static;
}
