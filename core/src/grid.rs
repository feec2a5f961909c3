//! Square occupancy grid shared by the engine and its drivers.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Cell, CellCoord, PlacementError, MAX_PLACEMENT};

/// Fixed-size square array of cell states stored in row-major order.
///
/// The grid never represents out-of-bounds coordinates. Reading or writing a
/// coordinate outside the grid is a caller contract violation and panics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GridRepr")]
pub struct Grid {
    size: u32,
    cells: Vec<Cell>,
}

/// Unvalidated wire form of [`Grid`].
#[derive(Deserialize)]
struct GridRepr {
    size: u32,
    cells: Vec<Cell>,
}

impl TryFrom<GridRepr> for Grid {
    type Error = GridError;

    fn try_from(repr: GridRepr) -> Result<Self, Self::Error> {
        if repr.size == 0 {
            return Err(GridError::Empty);
        }
        let edge = to_usize(repr.size);
        let expected = edge.checked_mul(edge).ok_or(GridError::TooLarge { size: edge })?;
        if repr.cells.len() != expected {
            return Err(GridError::CellCount {
                size: repr.size,
                expected,
                found: repr.cells.len(),
            });
        }
        Ok(Self {
            size: repr.size,
            cells: repr.cells,
        })
    }
}

impl Grid {
    /// Creates an all-empty `size`×`size` grid.
    ///
    /// # Panics
    ///
    /// Panics when `size` is zero.
    #[must_use]
    pub fn new(size: u32) -> Self {
        assert!(size > 0, "grid size must be at least 1");
        let edge = to_usize(size);
        Self {
            size,
            cells: vec![Cell::Empty; edge * edge],
        }
    }

    /// Builds a grid from explicit rows, validating that they form a square.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let expected = rows.len();
        if expected == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(expected * expected);
        for (index, row) in rows.into_iter().enumerate() {
            if index > 0 && row.len() != expected {
                return Err(GridError::Ragged {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
            if row.len() != expected {
                return Err(GridError::NotSquare {
                    rows: expected,
                    columns: row.len(),
                });
            }
            cells.extend(row);
        }

        let size = u32::try_from(expected).map_err(|_| GridError::TooLarge { size: expected })?;
        Ok(Self { size, cells })
    }

    /// Parses a text layout made of one line of cell labels per row.
    ///
    /// Leading and trailing whitespace on each line is ignored, as are blank
    /// lines, so layouts may be indented inside raw string literals.
    pub fn parse(layout: &str) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        for (row, line) in layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
        {
            let cells = line
                .chars()
                .enumerate()
                .map(|(column, symbol)| {
                    Cell::from_label(symbol).ok_or(GridError::UnknownSymbol {
                        symbol,
                        row,
                        column,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }

        Self::from_rows(rows)
    }

    /// Number of rows (and columns) of the grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: CellCoord) -> bool {
        coord.row() < self.size && coord.column() < self.size
    }

    /// State of the provided cell.
    ///
    /// # Panics
    ///
    /// Panics when `coord` lies outside the grid.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Cell {
        self.cells[self.index(coord)]
    }

    /// State of the provided cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn get(&self, coord: CellCoord) -> Option<Cell> {
        if self.contains(coord) {
            Some(self.cell(coord))
        } else {
            None
        }
    }

    /// Overwrites the state of the provided cell.
    ///
    /// # Panics
    ///
    /// Panics when `coord` lies outside the grid.
    pub fn set(&mut self, coord: CellCoord, cell: Cell) {
        let index = self.index(coord);
        self.cells[index] = cell;
    }

    /// Independent copy of the grid; mutating it never affects `self`.
    #[must_use]
    pub fn snapshot(&self) -> Grid {
        self.clone()
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let index = index as u64;
            let size = u64::from(size);
            let coord = CellCoord::new((index / size) as u32, (index % size) as u32);
            (coord, *cell)
        })
    }

    /// Cells currently holding `cell`, in row-major scan order.
    #[must_use]
    pub fn positions_of(&self, cell: Cell) -> Vec<CellCoord> {
        self.iter()
            .filter(|(_, state)| *state == cell)
            .map(|(coord, _)| coord)
            .collect()
    }

    /// Number of cells currently holding `cell`.
    #[must_use]
    pub fn count(&self, cell: Cell) -> u32 {
        self.cells.iter().filter(|state| **state == cell).count() as u32
    }

    /// Counts of every type limited by placement rules.
    #[must_use]
    pub fn placement_counts(&self) -> PlacementCounts {
        let mut counts = PlacementCounts::default();
        for cell in &self.cells {
            match cell {
                Cell::Human => counts.humans += 1,
                Cell::Zombie => counts.zombies += 1,
                Cell::Safe => counts.safes += 1,
                Cell::Empty | Cell::Barricade => {}
            }
        }
        counts
    }

    /// State `coord` would hold after painting it with `brush`.
    ///
    /// Painting a cell with the state it already holds clears it. Returns
    /// `Ok(None)` when the paint would leave the cell unchanged, and an error
    /// when the cell lies outside the grid or a counted type is at its limit.
    pub fn paint_outcome(&self, brush: Cell, coord: CellCoord) -> Result<Option<Cell>, PlacementError> {
        let current = self.get(coord).ok_or(PlacementError::OutOfBounds)?;
        let next = if current == brush { Cell::Empty } else { brush };
        if next == current {
            return Ok(None);
        }
        if next.is_counted() && self.placement_counts().of(next) >= MAX_PLACEMENT {
            return Err(PlacementError::LimitReached {
                brush: next,
                limit: MAX_PLACEMENT,
            });
        }
        Ok(Some(next))
    }

    /// Rows of the grid as label strings, top to bottom.
    #[must_use]
    pub fn to_label_rows(&self) -> Vec<String> {
        self.cells
            .chunks(to_usize(self.size))
            .map(|row| row.iter().map(|cell| cell.label()).collect())
            .collect()
    }

    fn index(&self, coord: CellCoord) -> usize {
        assert!(
            self.contains(coord),
            "cell ({}, {}) lies outside the {size}x{size} grid",
            coord.row(),
            coord.column(),
            size = self.size,
        );
        to_usize(coord.row()) * to_usize(self.size) + to_usize(coord.column())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_label_rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Number of placed cells per counted type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementCounts {
    /// Cells holding a human.
    pub humans: u32,
    /// Cells holding a zombie.
    pub zombies: u32,
    /// Cells holding a safe zone.
    pub safes: u32,
}

impl PlacementCounts {
    /// Count recorded for the provided cell type; uncounted types report zero.
    #[must_use]
    pub const fn of(&self, cell: Cell) -> u32 {
        match cell {
            Cell::Human => self.humans,
            Cell::Zombie => self.zombies,
            Cell::Safe => self.safes,
            Cell::Empty | Cell::Barricade => 0,
        }
    }
}

/// Errors raised when building a grid from external data.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The layout contained no rows.
    #[error("grid layout is empty")]
    Empty,
    /// A row's length differs from the first row's.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Expected number of cells.
        expected: usize,
        /// Number of cells found.
        found: usize,
    },
    /// The rows are consistent but do not form a square.
    #[error("grid has {rows} rows but {columns} columns")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        columns: usize,
    },
    /// The layout is too large to address with 32-bit coordinates.
    #[error("grid size {size} exceeds the addressable range")]
    TooLarge {
        /// Requested edge length.
        size: usize,
    },
    /// Serialised cells do not fill a `size`×`size` grid.
    #[error("a {size}x{size} grid needs {expected} cells, found {found}")]
    CellCount {
        /// Declared edge length.
        size: u32,
        /// Number of cells the edge length requires.
        expected: usize,
        /// Number of cells supplied.
        found: usize,
    },
    /// A text layout contained a character that is not a cell label.
    #[error("unknown cell symbol '{symbol}' at row {row}, column {column}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Zero-based row of the character.
        row: usize,
        /// Zero-based column of the character.
        column: usize,
    },
}

fn to_usize(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
