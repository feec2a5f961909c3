#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Multi-source breadth-first distance fields over the outbreak grid.

use std::collections::VecDeque;

use outbreak_core::{Cell, CellCoord, Direction, Grid};

/// Sentinel stored for cells that no source can reach.
pub const UNREACHABLE: u32 = u32::MAX;

/// Computes the shortest barricade-aware distance from the nearest source to
/// every cell of `grid`.
///
/// Only [`Cell::Barricade`] blocks traversal; cells held by agents or safe
/// zones are open terrain. Sources are seeded at distance zero in the order
/// given without consulting their own cell state, so a source placed on a
/// barricade still reads zero.
///
/// # Panics
///
/// Panics when a source lies outside the grid.
#[must_use]
pub fn compute_distance_field(grid: &Grid, sources: &[CellCoord]) -> DistanceField {
    let mut field = DistanceField::default();
    field.rebuild_with(grid.size(), sources, |cell| {
        grid.cell(cell) == Cell::Barricade
    });
    field
}

/// Dense distance grid seeded from a set of source cells.
///
/// Distances default to [`UNREACHABLE`] so callers can distinguish cells cut
/// off by barricades from traversable ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistanceField {
    size: u32,
    distances: Vec<u32>,
}

impl DistanceField {
    /// Rebuilds the distances using a multi-source breadth-first search.
    ///
    /// # Panics
    ///
    /// Panics when a source lies outside the `size`×`size` field.
    pub fn rebuild_with<F>(&mut self, size: u32, sources: &[CellCoord], mut is_blocked: F)
    where
        F: FnMut(CellCoord) -> bool,
    {
        let size_usize = usize::try_from(size).unwrap_or(0);
        let cell_count = size_usize.checked_mul(size_usize).unwrap_or(0);

        self.size = size;
        if self.distances.len() != cell_count {
            self.distances = vec![UNREACHABLE; cell_count];
        } else {
            self.distances.fill(UNREACHABLE);
        }

        if cell_count == 0 {
            return;
        }

        let mut queue = VecDeque::with_capacity(cell_count);

        for &source in sources {
            let Some(index) = index(size, source) else {
                panic!(
                    "distance source ({}, {}) lies outside the {size}x{size} grid",
                    source.row(),
                    source.column(),
                );
            };

            if self.distances[index] == 0 {
                continue;
            }

            self.distances[index] = 0;
            queue.push_back(source);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = index(size, cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for direction in Direction::ALL {
                let Some(neighbor) = cell.step(direction, size) else {
                    continue;
                };

                if is_blocked(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = index(size, neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] != UNREACHABLE {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Edge length of the field in cells.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Dense distances stored in row-major order, [`UNREACHABLE`] included.
    #[must_use]
    pub fn cells(&self) -> &[u32] {
        &self.distances
    }

    /// Raw entry for the provided cell, [`UNREACHABLE`] when cut off.
    ///
    /// # Panics
    ///
    /// Panics when `cell` lies outside the field.
    #[must_use]
    pub fn raw(&self, cell: CellCoord) -> u32 {
        let Some(offset) = index(self.size, cell) else {
            panic!(
                "cell ({}, {}) lies outside the {size}x{size} distance field",
                cell.row(),
                cell.column(),
                size = self.size,
            );
        };
        self.distances[offset]
    }

    /// Distance captured for the provided cell, `None` when no source reaches
    /// it or the cell lies outside the field.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        let offset = index(self.size, cell)?;
        self.distances
            .get(offset)
            .copied()
            .filter(|distance| *distance != UNREACHABLE)
    }

    /// Reports whether any source reaches the provided cell.
    #[must_use]
    pub fn is_reachable(&self, cell: CellCoord) -> bool {
        self.distance(cell).is_some()
    }
}

fn index(size: u32, cell: CellCoord) -> Option<usize> {
    if cell.row() >= size || cell.column() >= size {
        return None;
    }
    let width = usize::try_from(size).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    let column = usize::try_from(cell.column()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
