//! Greedy per-agent move selection over a distance field.

use outbreak_core::{AgentClass, Cell, CellCoord, Direction, Grid, MoveIntent};
use outbreak_system_navigation::DistanceField;

/// Chooses the move of the human standing on `from`.
///
/// `to_safety` must hold distances to the nearest safe zone. Asking for the
/// move of a safe cell yields nothing. A human that walks onto a safe zone
/// replaces it, so on later turns it plans like any other human and heads
/// for the next remaining safe zone. A human never steps onto a zombie,
/// another human or a barricade, and only moves when a neighbour is strictly
/// closer to safety than its own cell.
#[must_use]
pub fn plan_human(grid: &Grid, to_safety: &DistanceField, from: CellCoord) -> Option<MoveIntent> {
    if grid.cell(from) == Cell::Safe {
        return None;
    }

    plan_gradient_step(grid, to_safety, from, AgentClass::Human)
}

/// Chooses the move of the zombie standing on `from`.
///
/// `to_humans` must hold distances to the nearest human. Only barricades are
/// ruled out here; a target still held by a zombie is settled when moves are
/// resolved against the working grid.
#[must_use]
pub fn plan_zombie(grid: &Grid, to_humans: &DistanceField, from: CellCoord) -> Option<MoveIntent> {
    plan_gradient_step(grid, to_humans, from, AgentClass::Zombie)
}

/// Plans every agent of `class` against the same board, in row-major order.
#[must_use]
pub fn plan_moves(grid: &Grid, field: &DistanceField, class: AgentClass) -> Vec<MoveIntent> {
    grid.positions_of(class.cell())
        .into_iter()
        .filter_map(|from| match class {
            AgentClass::Human => plan_human(grid, field, from),
            AgentClass::Zombie => plan_zombie(grid, field, from),
        })
        .collect()
}

fn plan_gradient_step(
    grid: &Grid,
    field: &DistanceField,
    from: CellCoord,
    class: AgentClass,
) -> Option<MoveIntent> {
    let current_distance = field.raw(from);
    let mut best: Option<Candidate> = None;

    for direction in Direction::ALL {
        let Some(neighbor) = from.step(direction, grid.size()) else {
            continue;
        };
        if !class.may_target(grid.cell(neighbor)) {
            continue;
        }

        // Unreachable neighbours are never an improvement.
        let Some(distance) = field.distance(neighbor) else {
            continue;
        };
        if distance >= current_distance {
            continue;
        }

        let candidate = Candidate {
            cell: neighbor,
            distance,
        };
        best = Some(match best {
            None => candidate,
            Some(existing) => {
                if candidate.is_better_than(existing) {
                    candidate
                } else {
                    existing
                }
            }
        });
    }

    best.map(|candidate| MoveIntent::new(from, candidate.cell))
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    cell: CellCoord,
    distance: u32,
}

impl Candidate {
    // Equal distances keep the earlier direction.
    fn is_better_than(self, other: Candidate) -> bool {
        self.distance < other.distance
    }
}
