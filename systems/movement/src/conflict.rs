//! First-claim-wins arbitration of simultaneous moves.

use outbreak_core::{AgentClass, AppliedMove, Cell, CellCoord, Grid, MoveIntent};

/// Applies `intents` to `working` in the order given, one claim per target.
///
/// Intents must have been planned against the board as it stood before any of
/// them were applied. The first intent naming a target claims it; later
/// intents for the same target are dropped and their agents stay put for the
/// phase. A successful move empties the source cell and places an agent of
/// `class` on the target, removing any human a zombie lands on.
pub fn resolve_moves(
    working: &mut Grid,
    class: AgentClass,
    intents: &[MoveIntent],
) -> Vec<AppliedMove> {
    let mut claims = ClaimLedger::new(working.size());
    let mut applied = Vec::with_capacity(intents.len());

    for intent in intents {
        if claims.is_claimed(intent.to) {
            continue;
        }

        let target = working.cell(intent.to);
        if !class.may_enter(target) {
            continue;
        }

        working.set(intent.from, Cell::Empty);
        working.set(intent.to, class.cell());
        claims.claim(intent.to);
        applied.push(AppliedMove {
            class,
            from: intent.from,
            to: intent.to,
            caught: class == AgentClass::Zombie && target == Cell::Human,
        });
    }

    applied
}

/// Dense record of the targets claimed during one phase.
#[derive(Debug)]
struct ClaimLedger {
    size: u32,
    claimed: Vec<bool>,
}

impl ClaimLedger {
    fn new(size: u32) -> Self {
        let edge = usize::try_from(size).unwrap_or(0);
        Self {
            size,
            claimed: vec![false; edge * edge],
        }
    }

    fn is_claimed(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.claimed.get(index).copied())
            .unwrap_or(false)
    }

    fn claim(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.claimed.get_mut(index) {
                *slot = true;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.row() >= self.size || cell.column() >= self.size {
            return None;
        }
        let width = usize::try_from(self.size).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        Some(row * width + column)
    }
}
