#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic turn engine that moves humans toward shelter and zombies
//! toward humans.
//!
//! A turn runs two phases. Each phase builds a distance field, plans one move
//! per agent against the board as it stood when the phase began, and then
//! applies the surviving moves to a working copy in row-major order. The
//! caller's grid is never touched; the next grid is returned by value.

mod conflict;
mod planner;

use outbreak_core::{AgentClass, AppliedMove, Cell, Grid};
use outbreak_system_navigation::compute_distance_field;
use tracing::trace;

pub use conflict::resolve_moves;
pub use planner::{plan_human, plan_moves, plan_zombie};

/// Stages a turn passes through, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// No turn in progress.
    Idle,
    /// Building the distance field seeded from safe zones.
    ComputingSafeField,
    /// Choosing one move per human.
    PlanningHumans,
    /// Writing the surviving human moves to the working grid.
    ApplyingHumanMoves,
    /// Building the distance field seeded from humans.
    ComputingHumanField,
    /// Choosing one move per zombie.
    PlanningZombies,
    /// Writing the surviving zombie moves to the working grid.
    ApplyingZombieMoves,
}

impl TurnPhase {
    /// Phase that follows `self`; the last phase returns to [`TurnPhase::Idle`].
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Idle => Self::ComputingSafeField,
            Self::ComputingSafeField => Self::PlanningHumans,
            Self::PlanningHumans => Self::ApplyingHumanMoves,
            Self::ApplyingHumanMoves => Self::ComputingHumanField,
            Self::ComputingHumanField => Self::PlanningZombies,
            Self::PlanningZombies => Self::ApplyingZombieMoves,
            Self::ApplyingZombieMoves => Self::Idle,
        }
    }
}

/// Result of a single call to [`advance_turn`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Grid after both phases.
    pub grid: Grid,
    /// Whether any human and any safe zone existed, so humans were planned.
    pub human_phase_ran: bool,
    /// Whether any human and any zombie existed after the human phase.
    pub zombie_phase_ran: bool,
    /// Moves that were applied, humans first, each phase in row-major order.
    pub moves: Vec<AppliedMove>,
}

impl TurnOutcome {
    /// Reports whether any agent moved during the turn.
    #[must_use]
    pub fn any_moved(&self) -> bool {
        !self.moves.is_empty()
    }
}

/// Runs one full turn over `grid` and returns the next grid.
///
/// The human phase is skipped when there is no safe zone or no human, and the
/// zombie phase is skipped when there is no human or no zombie left once
/// humans have moved. A grid on which nothing can move comes back unchanged.
#[must_use]
pub fn advance_turn(grid: &Grid) -> TurnOutcome {
    let mut turn = Turn::begin(grid);
    let human_phase_ran = turn.run_human_phase();
    let zombie_phase_ran = turn.run_zombie_phase();
    turn.enter(TurnPhase::Idle);

    TurnOutcome {
        grid: turn.working,
        human_phase_ran,
        zombie_phase_ran,
        moves: turn.moves,
    }
}

#[derive(Debug)]
struct Turn {
    working: Grid,
    phase: TurnPhase,
    moves: Vec<AppliedMove>,
}

impl Turn {
    fn begin(grid: &Grid) -> Self {
        Self {
            working: grid.snapshot(),
            phase: TurnPhase::Idle,
            moves: Vec::new(),
        }
    }

    fn enter(&mut self, phase: TurnPhase) {
        trace!(from = ?self.phase, to = ?phase, "turn phase");
        self.phase = phase;
    }

    fn run_human_phase(&mut self) -> bool {
        self.enter(TurnPhase::ComputingSafeField);
        let safes = self.working.positions_of(Cell::Safe);
        if safes.is_empty() || self.working.count(Cell::Human) == 0 {
            trace!("human phase skipped");
            return false;
        }
        let to_safety = compute_distance_field(&self.working, &safes);

        self.enter(TurnPhase::PlanningHumans);
        let intents = plan_moves(&self.working, &to_safety, AgentClass::Human);

        self.enter(TurnPhase::ApplyingHumanMoves);
        let applied = resolve_moves(&mut self.working, AgentClass::Human, &intents);
        trace!(
            planned = intents.len(),
            applied = applied.len(),
            "human moves applied"
        );
        self.moves.extend(applied);
        true
    }

    fn run_zombie_phase(&mut self) -> bool {
        self.enter(TurnPhase::ComputingHumanField);
        let humans = self.working.positions_of(Cell::Human);
        if humans.is_empty() || self.working.count(Cell::Zombie) == 0 {
            trace!("zombie phase skipped");
            return false;
        }
        let to_humans = compute_distance_field(&self.working, &humans);

        self.enter(TurnPhase::PlanningZombies);
        let intents = plan_moves(&self.working, &to_humans, AgentClass::Zombie);

        self.enter(TurnPhase::ApplyingZombieMoves);
        let applied = resolve_moves(&mut self.working, AgentClass::Zombie, &intents);
        trace!(
            planned = intents.len(),
            applied = applied.len(),
            "zombie moves applied"
        );
        self.moves.extend(applied);
        true
    }
}
