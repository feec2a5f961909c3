use outbreak_core::{AgentClass, AppliedMove, Cell, CellCoord, Grid};
use outbreak_system_movement::advance_turn;

fn run_turns(grid: &Grid, turns: usize) -> Grid {
    let mut current = grid.snapshot();
    for _ in 0..turns {
        current = advance_turn(&current).grid;
    }
    current
}

#[test]
fn lone_human_walks_to_the_safe_zone_in_four_turns() {
    let mut grid = Grid::new(5);
    grid.set(CellCoord::new(0, 0), Cell::Human);
    grid.set(CellCoord::new(0, 4), Cell::Safe);

    let after_three = run_turns(&grid, 3);
    assert_eq!(after_three.cell(CellCoord::new(0, 3)), Cell::Human);
    assert_eq!(after_three.cell(CellCoord::new(0, 4)), Cell::Safe);

    let after_four = run_turns(&grid, 4);
    assert_eq!(after_four.cell(CellCoord::new(0, 4)), Cell::Human);
    assert_eq!(after_four.count(Cell::Human), 1);
    assert_eq!(after_four.count(Cell::Empty), 24);
}

#[test]
fn human_stops_once_the_last_safe_zone_is_taken() {
    let grid = Grid::parse(
        "
        H...S
        .....
        .....
        .....
        .....
        ",
    )
    .expect("valid layout");
    let sheltered = run_turns(&grid, 4);

    let mut current = sheltered.snapshot();
    for _ in 0..10 {
        let outcome = advance_turn(&current);
        assert!(!outcome.human_phase_ran);
        assert!(outcome.moves.is_empty());
        current = outcome.grid;
    }
    assert_eq!(current, sheltered);
}

#[test]
fn taking_a_safe_zone_consumes_it_and_the_human_heads_for_the_next() {
    let grid = Grid::parse(
        "
        H...S
        .....
        .....
        .....
        ....S
        ",
    )
    .expect("valid layout");

    let arrived = run_turns(&grid, 4);
    assert_eq!(arrived.cell(CellCoord::new(0, 4)), Cell::Human);
    assert_eq!(arrived.count(Cell::Safe), 1);

    let outcome = advance_turn(&arrived);
    assert_eq!(
        outcome.moves,
        vec![AppliedMove {
            class: AgentClass::Human,
            from: CellCoord::new(0, 4),
            to: CellCoord::new(1, 4),
            caught: false,
        }]
    );
    assert_eq!(outcome.grid.cell(CellCoord::new(0, 4)), Cell::Empty);

    let settled = run_turns(&grid, 8);
    assert_eq!(settled.cell(CellCoord::new(4, 4)), Cell::Human);
    assert_eq!(settled.count(Cell::Safe), 0);
    assert_eq!(run_turns(&settled, 3), settled);
}

#[test]
fn human_escapes_onto_adjacent_safe_zone_before_the_zombie_strikes() {
    let grid = Grid::parse(
        "
        ...
        ZHS
        ...
        ",
    )
    .expect("valid layout");

    let outcome = advance_turn(&grid);

    assert!(outcome.human_phase_ran);
    assert!(outcome.zombie_phase_ran);
    assert_eq!(outcome.grid.cell(CellCoord::new(1, 1)), Cell::Zombie);
    assert_eq!(outcome.grid.cell(CellCoord::new(1, 2)), Cell::Human);
    assert_eq!(outcome.grid.cell(CellCoord::new(1, 0)), Cell::Empty);
    assert_eq!(
        outcome.moves,
        vec![
            AppliedMove {
                class: AgentClass::Human,
                from: CellCoord::new(1, 1),
                to: CellCoord::new(1, 2),
                caught: false,
            },
            AppliedMove {
                class: AgentClass::Zombie,
                from: CellCoord::new(1, 0),
                to: CellCoord::new(1, 1),
                caught: false,
            },
        ]
    );
}

#[test]
fn adjacent_zombie_consumes_a_human_with_nowhere_to_go() {
    let grid = Grid::parse(
        "
        ...
        ZH.
        ...
        ",
    )
    .expect("valid layout");

    let outcome = advance_turn(&grid);

    assert!(!outcome.human_phase_ran);
    assert!(outcome.zombie_phase_ran);
    assert_eq!(outcome.grid.cell(CellCoord::new(1, 1)), Cell::Zombie);
    assert_eq!(outcome.grid.cell(CellCoord::new(1, 0)), Cell::Empty);
    assert_eq!(outcome.grid.count(Cell::Human), 0);
    assert!(outcome.moves[0].caught);
}

#[test]
fn exactly_one_of_two_equidistant_zombies_catches_the_human() {
    let grid = Grid::parse(
        "
        .Z.
        ZH.
        ...
        ",
    )
    .expect("valid layout");

    let outcome = advance_turn(&grid);

    let catches: Vec<_> = outcome.moves.iter().filter(|applied| applied.caught).collect();
    assert_eq!(catches.len(), 1);
    assert_eq!(catches[0].from, CellCoord::new(0, 1), "row-major order wins");
    assert_eq!(outcome.grid.to_string(), "...\nZZ.\n...\n");
}

#[test]
fn enclosed_zombie_never_moves() {
    let grid = Grid::parse(
        "
        .#....
        #Z#...
        .#....
        ......
        ....H.
        ......
        ",
    )
    .expect("valid layout");

    let mut current = grid.snapshot();
    for _ in 0..12 {
        let outcome = advance_turn(&current);
        assert!(outcome
            .moves
            .iter()
            .all(|applied| applied.class != AgentClass::Zombie));
        current = outcome.grid;
        assert_eq!(current.cell(CellCoord::new(1, 1)), Cell::Zombie);
    }
    assert_eq!(current, grid);
}

#[test]
fn empty_of_agents_grid_is_returned_unchanged() {
    let grid = Grid::parse(
        "
        S.#.
        .#..
        ..S.
        #...
        ",
    )
    .expect("valid layout");

    let outcome = advance_turn(&grid);

    assert!(!outcome.human_phase_ran);
    assert!(!outcome.zombie_phase_ran);
    assert!(!outcome.any_moved());
    assert_eq!(outcome.grid, grid);
}

#[test]
fn stuck_agents_leave_the_grid_identical() {
    let grid = Grid::parse(
        "
        H#S
        ##.
        ..Z
        ",
    )
    .expect("valid layout");

    let outcome = advance_turn(&grid);

    assert!(outcome.human_phase_ran);
    assert!(outcome.zombie_phase_ran);
    assert!(!outcome.any_moved());
    assert_eq!(outcome.grid, grid);
}

#[test]
fn humans_queue_for_the_same_cell() {
    let grid = Grid::parse(
        "
        .H.
        HS.
        ...
        ",
    )
    .expect("valid layout");

    let outcome = advance_turn(&grid);

    // Both humans head for the safe zone; the first in row-major order wins.
    assert_eq!(outcome.grid.to_string(), "...\nHH.\n...\n");
    assert_eq!(outcome.moves.len(), 1);
    assert_eq!(outcome.moves[0].from, CellCoord::new(0, 1));
}

#[test]
fn humans_never_step_onto_zombies_even_when_stranded() {
    let grid = Grid::parse(
        "
        #..
        HZS
        #..
        ",
    )
    .expect("valid layout");

    let outcome = advance_turn(&grid);

    assert_eq!(outcome.grid.cell(CellCoord::new(1, 0)), Cell::Zombie);
    assert_eq!(outcome.grid.count(Cell::Human), 0);
}

#[test]
fn zombies_converge_on_the_nearest_human() {
    let grid = Grid::parse(
        "
        Z.....
        ......
        ......
        ......
        ......
        H....H
        ",
    )
    .expect("valid layout");

    let after = run_turns(&grid, 5);

    assert_eq!(after.cell(CellCoord::new(5, 0)), Cell::Zombie);
    assert_eq!(after.cell(CellCoord::new(5, 5)), Cell::Human);
    assert_eq!(after.count(Cell::Human), 1);
}

#[test]
fn trailing_zombie_follows_a_leader_that_moved_first() {
    let grid = Grid::parse(
        "
        H.ZZ
        ....
        ....
        ....
        ",
    )
    .expect("valid layout");

    let outcome = advance_turn(&grid);

    assert_eq!(outcome.grid.to_string(), "HZZ.\n....\n....\n....\n");
    assert_eq!(
        outcome.moves,
        vec![
            AppliedMove {
                class: AgentClass::Zombie,
                from: CellCoord::new(0, 2),
                to: CellCoord::new(0, 1),
                caught: false,
            },
            AppliedMove {
                class: AgentClass::Zombie,
                from: CellCoord::new(0, 3),
                to: CellCoord::new(0, 2),
                caught: false,
            },
        ]
    );
}

#[test]
fn zombie_waits_when_the_zombie_ahead_moves_later_in_scan_order() {
    let grid = Grid::parse(
        "
        ZZ.H
        ....
        ....
        ....
        ",
    )
    .expect("valid layout");

    let outcome = advance_turn(&grid);

    assert_eq!(outcome.grid.to_string(), "Z.ZH\n....\n....\n....\n");
    assert_eq!(outcome.moves.len(), 1);
}
