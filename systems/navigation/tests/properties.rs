use outbreak_core::{Cell, CellCoord, Grid};
use outbreak_system_navigation::{compute_distance_field, UNREACHABLE};

fn all_cells(size: u32) -> impl Iterator<Item = CellCoord> {
    (0..size).flat_map(move |row| (0..size).map(move |column| CellCoord::new(row, column)))
}

#[test]
fn open_grid_distances_equal_manhattan_distance() {
    for size in 1..=6 {
        let grid = Grid::new(size);
        for source in all_cells(size) {
            let field = compute_distance_field(&grid, &[source]);
            for cell in all_cells(size) {
                assert_eq!(
                    field.distance(cell),
                    Some(source.manhattan_distance(cell)),
                    "size {size}, source {source:?}, cell {cell:?}"
                );
            }
        }
    }
}

#[test]
fn open_grid_distances_are_symmetric() {
    let size = 5;
    let grid = Grid::new(size);
    for a in all_cells(size) {
        let from_a = compute_distance_field(&grid, &[a]);
        for b in all_cells(size) {
            let from_b = compute_distance_field(&grid, &[b]);
            assert_eq!(from_a.distance(b), from_b.distance(a));
        }
    }
}

#[test]
fn walled_in_cell_is_unreachable() {
    let grid = Grid::parse(
        "
        S....
        ..#..
        .#.#.
        ..#..
        .....
        ",
    )
    .expect("valid layout");
    let field = compute_distance_field(&grid, &grid.positions_of(Cell::Safe));

    assert_eq!(field.raw(CellCoord::new(2, 2)), UNREACHABLE);
    assert!(!field.is_reachable(CellCoord::new(2, 2)));
    assert_eq!(field.distance(CellCoord::new(4, 4)), Some(8));
}

#[test]
fn walled_in_source_reaches_only_its_pocket() {
    let grid = Grid::parse(
        "
        .#...
        #H#..
        .#...
        .....
        .....
        ",
    )
    .expect("valid layout");
    let field = compute_distance_field(&grid, &grid.positions_of(Cell::Human));

    let reachable: Vec<_> = all_cells(grid.size())
        .filter(|cell| field.is_reachable(*cell))
        .collect();
    assert_eq!(reachable, vec![CellCoord::new(1, 1)]);
}

#[test]
fn barricades_lengthen_paths() {
    let grid = Grid::parse(
        "
        S#.
        .#.
        ...
        ",
    )
    .expect("valid layout");
    let field = compute_distance_field(&grid, &[CellCoord::new(0, 0)]);

    assert_eq!(field.distance(CellCoord::new(0, 2)), Some(6));
    assert_eq!(field.distance(CellCoord::new(0, 1)), None);
}
