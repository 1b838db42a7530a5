use std::collections::{HashSet, VecDeque};

use claby::{
    algorithms::{random, BreadthFirstSearch, Carver, RecursiveBacktracker, SolveError, Solver},
    progress::Silent,
    CellState, Grid, Node,
};

const SIZES: [(usize, usize); 6] = [(2, 2), (2, 5), (5, 2), (4, 4), (7, 3), (10, 10)];
const SEEDS: [u64; 4] = [0, 1, 42, 0xdead_beef];

fn carved(rows: usize, cols: usize, seed: u64) -> Grid {
    let mut grid = Grid::new(rows, cols).unwrap();
    let (mut rng, _) = random(Some(seed));
    let start = grid.seed();
    RecursiveBacktracker
        .carve(&mut grid, start, &mut rng, &mut Silent)
        .unwrap();
    grid
}

fn open_neighbors(grid: &Grid, pos: Node) -> impl Iterator<Item = Node> + '_ {
    Node::unit_steps()
        .into_iter()
        .map(move |step| pos + step)
        .filter(|next| grid.is_open(*next))
}

fn reachable_from_entrance(grid: &Grid) -> HashSet<Node> {
    let mut seen = HashSet::from([grid.entrance()]);
    let mut queue = VecDeque::from([grid.entrance()]);
    while let Some(pos) = queue.pop_front() {
        for next in open_neighbors(grid, pos) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Depth-limited DFS with a growing limit, independent of the solver.
fn iterative_deepening(grid: &Grid) -> Option<usize> {
    fn dls(grid: &Grid, pos: Node, limit: usize, on_path: &mut HashSet<Node>) -> bool {
        if grid.is_exit(pos) {
            return true;
        }
        if limit == 0 {
            return false;
        }

        let neighbors: Vec<_> = open_neighbors(grid, pos).collect();
        for next in neighbors {
            if on_path.insert(next) {
                let found = dls(grid, next, limit - 1, on_path);
                on_path.remove(&next);
                if found {
                    return true;
                }
            }
        }
        false
    }

    let max = grid.rows() * grid.cols();
    (0..=max).find(|&limit| {
        let mut on_path = HashSet::from([grid.entrance()]);
        dls(grid, grid.entrance(), limit, &mut on_path)
    })
}

#[test]
fn every_passage_is_reachable() {
    for (rows, cols) in SIZES {
        for seed in SEEDS {
            let grid = carved(rows, cols, seed);
            let reachable = reachable_from_entrance(&grid);
            let open = grid.iter().filter(|(_, state)| state.is_open()).count();

            assert_eq!(reachable.len(), open, "{}x{} seed {}", rows, cols, seed);
        }
    }
}

#[test]
fn maze_is_a_spanning_tree() {
    for (rows, cols) in SIZES {
        for seed in SEEDS {
            let grid = carved(rows, cols, seed);

            let logical = grid
                .iter()
                .filter(|(pos, state)| pos.is_logical() && *state == CellState::Passage)
                .count();
            let connectors = grid
                .iter()
                .filter(|(pos, state)| {
                    grid.is_interior(*pos)
                        && !pos.is_logical()
                        && (pos.row + pos.col) % 2 == 1
                        && *state == CellState::Passage
                })
                .count();

            assert_eq!(logical, rows * cols);
            assert_eq!(connectors, rows * cols - 1);
            // logical cells, connectors, entrance and exit
            assert_eq!(grid.count(CellState::Passage), 2 * rows * cols + 1);
        }
    }
}

#[test]
fn bfs_matches_brute_force() {
    for (rows, cols) in [(2, 2), (3, 4), (4, 4), (5, 3)] {
        for seed in SEEDS {
            let mut grid = carved(rows, cols, seed);
            let expected = iterative_deepening(&grid).expect("carved maze has a path");

            let found = BreadthFirstSearch.solve(&mut grid, &mut Silent).unwrap();
            assert_eq!(found.length, expected, "{}x{} seed {}", rows, cols, seed);
        }
    }
}

#[test]
fn bfs_is_shortest_on_mazes_with_loops() {
    let mut grid = carved(4, 5, 8);
    // knock down extra walls, the maze stops being perfect
    for pos in [Node::new(2, 1), Node::new(1, 4), Node::new(4, 5), Node::new(6, 7)] {
        grid.set_cell_state(pos, CellState::Passage).unwrap();
    }

    let expected = iterative_deepening(&grid).unwrap();
    let found = BreadthFirstSearch.solve(&mut grid, &mut Silent).unwrap();
    assert_eq!(found.length, expected);
}

#[test]
fn forced_exit_wall_has_no_path() {
    let mut grid = carved(6, 6, 3);
    let exit = grid.exit();
    grid.set_cell_state(exit, CellState::Wall).unwrap();

    assert_eq!(
        BreadthFirstSearch.solve(&mut grid, &mut Silent),
        Err(SolveError::NoPathFound)
    );
    assert_eq!(grid.cell_state(grid.entrance()), Ok(CellState::Passage));
}

#[test]
fn four_by_four_scenario() {
    let mut grid = Grid::new(4, 4).unwrap();
    assert_eq!((grid.rows(), grid.cols()), (9, 9));
    assert_eq!(grid.cell_state(Node::new(1, 0)), Ok(CellState::Passage));
    assert_eq!(grid.cell_state(Node::new(7, 8)), Ok(CellState::Passage));

    let (mut rng, _) = random(Some(2024));
    let start = grid.seed();
    RecursiveBacktracker
        .carve(&mut grid, start, &mut rng, &mut Silent)
        .unwrap();

    let found = BreadthFirstSearch.solve(&mut grid, &mut Silent).unwrap();
    assert!(found.length >= 14);
    assert!(found.logical_moves() >= 7);
    assert_eq!(found.length % 2, 0);
}

#[test]
fn dimension_floor() {
    assert!(Grid::new(1, 5).is_err());
    assert!(Grid::new(5, 1).is_err());
    assert!(Grid::new(2, 2).is_ok());
}
