use std::collections::VecDeque;

use hashbrown::HashMap;
use smallvec::SmallVec;
use thiserror::Error;

use super::Solver;
use crate::{
    array::Array2D,
    grid::{CellState, Grid, GridError},
    node::Node,
    progress::{Observer, Phase, Progress},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("no path from the entrance to the exit")]
    NoPathFound,
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFound {
    /// Number of single-cell hops from the entrance to the exit.
    pub length: usize,
    /// Entrance first, exit last.
    pub path: Vec<Node>,
}

impl PathFound {
    /// Moves between logical cells, every one of them spans two grid cells.
    pub fn logical_moves(&self) -> usize {
        self.length / 2
    }
}

/// Breadth-first search from the entrance, marking the shortest path on the grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirstSearch;

impl BreadthFirstSearch {
    fn search<O>(
        grid: &mut Grid,
        observer: &mut O,
    ) -> Result<Option<HashMap<Node, Node>>, GridError>
    where
        O: Observer + ?Sized,
    {
        let (start, end) = (grid.entrance(), grid.exit());
        let mut visited = Array2D::new(false, grid.rows(), grid.cols());
        let mut parents = HashMap::new();
        let mut queue = VecDeque::new();

        let open_count = grid.iter().filter(|(_, state)| state.is_open()).count();
        let mut progress = Progress::new(1, open_count);

        visited[start] = true;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if current == end {
                break;
            }

            let neighbors = Node::unit_steps()
                .into_iter()
                .map(|step| current + step)
                .filter(|&next| grid.is_open(next) && !visited[next])
                .collect::<SmallVec<[_; 4]>>();

            for next in neighbors {
                visited[next] = true;
                parents.insert(next, current);
                queue.push_back(next);

                grid.set_cell_state(next, CellState::Visited)?;
                progress.done += 1;
                observer.step(Phase::Search, grid, next, progress);
            }
        }

        Ok(visited[end].then_some(parents))
    }
}

impl Solver for BreadthFirstSearch {
    fn solve<O>(&self, grid: &mut Grid, observer: &mut O) -> Result<PathFound, SolveError>
    where
        O: Observer + ?Sized,
    {
        let (start, end) = (grid.entrance(), grid.exit());

        if !grid.cell_state(start)?.is_open() {
            log::warn!("Entrance {} is walled off", start);
            return Err(SolveError::NoPathFound);
        }

        let Some(parents) = Self::search(grid, observer)? else {
            log::warn!("Exit {} is not reachable from {}", end, start);
            return Err(SolveError::NoPathFound);
        };

        let mut path = vec![end];
        let mut current = end;
        while current != start {
            current = *parents.get(&current).ok_or(SolveError::NoPathFound)?;
            path.push(current);
        }

        let inner = path.len().saturating_sub(2);
        for (i, &pos) in path[1..path.len() - 1].iter().enumerate() {
            grid.set_cell_state(pos, CellState::Solution)?;
            observer.step(Phase::Path, grid, pos, Progress::new(i + 1, inner));
        }
        path.reverse();

        let found = PathFound {
            length: path.len() - 1,
            path,
        };
        log::debug!("Found a path of {} steps", found.length);

        Ok(found)
    }
}
