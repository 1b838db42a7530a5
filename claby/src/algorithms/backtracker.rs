use rand::{seq::SliceRandom as _, RngCore};

use super::Carver;
use crate::{
    grid::{CellState, Grid, GridError},
    node::Node,
    progress::{Observer, Phase, Progress},
};

/// Randomized depth-first carving, producing a perfect maze.
///
/// Runs on an explicit stack. Every frame keeps its own shuffled directions
/// and resumes where it left off, so the order of carving is the same as
/// the recursive formulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecursiveBacktracker;

struct Frame {
    cell: Node,
    steps: [Node; 4],
    next: usize,
}

impl Frame {
    fn enter<R: RngCore + ?Sized>(cell: Node, rng: &mut R) -> Self {
        let mut steps = [Node::RIGHT, Node::LEFT, Node::DOWN, Node::UP].map(|step| step * 2);
        steps.shuffle(rng);

        Frame {
            cell,
            steps,
            next: 0,
        }
    }
}

impl Carver for RecursiveBacktracker {
    fn carve<R, O>(
        &self,
        grid: &mut Grid,
        seed: Node,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<(), GridError>
    where
        R: RngCore + ?Sized,
        O: Observer + ?Sized,
    {
        if !seed.is_logical() {
            log::warn!("Seed {} is not a logical cell, carving anyway", seed);
        }

        if grid.cell_state(seed)? == CellState::Wall {
            grid.set_cell_state(seed, CellState::Passage)?;
        }

        let total = grid.logical_count();
        let mut carved = 1;
        let mut stack = Vec::with_capacity(total);
        stack.push(Frame::enter(seed, rng));

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.steps.len() {
                stack.pop();
                continue;
            }

            let current = frame.cell;
            let step = frame.steps[frame.next];
            frame.next += 1;

            let target = current + step;
            if !grid.is_interior(target) || grid.cell_state(target)? != CellState::Wall {
                continue;
            }

            grid.set_cell_state(current + step / 2, CellState::Passage)?;
            grid.set_cell_state(target, CellState::Passage)?;
            carved += 1;

            observer.step(Phase::Carve, grid, target, Progress::new(carved, total));
            stack.push(Frame::enter(target, rng));
        }

        log::debug!(
            "Carved {} of {} cells of a {}x{} maze",
            carved,
            total,
            grid.logical_rows(),
            grid.logical_cols()
        );

        Ok(())
    }
}
