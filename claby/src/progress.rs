use crate::{grid::Grid, node::Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub from: usize,
}

impl Progress {
    pub fn new(done: usize, from: usize) -> Self {
        Self { done, from }
    }

    pub fn percent(&self) -> f32 {
        if self.from == 0 {
            return 1.0;
        }
        self.done as f32 / self.from as f32
    }
}

/// Which algorithm step produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Carve,
    Search,
    Path,
}

/// Gets called after every single-cell change made by the generator or the solver.
///
/// The grid is already updated when `step` runs, `cursor` is the cell that
/// changed last.
pub trait Observer {
    fn step(&mut self, phase: Phase, grid: &Grid, cursor: Node, progress: Progress);
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Observer for Silent {
    fn step(&mut self, _: Phase, _: &Grid, _: Node, _: Progress) {}
}

impl<F> Observer for F
where
    F: FnMut(Phase, &Grid, Node, Progress),
{
    fn step(&mut self, phase: Phase, grid: &Grid, cursor: Node, progress: Progress) {
        self(phase, grid, cursor, progress)
    }
}
