mod backtracker;
mod bfs;

use std::fmt;

use rand::{thread_rng, Rng, RngCore, SeedableRng as _};

pub use backtracker::RecursiveBacktracker;
pub use bfs::{BreadthFirstSearch, PathFound, SolveError};

use crate::{grid::Grid, grid::GridError, node::Node, progress::Observer};

/// Random number generator used for anything, where determinism is required.
pub type Random = rand_xoshiro::Xoshiro256StarStar;

/// Seeded generator, or a freshly seeded one when `seed` is `None`.
///
/// Returns the seed actually used, so a run can be reproduced.
pub fn random(seed: Option<u64>) -> (Random, u64) {
    let seed = seed.unwrap_or_else(|| thread_rng().gen());
    (Random::seed_from_u64(seed), seed)
}

/// Carves passages into an initialized grid.
pub trait Carver: fmt::Debug {
    fn carve<R, O>(
        &self,
        grid: &mut Grid,
        seed: Node,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<(), GridError>
    where
        R: RngCore + ?Sized,
        O: Observer + ?Sized;
}

/// Finds a path from the entrance to the exit of a carved grid.
pub trait Solver: fmt::Debug {
    fn solve<O>(&self, grid: &mut Grid, observer: &mut O) -> Result<PathFound, SolveError>
    where
        O: Observer + ?Sized;
}
