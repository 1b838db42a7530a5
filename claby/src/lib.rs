pub mod algorithms;
pub mod array;
pub mod grid;
pub mod node;
pub mod progress;
pub mod session;

pub use grid::{CellState, Grid, GridError};
pub use node::Node;
