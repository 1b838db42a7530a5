use std::fmt;

use thiserror::Error;

use crate::{array::Array2D, node::Node};

/// Smallest accepted logical size along either axis.
pub const MIN_LOGICAL_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Wall,
    Passage,
    /// Passage explored by the solver.
    Visited,
    /// Passage on the reconstructed shortest path.
    Solution,
    /// Passage the player has walked off.
    Trail,
}

impl CellState {
    /// Anything but a wall can be walked through.
    pub fn is_open(self) -> bool {
        self != CellState::Wall
    }

    pub fn is_mark(self) -> bool {
        matches!(self, CellState::Visited | CellState::Solution | CellState::Trail)
    }

    pub fn symbol(self) -> char {
        match self {
            CellState::Wall => '#',
            CellState::Passage => ' ',
            CellState::Visited | CellState::Trail => '.',
            CellState::Solution => '*',
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("invalid dimensions {rows}x{cols}, minimum is {MIN_LOGICAL_SIZE}x{MIN_LOGICAL_SIZE}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("coordinate {0} is out of bounds")]
    OutOfBounds(Node),
    #[error("could not allocate storage for {cells} cells")]
    Allocation { cells: usize },
}

/// Maze of `logical_rows x logical_cols` cells stored in a doubled grid, so
/// that every wall between two logical cells has its own slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Array2D<CellState>,
    logical_rows: usize,
    logical_cols: usize,
}

impl Grid {
    /// Allocates an all-wall grid with the entrance, the exit and the seed cell open.
    pub fn new(logical_rows: usize, logical_cols: usize) -> Result<Self, GridError> {
        const MAX_LOGICAL: usize = (i32::MAX as usize - 1) / 2;

        let invalid = GridError::InvalidDimensions {
            rows: logical_rows,
            cols: logical_cols,
        };
        if logical_rows < MIN_LOGICAL_SIZE || logical_cols < MIN_LOGICAL_SIZE {
            return Err(invalid);
        }
        if logical_rows > MAX_LOGICAL || logical_cols > MAX_LOGICAL {
            return Err(invalid);
        }

        let (rows, cols) = (logical_rows * 2 + 1, logical_cols * 2 + 1);
        let cells = Array2D::try_new(CellState::Wall, rows, cols).map_err(|_| {
            GridError::Allocation {
                cells: rows.saturating_mul(cols),
            }
        })?;

        let mut grid = Grid {
            cells,
            logical_rows,
            logical_cols,
        };

        for pos in [grid.entrance(), grid.exit(), grid.seed()] {
            grid.set_cell_state(pos, CellState::Passage)?;
        }

        log::debug!(
            "Allocated {}x{} grid for a {}x{} maze",
            rows,
            cols,
            logical_rows,
            logical_cols
        );

        Ok(grid)
    }

    pub fn logical_rows(&self) -> usize {
        self.logical_rows
    }

    pub fn logical_cols(&self) -> usize {
        self.logical_cols
    }

    pub fn logical_count(&self) -> usize {
        self.logical_rows * self.logical_cols
    }

    pub fn rows(&self) -> usize {
        self.cells.rows()
    }

    pub fn cols(&self) -> usize {
        self.cells.cols()
    }

    pub fn size(&self) -> Node {
        self.cells.size()
    }

    pub fn entrance(&self) -> Node {
        Node::new(1, 0)
    }

    pub fn exit(&self) -> Node {
        let size = self.size();
        Node::new(size.row - 2, size.col - 1)
    }

    /// First logical cell, opened before carving starts.
    pub fn seed(&self) -> Node {
        Node::new(1, 1)
    }

    pub fn is_entrance(&self, pos: Node) -> bool {
        pos == self.entrance()
    }

    pub fn is_exit(&self, pos: Node) -> bool {
        pos == self.exit()
    }

    pub fn is_in_bounds(&self, pos: Node) -> bool {
        self.cells.node_to_idx(pos).is_some()
    }

    /// Strictly inside the outer border.
    pub fn is_interior(&self, pos: Node) -> bool {
        let size = self.size();
        0 < pos.row && pos.row < size.row - 1 && 0 < pos.col && pos.col < size.col - 1
    }

    pub fn cell_state(&self, pos: Node) -> Result<CellState, GridError> {
        self.cells
            .get(pos)
            .copied()
            .ok_or(GridError::OutOfBounds(pos))
    }

    pub fn set_cell_state(&mut self, pos: Node, state: CellState) -> Result<(), GridError> {
        let cell = self.cells.get_mut(pos).ok_or(GridError::OutOfBounds(pos))?;
        *cell = state;
        Ok(())
    }

    pub fn is_open(&self, pos: Node) -> bool {
        self.cells.get(pos).is_some_and(|state| state.is_open())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Node, CellState)> + '_ {
        self.cells.iter_pos().zip(self.cells.iter().copied())
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }

    /// Turns every solver and player mark back into a plain passage.
    pub fn clear_marks(&mut self) {
        let marked: Vec<_> = self
            .iter()
            .filter(|(_, state)| state.is_mark())
            .map(|(pos, _)| pos)
            .collect();

        for pos in marked {
            self.cells[pos] = CellState::Passage;
        }
    }

    /// Legend character for a cell, with the entrance and exit markers on top.
    pub fn symbol_at(&self, pos: Node) -> Option<char> {
        let state = self.cells.get(pos)?;
        Some(if self.is_entrance(pos) {
            'S'
        } else if self.is_exit(pos) {
            'E'
        } else {
            state.symbol()
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        for row in 0..size.row {
            for col in 0..size.col {
                let symbol = self.symbol_at(Node::new(row, col)).unwrap_or('?');
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_validation() {
        assert_eq!(
            Grid::new(1, 5),
            Err(GridError::InvalidDimensions { rows: 1, cols: 5 })
        );
        assert_eq!(
            Grid::new(5, 1),
            Err(GridError::InvalidDimensions { rows: 5, cols: 1 })
        );
        assert!(matches!(
            Grid::new(0, 0),
            Err(GridError::InvalidDimensions { .. })
        ));
        assert!(Grid::new(2, 2).is_ok());
    }

    #[test]
    fn initial_layout() {
        let grid = Grid::new(4, 4).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (9, 9));
        assert_eq!(grid.entrance(), Node::new(1, 0));
        assert_eq!(grid.exit(), Node::new(7, 8));

        for pos in [Node::new(1, 0), Node::new(7, 8), Node::new(1, 1)] {
            assert_eq!(grid.cell_state(pos), Ok(CellState::Passage));
        }
        assert_eq!(grid.count(CellState::Passage), 3);
        assert_eq!(grid.count(CellState::Wall), 81 - 3);
    }

    #[test]
    fn bounds_contract() {
        let mut grid = Grid::new(2, 3).unwrap();
        let size = grid.size();

        for row in -2..size.row + 2 {
            for col in -2..size.col + 2 {
                let pos = Node::new(row, col);
                let inside = row >= 0 && row < size.row && col >= 0 && col < size.col;

                assert_eq!(grid.cell_state(pos).is_ok(), inside, "{}", pos);
                let set = grid.set_cell_state(pos, CellState::Wall);
                if inside {
                    assert_eq!(set, Ok(()));
                } else {
                    assert_eq!(set, Err(GridError::OutOfBounds(pos)));
                }
            }
        }
    }

    #[test]
    fn entrance_and_exit_predicates() {
        let grid = Grid::new(3, 5).unwrap();
        assert!(grid.is_entrance(Node::new(1, 0)));
        assert!(!grid.is_entrance(Node::new(1, 1)));
        assert!(grid.is_exit(Node::new(5, 10)));
        assert!(!grid.is_exit(Node::new(5, 9)));
        assert!(!grid.is_interior(grid.entrance()));
        assert!(grid.is_interior(grid.seed()));
    }

    #[test]
    fn clear_marks_keeps_walls() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_cell_state(Node::new(1, 1), CellState::Solution).unwrap();
        grid.set_cell_state(Node::new(1, 2), CellState::Trail).unwrap();
        grid.set_cell_state(Node::new(1, 3), CellState::Visited).unwrap();

        grid.clear_marks();

        assert_eq!(grid.count(CellState::Passage), 5);
        assert_eq!(grid.count(CellState::Solution), 0);
        assert_eq!(grid.cell_state(Node::new(0, 0)), Ok(CellState::Wall));
    }

    #[test]
    fn display_legend() {
        let grid = Grid::new(2, 2).unwrap();
        let text = grid.to_string();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "#####");
        assert_eq!(lines[1], "S ###");
        assert_eq!(lines[3], "####E");
    }
}
