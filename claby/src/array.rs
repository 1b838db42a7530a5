use std::{collections::TryReserveError, ops};

use crate::node::Node;

/// Dense row-major 2D storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array2D<T> {
    buf: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Array2D<T> {
    pub fn size(&self) -> Node {
        Node::new(self.rows as i32, self.cols as i32)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn node_to_idx(&self, pos: Node) -> Option<usize> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }

        let (row, col) = (pos.row as usize, pos.col as usize);
        if row >= self.rows || col >= self.cols {
            return None;
        }

        Some(row * self.cols + col)
    }

    pub fn idx_to_node(&self, idx: usize) -> Option<Node> {
        if idx >= self.buf.len() {
            return None;
        }

        Some(Node::new((idx / self.cols) as i32, (idx % self.cols) as i32))
    }

    pub fn get(&self, pos: Node) -> Option<&T> {
        self.node_to_idx(pos).and_then(|i| self.buf.get(i))
    }

    pub fn get_mut(&mut self, pos: Node) -> Option<&mut T> {
        self.node_to_idx(pos).and_then(|i| self.buf.get_mut(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }

    pub fn iter_pos(&self) -> impl Iterator<Item = Node> + '_ {
        (0..self.buf.len()).filter_map(move |i| self.idx_to_node(i))
    }
}

impl<T: Clone> Array2D<T> {
    pub fn new(item: T, rows: usize, cols: usize) -> Self {
        Self {
            buf: vec![item; rows * cols],
            rows,
            cols,
        }
    }

    /// Like [`Array2D::new`], but reports a failed allocation instead of aborting.
    pub fn try_new(item: T, rows: usize, cols: usize) -> Result<Self, TryReserveError> {
        let len = rows.saturating_mul(cols);
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)?;
        buf.resize(len, item);

        Ok(Self { buf, rows, cols })
    }
}

impl<T> ops::Index<Node> for Array2D<T> {
    type Output = T;

    fn index(&self, index: Node) -> &Self::Output {
        self.get(index)
            .unwrap_or_else(|| panic!("Index out of bounds: {}", index))
    }
}

impl<T> ops::IndexMut<Node> for Array2D<T> {
    fn index_mut(&mut self, index: Node) -> &mut Self::Output {
        self.get_mut(index)
            .unwrap_or_else(|| panic!("Index out of bounds: {}", index))
    }
}
