use std::{
    fmt,
    ops::{Add, Div, Mul, Sub},
};

/// Position on the grid, `row` first, both 0-indexed.
///
/// Also used for offsets between two positions, see [`Node::UP`] and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    pub row: i32,
    pub col: i32,
}

impl Node {
    pub const ZERO: Node = Node::new(0, 0);

    pub const UP: Node = Node::new(-1, 0);
    pub const DOWN: Node = Node::new(1, 0);
    pub const LEFT: Node = Node::new(0, -1);
    pub const RIGHT: Node = Node::new(0, 1);

    pub const fn new(row: i32, col: i32) -> Self {
        Node { row, col }
    }

    /// Unit steps in the order the solver explores them.
    pub const fn unit_steps() -> [Node; 4] {
        [Node::DOWN, Node::UP, Node::RIGHT, Node::LEFT]
    }

    pub fn abs_sum(self) -> i32 {
        self.row.abs() + self.col.abs()
    }

    pub fn manhattan(self, other: Node) -> i32 {
        (self - other).abs_sum()
    }

    /// Both coordinates odd, i.e. a logical maze cell.
    pub fn is_logical(self) -> bool {
        self.row % 2 == 1 && self.col % 2 == 1
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl Add for Node {
    type Output = Node;

    fn add(self, other: Node) -> Node {
        Node::new(self.row + other.row, self.col + other.col)
    }
}

impl Sub for Node {
    type Output = Node;

    fn sub(self, other: Node) -> Node {
        Node::new(self.row - other.row, self.col - other.col)
    }
}

impl Mul<i32> for Node {
    type Output = Node;

    fn mul(self, other: i32) -> Node {
        Node::new(self.row * other, self.col * other)
    }
}

impl Div<i32> for Node {
    type Output = Node;

    fn div(self, other: i32) -> Node {
        Node::new(self.row / other, self.col / other)
    }
}

impl From<(i32, i32)> for Node {
    fn from(tuple: (i32, i32)) -> Self {
        Node::new(tuple.0, tuple.1)
    }
}

impl From<Node> for (i32, i32) {
    fn from(val: Node) -> Self {
        (val.row, val.col)
    }
}
