//! Common types used throughout grid_path_planning

use std::fmt;

use itertools::Itertools;

use crate::common::distance::{euclidean, manhattan};

/// Integer cell coordinate on an occupancy grid.
///
/// `x` is the column and `y` the row. The derived ordering compares `x`
/// first, then `y`; planners use it as the fixed tie-break between queue
/// entries of equal priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridCoord {
    pub x: usize,
    pub y: usize,
}

impl GridCoord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Shift by a signed offset, `None` if either axis would go negative
    pub fn offset(&self, dx: isize, dy: isize) -> Option<GridCoord> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(GridCoord { x, y })
    }

    /// `(row, column)` index into a matrix laid out like the grid
    pub fn matrix_index(&self) -> (usize, usize) {
        (self.y, self.x)
    }

    /// True if `other` is exactly one axis-aligned unit step away
    pub fn is_adjacent4(&self, other: &GridCoord) -> bool {
        manhattan(*self, *other) == 1
    }
}

impl From<(usize, usize)> for GridCoord {
    fn from(tuple: (usize, usize)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Occupancy state of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Free,
    Obstacle,
    Start,
    Goal,
}

impl CellState {
    pub fn is_obstacle(self) -> bool {
        self == CellState::Obstacle
    }

    /// ASCII symbol used by `GridMap::from_ascii` and `Display`
    pub fn symbol(self) -> char {
        match self {
            CellState::Free => '.',
            CellState::Obstacle => '#',
            CellState::Start => 'S',
            CellState::Goal => 'G',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(CellState::Free),
            '#' => Some(CellState::Obstacle),
            'S' => Some(CellState::Start),
            'G' => Some(CellState::Goal),
            _ => None,
        }
    }
}

/// Path represented as an ordered sequence of cells, start and goal inclusive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPath {
    cells: Vec<GridCoord>,
}

impl GridPath {
    pub fn from_cells(cells: Vec<GridCoord>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[GridCoord] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<GridCoord> {
        self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GridCoord> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Option<GridCoord> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<GridCoord> {
        self.cells.last().copied()
    }

    pub fn contains(&self, cell: GridCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Sum of Manhattan distances between consecutive cells
    pub fn cost(&self) -> usize {
        self.cells
            .iter()
            .tuple_windows()
            .map(|(a, b)| manhattan(*a, *b))
            .sum()
    }

    /// Sum of Euclidean distances between consecutive cells
    pub fn total_length(&self) -> f64 {
        self.cells
            .iter()
            .tuple_windows()
            .map(|(a, b)| euclidean(*a, *b))
            .sum()
    }

    /// True if every consecutive pair is a single axis-aligned step
    pub fn is_four_connected(&self) -> bool {
        self.cells
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.is_adjacent4(b))
    }
}

impl<'a> IntoIterator for &'a GridPath {
    type Item = &'a GridCoord;
    type IntoIter = std::slice::Iter<'a, GridCoord>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl fmt::Display for GridPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.cells.iter().join(" -> "))
    }
}

/// One growth step of a sampling tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeEdge {
    pub parent: GridCoord,
    pub child: GridCoord,
}

impl TreeEdge {
    pub fn new(parent: GridCoord, child: GridCoord) -> Self {
        Self { parent, child }
    }
}
