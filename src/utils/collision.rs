//! Line-of-sight collision checking on the occupancy grid
//!
//! Segments are rasterized with Bresenham's algorithm: an error
//! accumulator decides when the minor axis advances, and every visited
//! cell, both endpoints included, must be traversable.

use crate::common::GridCoord;
use crate::utils::GridMap;

/// Iterator over the cells of a Bresenham line, endpoints inclusive
#[derive(Debug, Clone)]
pub struct LineCells {
    x: i64,
    y: i64,
    x1: i64,
    y1: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    done: bool,
}

/// Rasterize the segment from `from` to `to`
pub fn line_cells(from: GridCoord, to: GridCoord) -> LineCells {
    let (x0, y0) = (from.x as i64, from.y as i64);
    let (x1, y1) = (to.x as i64, to.y as i64);
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    LineCells {
        x: x0,
        y: y0,
        x1,
        y1,
        dx,
        dy,
        sx: if x0 < x1 { 1 } else { -1 },
        sy: if y0 < y1 { 1 } else { -1 },
        err: dx - dy,
        done: false,
    }
}

impl Iterator for LineCells {
    type Item = GridCoord;

    fn next(&mut self) -> Option<GridCoord> {
        if self.done {
            return None;
        }
        // x and y never leave the bounding box of two valid coordinates
        let cell = GridCoord::new(self.x as usize, self.y as usize);

        if self.x == self.x1 && self.y == self.y1 {
            self.done = true;
            return Some(cell);
        }

        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(cell)
    }
}

/// Straight-line collision checker over a borrowed map
#[derive(Debug, Clone, Copy)]
pub struct CollisionChecker<'a> {
    map: &'a GridMap,
}

impl<'a> CollisionChecker<'a> {
    pub fn new(map: &'a GridMap) -> Self {
        Self { map }
    }

    /// True if every cell on the segment is in bounds and not an obstacle.
    ///
    /// The endpoints are put in coordinate order before rasterizing, so
    /// `segment_free(a, b) == segment_free(b, a)`. A zero-length segment is
    /// free without looking at the map.
    pub fn segment_free(&self, a: GridCoord, b: GridCoord) -> bool {
        self.first_blocked(a, b).is_none()
    }

    /// First blocked cell on the canonically ordered segment, if any
    pub fn first_blocked(&self, a: GridCoord, b: GridCoord) -> Option<GridCoord> {
        if a == b {
            return None;
        }
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        line_cells(from, to).find(|cell| !self.map.is_traversable(*cell))
    }
}

/// Convenience wrapper around [`CollisionChecker::segment_free`]
pub fn segment_free(map: &GridMap, a: GridCoord, b: GridCoord) -> bool {
    CollisionChecker::new(map).segment_free(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;

    fn cells(points: &[(usize, usize)]) -> Vec<GridCoord> {
        points.iter().map(|&p| GridCoord::from(p)).collect()
    }

    #[test]
    fn test_line_cells_shallow_slope() {
        let line: Vec<_> = line_cells(GridCoord::new(0, 0), GridCoord::new(3, 1)).collect();
        assert_eq!(line, cells(&[(0, 0), (1, 0), (2, 1), (3, 1)]));
    }

    #[test]
    fn test_line_cells_diagonal_and_single() {
        let line: Vec<_> = line_cells(GridCoord::new(2, 2), GridCoord::new(0, 0)).collect();
        assert_eq!(line, cells(&[(2, 2), (1, 1), (0, 0)]));

        let line: Vec<_> = line_cells(GridCoord::new(1, 4), GridCoord::new(1, 4)).collect();
        assert_eq!(line, cells(&[(1, 4)]));
    }

    #[test]
    fn test_segment_blocked_by_wall() {
        let map = GridMap::from_ascii(&[
            ".....",
            "..#..",
            "..#..",
            ".....",
        ])
        .unwrap();
        assert!(!segment_free(&map, GridCoord::new(0, 1), GridCoord::new(4, 1)));
        assert!(segment_free(&map, GridCoord::new(0, 0), GridCoord::new(4, 0)));
        assert!(segment_free(&map, GridCoord::new(0, 3), GridCoord::new(4, 3)));
        assert_eq!(
            CollisionChecker::new(&map).first_blocked(GridCoord::new(4, 2), GridCoord::new(0, 2)),
            Some(GridCoord::new(2, 2))
        );
    }

    #[test]
    fn test_endpoints_are_checked() {
        let map = GridMap::from_ascii(&["..#"]).unwrap();
        assert!(!segment_free(&map, GridCoord::new(0, 0), GridCoord::new(2, 0)));
        assert!(!segment_free(&map, GridCoord::new(2, 0), GridCoord::new(1, 0)));
        assert!(segment_free(&map, GridCoord::new(0, 0), GridCoord::new(1, 0)));
    }

    #[test]
    fn test_zero_length_segment_is_free() {
        let map = GridMap::from_ascii(&["#"]).unwrap();
        assert!(segment_free(&map, GridCoord::new(0, 0), GridCoord::new(0, 0)));
    }

    #[test]
    fn test_segment_free_is_symmetric() {
        let map = GridMap::from_ascii(&[
            "..#...",
            "......",
            ".#..#.",
            "...#..",
            "#.....",
        ])
        .unwrap();
        let all: Vec<GridCoord> = iproduct!(0..map.width(), 0..map.height())
            .map(GridCoord::from)
            .collect();
        for (&a, &b) in iproduct!(all.iter(), all.iter()) {
            assert_eq!(
                segment_free(&map, a, b),
                segment_free(&map, b, a),
                "asymmetric check between {} and {}",
                a,
                b
            );
        }
    }
}
