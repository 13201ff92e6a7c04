//! Distance metrics over grid coordinates

use crate::common::types::GridCoord;

/// `|ax - bx| + |ay - by|`, the true cost of 4-connected movement
pub fn manhattan(a: GridCoord, b: GridCoord) -> usize {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// Straight-line distance between cell indices
pub fn euclidean(a: GridCoord, b: GridCoord) -> f64 {
    let dx = a.x.abs_diff(b.x) as f64;
    let dy = a.y.abs_diff(b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(GridCoord::new(0, 0), GridCoord::new(4, 4)), 8);
        assert_eq!(manhattan(GridCoord::new(3, 1), GridCoord::new(1, 3)), 4);
        assert_eq!(manhattan(GridCoord::new(2, 2), GridCoord::new(2, 2)), 0);
    }

    #[test]
    fn test_euclidean() {
        let d = euclidean(GridCoord::new(0, 0), GridCoord::new(3, 4));
        assert!((d - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_euclidean_never_exceeds_manhattan() {
        for x in 0..6 {
            for y in 0..6 {
                let a = GridCoord::new(2, 3);
                let b = GridCoord::new(x, y);
                assert!(euclidean(a, b) <= manhattan(a, b) as f64 + 1e-12);
            }
        }
    }
}
