//! Utility modules for grid_path_planning

pub mod grid_map;
pub mod collision;
pub mod logger;

pub use grid_map::*;
pub use collision::{line_cells, segment_free, CollisionChecker, LineCells};
