//! grid_path_planning - route planning on discrete occupancy grids
//!
//! This crate compares three planners on the same 4-connected grid:
//! Dijkstra, A*, and a grid-restricted RRT, together with the occupancy
//! grid, distance metrics, line-of-sight check, and path reconstruction
//! they share.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{CellState, GridCoord, GridPath, TreeEdge};
pub use common::{GridPlanner, InputError, PlanningError, PlanningResult};
pub use utils::{EditOutcome, GridMap, GridMapConfig};
pub use path_planning::{AStarPlanner, DijkstraPlanner, PlanCache, RRTPlanner};
