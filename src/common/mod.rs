//! Common types, metrics, traits, and error definitions for grid_path_planning
//!
//! This module provides the foundational building blocks shared by
//! every planner in this crate.

pub mod types;
pub mod distance;
pub mod traits;
pub mod error;

pub use types::*;
pub use distance::*;
pub use traits::*;
pub use error::*;
