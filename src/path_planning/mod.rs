// Path Planning algorithms module

pub mod path_reconstruction;
pub mod dijkstra;
pub mod a_star;
pub mod rrt;
pub mod plan_cache;

pub use path_reconstruction::*;
pub use dijkstra::*;
pub use a_star::*;
pub use rrt::*;
pub use plan_cache::*;
