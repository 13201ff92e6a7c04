//! Dijkstra path planning on a 4-connected occupancy grid
//!
//! Uniform-cost search with a lazy-deletion priority queue. Entries are
//! never removed when a cell improves; a better entry is pushed instead and
//! the stale one is skipped when it surfaces.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use log::{debug, warn};
use nalgebra::DMatrix;

use crate::common::{check_endpoints, manhattan, GridCoord, GridPath, GridPlanner, PlanningError, PlanningResult};
use crate::path_planning::path_reconstruction::reconstruct_path;
use crate::utils::GridMap;

/// Counters collected during one graph search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Cells whose neighbors were relaxed
    pub expanded: usize,
    /// Entries pushed onto the open set, start included
    pub pushed: usize,
    /// Popped entries skipped because a better one was already recorded
    pub stale: usize,
}

/// Dijkstra path planner
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraPlanner;

impl DijkstraPlanner {
    pub fn new() -> Self {
        DijkstraPlanner
    }

    /// Plan and also return search counters
    pub fn plan_with_stats(
        &self,
        map: &GridMap,
        start: GridCoord,
        goal: GridCoord,
    ) -> PlanningResult<(GridPath, SearchStats)> {
        check_endpoints(map, start, goal)?;

        let mut stats = SearchStats::default();
        if start == goal {
            return Ok((GridPath::from_cells(vec![start]), stats));
        }

        let mut distances = DMatrix::from_element(map.height(), map.width(), usize::MAX);
        let mut predecessors: HashMap<GridCoord, GridCoord> = HashMap::new();
        // Min-heap on (distance, cell); equal distances pop in coordinate order
        let mut open_set = BinaryHeap::new();

        distances[start.matrix_index()] = 0;
        open_set.push(Reverse((0usize, start)));
        stats.pushed += 1;

        let mut reached = false;
        while let Some(Reverse((distance, current))) = open_set.pop() {
            if distance > distances[current.matrix_index()] {
                stats.stale += 1;
                continue;
            }
            if current == goal {
                reached = true;
                break;
            }
            stats.expanded += 1;

            for neighbor in map.neighbors4(current) {
                if map.is_obstacle(neighbor) {
                    continue;
                }
                let tentative = distance + manhattan(current, neighbor);
                if tentative < distances[neighbor.matrix_index()] {
                    distances[neighbor.matrix_index()] = tentative;
                    predecessors.insert(neighbor, current);
                    open_set.push(Reverse((tentative, neighbor)));
                    stats.pushed += 1;
                }
            }
        }

        debug!(
            "dijkstra {} -> {}: expanded {}, pushed {}, stale {}",
            start, goal, stats.expanded, stats.pushed, stats.stale
        );

        if !reached {
            warn!("dijkstra: goal {} unreachable from {}", goal, start);
            return Err(PlanningError::NotFound(format!(
                "Dijkstra: open set exhausted after expanding {} cells",
                stats.expanded
            )));
        }

        let path = reconstruct_path(&predecessors, start, goal)?;
        Ok((path, stats))
    }
}

impl GridPlanner for DijkstraPlanner {
    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn plan(&self, map: &GridMap, start: GridCoord, goal: GridCoord) -> PlanningResult<GridPath> {
        self.plan_with_stats(map, start, goal).map(|(path, _)| path)
    }
}
