//! A* path planning on a 4-connected occupancy grid
//!
//! Same open-set skeleton as Dijkstra, ordered by f = g + h. The
//! best-known record per cell holds the f value; since h is fixed per cell,
//! comparing f is equivalent to comparing g.
//!
//! Assumes 4-connected moves with unit (Manhattan) cost. Both Euclidean and
//! Manhattan heuristics are admissible and consistent under that model; a
//! diagonal motion model would need a different heuristic check.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use log::{debug, warn};
use nalgebra::DMatrix;
use ordered_float::NotNan;

use crate::common::{
    check_endpoints, euclidean, manhattan, GridCoord, GridPath, GridPlanner, PlanningError,
    PlanningResult,
};
use crate::path_planning::dijkstra::SearchStats;
use crate::path_planning::path_reconstruction::reconstruct_path;
use crate::utils::GridMap;

/// Distance estimate to the goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    #[default]
    Euclidean,
    Manhattan,
}

impl Heuristic {
    pub fn estimate(self, from: GridCoord, goal: GridCoord) -> f64 {
        match self {
            Heuristic::Euclidean => euclidean(from, goal),
            Heuristic::Manhattan => manhattan(from, goal) as f64,
        }
    }
}

/// Configuration for A* planner
#[derive(Debug, Clone)]
pub struct AStarConfig {
    pub heuristic: Heuristic,
    /// Heuristic weight (1.0 = optimal, >1.0 = faster but suboptimal)
    pub heuristic_weight: f64,
}

impl Default for AStarConfig {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::Euclidean,
            heuristic_weight: 1.0,
        }
    }
}

impl AStarConfig {
    pub fn validate(&self) -> PlanningResult<()> {
        if !self.heuristic_weight.is_finite() || self.heuristic_weight < 0.0 {
            return Err(PlanningError::InvalidParameter(format!(
                "heuristic weight must be finite and non-negative, got {}",
                self.heuristic_weight
            )));
        }
        Ok(())
    }
}

/// A* path planner
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner {
    config: AStarConfig,
}

impl AStarPlanner {
    pub fn new(config: AStarConfig) -> Self {
        AStarPlanner { config }
    }

    pub fn config(&self) -> &AStarConfig {
        &self.config
    }

    /// Plan and also return search counters
    pub fn plan_with_stats(
        &self,
        map: &GridMap,
        start: GridCoord,
        goal: GridCoord,
    ) -> PlanningResult<(GridPath, SearchStats)> {
        self.config.validate()?;
        check_endpoints(map, start, goal)?;

        let mut stats = SearchStats::default();
        if start == goal {
            return Ok((GridPath::from_cells(vec![start]), stats));
        }

        let mut best_f = DMatrix::from_element(map.height(), map.width(), f64::INFINITY);
        let mut g_cost = DMatrix::from_element(map.height(), map.width(), usize::MAX);
        let mut predecessors: HashMap<GridCoord, GridCoord> = HashMap::new();
        // Min-heap on (f, cell); equal f values pop in coordinate order
        let mut open_set = BinaryHeap::new();

        let start_f = self.calc_heuristic(start, goal);
        best_f[start.matrix_index()] = start_f;
        g_cost[start.matrix_index()] = 0;
        open_set.push(Reverse((self.priority(start_f)?, start)));
        stats.pushed += 1;

        let mut reached = false;
        while let Some(Reverse((f, current))) = open_set.pop() {
            if f.into_inner() > best_f[current.matrix_index()] {
                stats.stale += 1;
                continue;
            }
            if current == goal {
                reached = true;
                break;
            }
            stats.expanded += 1;

            let g = g_cost[current.matrix_index()];
            for neighbor in map.neighbors4(current) {
                if map.is_obstacle(neighbor) {
                    continue;
                }
                let tentative_g = g + manhattan(current, neighbor);
                let tentative_f = tentative_g as f64 + self.calc_heuristic(neighbor, goal);
                if tentative_f < best_f[neighbor.matrix_index()] {
                    best_f[neighbor.matrix_index()] = tentative_f;
                    g_cost[neighbor.matrix_index()] = tentative_g;
                    predecessors.insert(neighbor, current);
                    open_set.push(Reverse((self.priority(tentative_f)?, neighbor)));
                    stats.pushed += 1;
                }
            }
        }

        debug!(
            "a_star {} -> {}: expanded {}, pushed {}, stale {}",
            start, goal, stats.expanded, stats.pushed, stats.stale
        );

        if !reached {
            warn!("a_star: goal {} unreachable from {}", goal, start);
            return Err(PlanningError::NotFound(format!(
                "A*: open set exhausted after expanding {} cells",
                stats.expanded
            )));
        }

        let path = reconstruct_path(&predecessors, start, goal)?;
        Ok((path, stats))
    }

    fn calc_heuristic(&self, cell: GridCoord, goal: GridCoord) -> f64 {
        self.config.heuristic_weight * self.config.heuristic.estimate(cell, goal)
    }

    fn priority(&self, f: f64) -> PlanningResult<NotNan<f64>> {
        NotNan::new(f).map_err(|_| PlanningError::InvalidParameter("A* priority is NaN".to_string()))
    }
}

impl GridPlanner for AStarPlanner {
    fn name(&self) -> &'static str {
        "a_star"
    }

    fn plan(&self, map: &GridMap, start: GridCoord, goal: GridCoord) -> PlanningResult<GridPath> {
        self.plan_with_stats(map, start, goal).map(|(path, _)| path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::InputError;
    use crate::path_planning::dijkstra::DijkstraPlanner;
    use crate::utils::GridMapConfig;

    fn c(x: usize, y: usize) -> GridCoord {
        GridCoord::new(x, y)
    }

    #[test]
    fn test_a_star_open_grid_cost() {
        let map = GridMap::new(5, 5).unwrap();
        let path = AStarPlanner::default().plan(&map, c(0, 0), c(4, 4)).unwrap();
        assert_eq!(path.cost(), 8);
        assert_eq!(path.len(), 9);
        assert!(path.is_four_connected());
        assert_eq!(path.start(), Some(c(0, 0)));
        assert_eq!(path.goal(), Some(c(4, 4)));
    }

    #[test]
    fn test_a_star_uses_only_gap() {
        let map = GridMap::from_ascii(&["S..", "#.#", "..G"]).unwrap();
        let path = AStarPlanner::default().plan_on_map(&map).unwrap();
        assert!(path.contains(c(1, 1)));
        assert_eq!(path.cost(), 4);
    }

    #[test]
    fn test_a_star_agrees_with_dijkstra_on_random_maps() {
        let dijkstra = DijkstraPlanner::new();
        let euclidean = AStarPlanner::default();
        let manhattan = AStarPlanner::new(AStarConfig {
            heuristic: Heuristic::Manhattan,
            ..Default::default()
        });

        for seed in 0..30 {
            let config = GridMapConfig {
                width: 12,
                height: 9,
                obstacle_probability: 0.3,
                start: Some(c(0, 0)),
                goal: Some(c(11, 8)),
                seed: Some(seed),
            };
            let map = GridMap::generate(&config).unwrap();
            let expected = dijkstra.plan_on_map(&map).map(|p| p.cost());

            for planner in [&euclidean, &manhattan] {
                let actual = planner.plan_on_map(&map);
                match (&expected, &actual) {
                    (Ok(cost), Ok(path)) => {
                        assert_eq!(*cost, path.cost(), "seed {}", seed);
                        assert!(path.is_four_connected());
                        assert!(path.iter().all(|cell| map.is_traversable(*cell)));
                    }
                    (Err(_), Err(err)) => assert!(err.is_not_found(), "seed {}", seed),
                    _ => panic!("seed {}: dijkstra {:?} vs a_star {:?}", seed, expected, actual),
                }
            }
        }
    }

    #[test]
    fn test_a_star_expands_fewer_cells_than_dijkstra() {
        let map = GridMap::new(15, 15).unwrap();
        let (_, dijkstra_stats) = DijkstraPlanner::new()
            .plan_with_stats(&map, c(0, 7), c(14, 7))
            .unwrap();
        let (path, a_star_stats) = AStarPlanner::default()
            .plan_with_stats(&map, c(0, 7), c(14, 7))
            .unwrap();
        assert_eq!(path.cost(), 14);
        assert!(a_star_stats.expanded < dijkstra_stats.expanded);
    }

    #[test]
    fn test_a_star_is_idempotent() {
        let map = GridMap::from_ascii(&[
            "S.#.......",
            "..#.####..",
            "..#....#..",
            "..####.#..",
            "........#G",
        ])
        .unwrap();
        let planner = AStarPlanner::default();
        let first = planner.plan_on_map(&map).unwrap();
        assert_eq!(first.cost(), 27);
        assert_eq!(DijkstraPlanner::new().plan_on_map(&map).unwrap().cost(), 27);
        for _ in 0..5 {
            assert_eq!(planner.plan_on_map(&map).unwrap().cost(), first.cost());
        }
    }

    #[test]
    fn test_a_star_missing_goal_fails_fast() {
        let map = GridMap::from_ascii(&["S..", "...", "..."]).unwrap();
        let err = AStarPlanner::default().plan_on_map(&map).unwrap_err();
        assert_eq!(err, PlanningError::InvalidInput(InputError::MissingGoal));
        assert!(err.is_invalid_goal());

        let err = AStarPlanner::default().plan(&map, c(0, 0), c(0, 3)).unwrap_err();
        assert!(err.is_invalid_goal());
    }

    #[test]
    fn test_a_star_enclosed_goal_not_found() {
        let map = GridMap::from_ascii(&["S.#.", "..#G", "..##"]).unwrap();
        let err = AStarPlanner::default().plan_on_map(&map).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_a_star_start_equals_goal() {
        let map = GridMap::new(3, 3).unwrap();
        let path = AStarPlanner::default().plan(&map, c(1, 1), c(1, 1)).unwrap();
        assert_eq!(path.cells(), &[c(1, 1)]);
    }

    #[test]
    fn test_a_star_rejects_bad_weight() {
        let map = GridMap::new(3, 3).unwrap();
        let planner = AStarPlanner::new(AStarConfig {
            heuristic_weight: f64::NAN,
            ..Default::default()
        });
        assert!(matches!(
            planner.plan(&map, c(0, 0), c(2, 2)),
            Err(PlanningError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_weighted_a_star_still_connects() {
        let map = GridMap::from_ascii(&[
            "S.#.......",
            "..#.####..",
            "..#....#..",
            "..####.#..",
            "........#G",
        ])
        .unwrap();
        let planner = AStarPlanner::new(AStarConfig {
            heuristic_weight: 3.0,
            ..Default::default()
        });
        let path = planner.plan_on_map(&map).unwrap();
        assert!(path.is_four_connected());
        assert_eq!(path.goal(), map.goal());
    }
}
