//! RRT (Rapidly-exploring Random Tree) path planning on a grid
//!
//! Grid-restricted variant: each growth step moves exactly one cell along
//! the dominant axis toward a uniformly sampled cell. A cell joins the tree
//! at most once, so every node has a single parent and the edge list can be
//! walked backward to recover the path.

use std::collections::HashSet;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::{
    check_endpoints, euclidean, GridCoord, GridPath, GridPlanner, PlanningError, PlanningResult,
    TreeEdge,
};
use crate::path_planning::path_reconstruction::reconstruct_path;
use crate::utils::{CollisionChecker, GridMap};

/// Cells moved per growth step
pub const STEP_SIZE: isize = 1;

/// Configuration for RRT planner
#[derive(Debug, Clone)]
pub struct RRTConfig {
    /// Maximum sampling iterations; rejected samples count too
    pub max_iter: usize,
    /// Euclidean distance at which a new node connects to the goal,
    /// within [0, 1] so the closing edge is a single step
    pub goal_radius: f64,
    /// Seed for reproducible runs, `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for RRTConfig {
    fn default() -> Self {
        Self {
            max_iter: 5000,
            goal_radius: 1.0,
            seed: None,
        }
    }
}

impl RRTConfig {
    pub fn validate(&self) -> PlanningResult<()> {
        if !(0.0..=STEP_SIZE as f64).contains(&self.goal_radius) {
            return Err(PlanningError::InvalidParameter(format!(
                "goal radius must be within [0, {}], got {}",
                STEP_SIZE, self.goal_radius
            )));
        }
        Ok(())
    }
}

/// Tree grown by one RRT run, rooted at the start
#[derive(Debug, Clone, Default)]
pub struct RrtTree {
    nodes: Vec<GridCoord>,
    edges: Vec<TreeEdge>,
    members: HashSet<GridCoord>,
}

impl RrtTree {
    fn new(root: GridCoord) -> Self {
        Self {
            nodes: vec![root],
            edges: Vec::new(),
            members: HashSet::from([root]),
        }
    }

    /// Nodes in insertion order, root first
    pub fn nodes(&self) -> &[GridCoord] {
        &self.nodes
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[TreeEdge] {
        &self.edges
    }

    pub fn contains(&self, cell: GridCoord) -> bool {
        self.members.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn add(&mut self, parent: GridCoord, child: GridCoord) {
        self.nodes.push(child);
        self.edges.push(TreeEdge::new(parent, child));
        self.members.insert(child);
    }

    /// Linear scan; ties keep the earliest inserted node
    fn nearest(&self, sample: GridCoord) -> GridCoord {
        let mut nearest = self.nodes[0];
        let mut min_dist = euclidean(nearest, sample);
        for &node in &self.nodes[1..] {
            let dist = euclidean(node, sample);
            if dist < min_dist {
                min_dist = dist;
                nearest = node;
            }
        }
        nearest
    }
}

/// Outcome of one RRT run
#[derive(Debug, Clone)]
pub struct RrtSearch {
    pub tree: RrtTree,
    /// Path to the goal if it was captured
    pub path: Option<GridPath>,
    /// Sampling iterations consumed
    pub iterations: usize,
}

impl RrtSearch {
    pub fn into_path(self) -> PlanningResult<GridPath> {
        let iterations = self.iterations;
        let nodes = self.tree.len();
        self.path.ok_or_else(|| {
            PlanningError::NotFound(format!(
                "RRT: goal not reached within {} iterations ({} tree nodes)",
                iterations, nodes
            ))
        })
    }
}

/// RRT path planner
#[derive(Debug, Clone, Default)]
pub struct RRTPlanner {
    config: RRTConfig,
}

impl RRTPlanner {
    pub fn new(config: RRTConfig) -> Self {
        RRTPlanner { config }
    }

    pub fn config(&self) -> &RRTConfig {
        &self.config
    }

    /// Grow a tree from `start` until the goal is captured or the
    /// iteration budget runs out. Only invalid input is an error here;
    /// an exhausted budget shows up as `path == None`.
    pub fn explore<R: Rng + ?Sized>(
        &self,
        map: &GridMap,
        start: GridCoord,
        goal: GridCoord,
        rng: &mut R,
    ) -> PlanningResult<RrtSearch> {
        self.config.validate()?;
        check_endpoints(map, start, goal)?;

        let mut tree = RrtTree::new(start);
        if start == goal {
            return Ok(RrtSearch {
                tree,
                path: Some(GridPath::from_cells(vec![start])),
                iterations: 0,
            });
        }

        let checker = CollisionChecker::new(map);
        let mut rejected = 0usize;

        for iteration in 1..=self.config.max_iter {
            let sample = self.get_random_cell(map, rng);
            let nearest = tree.nearest(sample);

            let candidate = match self.steer(map, nearest, sample) {
                Some(cell) if !tree.contains(cell) => cell,
                _ => {
                    rejected += 1;
                    continue;
                }
            };
            if !checker.segment_free(nearest, candidate) {
                rejected += 1;
                continue;
            }
            tree.add(nearest, candidate);

            if euclidean(candidate, goal) <= self.config.goal_radius {
                if candidate != goal {
                    if !checker.segment_free(candidate, goal) {
                        continue;
                    }
                    tree.add(candidate, goal);
                }
                debug!(
                    "rrt {} -> {}: goal captured after {} iterations, {} nodes, {} rejected",
                    start,
                    goal,
                    iteration,
                    tree.len(),
                    rejected
                );
                let path = reconstruct_path(tree.edges(), start, goal)?;
                return Ok(RrtSearch {
                    tree,
                    path: Some(path),
                    iterations: iteration,
                });
            }
        }

        warn!(
            "rrt {} -> {}: budget of {} iterations exhausted with {} nodes",
            start,
            goal,
            self.config.max_iter,
            tree.len()
        );
        Ok(RrtSearch {
            tree,
            path: None,
            iterations: self.config.max_iter,
        })
    }

    fn get_random_cell<R: Rng + ?Sized>(&self, map: &GridMap, rng: &mut R) -> GridCoord {
        GridCoord::new(rng.gen_range(0..map.width()), rng.gen_range(0..map.height()))
    }

    /// One step from `from` toward `sample` along the axis with the larger
    /// offset; equal offsets step along y. A zero offset steps positive.
    fn steer(&self, map: &GridMap, from: GridCoord, sample: GridCoord) -> Option<GridCoord> {
        let dx = sample.x as isize - from.x as isize;
        let dy = sample.y as isize - from.y as isize;
        let direction = |d: isize| if d < 0 { -STEP_SIZE } else { STEP_SIZE };

        let next = if dx.abs() > dy.abs() {
            from.offset(direction(dx), 0)
        } else {
            from.offset(0, direction(dy))
        };
        next.filter(|cell| map.in_bounds(*cell))
    }
}

impl GridPlanner for RRTPlanner {
    fn name(&self) -> &'static str {
        "rrt"
    }

    fn plan(&self, map: &GridMap, start: GridCoord, goal: GridCoord) -> PlanningResult<GridPath> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.explore(map, start, goal, &mut rng)?.into_path()
    }
}
