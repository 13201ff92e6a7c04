//! Common traits defining interfaces for grid planners

use crate::common::error::{InputError, PlanningResult};
use crate::common::types::{GridCoord, GridPath};
use crate::utils::GridMap;

/// Trait for planners that search an occupancy grid
pub trait GridPlanner {
    /// Short name used in logs and as a cache key
    fn name(&self) -> &'static str;

    /// Plan a path on `map` from `start` to `goal`.
    ///
    /// Returns `NotFound` when the goal cannot be connected and
    /// `InvalidInput` when either endpoint is outside the grid or blocked.
    /// The map is never modified.
    fn plan(&self, map: &GridMap, start: GridCoord, goal: GridCoord) -> PlanningResult<GridPath>;

    /// Plan with endpoints that may still be unset
    fn plan_request(
        &self,
        map: &GridMap,
        start: Option<GridCoord>,
        goal: Option<GridCoord>,
    ) -> PlanningResult<GridPath> {
        let start = start.ok_or(InputError::MissingStart)?;
        let goal = goal.ok_or(InputError::MissingGoal)?;
        self.plan(map, start, goal)
    }

    /// Plan between the map's own Start and Goal cells
    fn plan_on_map(&self, map: &GridMap) -> PlanningResult<GridPath> {
        self.plan_request(map, map.start(), map.goal())
    }
}

/// Reject endpoints outside the grid or on obstacles
pub fn check_endpoints(map: &GridMap, start: GridCoord, goal: GridCoord) -> PlanningResult<()> {
    if !map.in_bounds(start) {
        return Err(InputError::StartOutOfBounds(start).into());
    }
    if !map.in_bounds(goal) {
        return Err(InputError::GoalOutOfBounds(goal).into());
    }
    if map.is_obstacle(start) {
        return Err(InputError::StartBlocked(start).into());
    }
    if map.is_obstacle(goal) {
        return Err(InputError::GoalBlocked(goal).into());
    }
    Ok(())
}
