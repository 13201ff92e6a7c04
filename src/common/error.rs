//! Error types for grid_path_planning

use thiserror::Error;

use crate::common::types::GridCoord;

/// Reason a planning request was rejected before any search work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("start cell is not set")]
    MissingStart,
    #[error("goal cell is not set")]
    MissingGoal,
    #[error("start cell {0} is outside the grid")]
    StartOutOfBounds(GridCoord),
    #[error("goal cell {0} is outside the grid")]
    GoalOutOfBounds(GridCoord),
    #[error("start cell {0} is an obstacle")]
    StartBlocked(GridCoord),
    #[error("goal cell {0} is an obstacle")]
    GoalBlocked(GridCoord),
}

impl InputError {
    pub fn concerns_goal(&self) -> bool {
        matches!(
            self,
            InputError::MissingGoal | InputError::GoalOutOfBounds(_) | InputError::GoalBlocked(_)
        )
    }
}

/// Main error type for grid planning
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanningError {
    /// Start or goal missing, out of range or blocked
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),
    /// Search exhausted without connecting start to goal
    #[error("No path found: {0}")]
    NotFound(String),
    /// Map construction or edit rejected
    #[error("Invalid map: {0}")]
    InvalidMap(String),
    /// Invalid configuration value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl PlanningError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlanningError::NotFound(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, PlanningError::InvalidInput(_))
    }

    /// The goal was unset, outside the grid or blocked
    pub fn is_invalid_goal(&self) -> bool {
        matches!(self, PlanningError::InvalidInput(e) if e.concerns_goal())
    }
}

/// Result type alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanningError::NotFound("search space exhausted".to_string());
        assert_eq!(format!("{}", err), "No path found: search space exhausted");

        let err: PlanningError = InputError::GoalOutOfBounds(GridCoord::new(7, 2)).into();
        assert_eq!(format!("{}", err), "Invalid input: goal cell (7, 2) is outside the grid");
    }

    #[test]
    fn test_invalid_goal_classification() {
        let err: PlanningError = InputError::MissingGoal.into();
        assert!(err.is_invalid_goal());
        assert!(err.is_invalid_input());

        let err: PlanningError = InputError::MissingStart.into();
        assert!(!err.is_invalid_goal());
        assert!(!PlanningError::NotFound(String::new()).is_invalid_goal());
    }
}
