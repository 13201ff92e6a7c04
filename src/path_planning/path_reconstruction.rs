//! Path reconstruction from a predecessor relation
//!
//! Every planner records where each cell was reached from. Walking that
//! relation backward from the goal and reversing yields the path. A chain
//! that stops short of the start, or loops, is reported as `NotFound`
//! instead of returning a partial path.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::BuildHasher;

use crate::common::{GridCoord, GridPath, PlanningError, PlanningResult, TreeEdge};

/// Child -> parent lookup produced by a search
pub trait PredecessorMap {
    fn predecessor(&self, cell: GridCoord) -> Option<GridCoord>;
}

impl<S: BuildHasher> PredecessorMap for HashMap<GridCoord, GridCoord, S> {
    fn predecessor(&self, cell: GridCoord) -> Option<GridCoord> {
        self.get(&cell).copied()
    }
}

impl PredecessorMap for BTreeMap<GridCoord, GridCoord> {
    fn predecessor(&self, cell: GridCoord) -> Option<GridCoord> {
        self.get(&cell).copied()
    }
}

/// Edge lists are scanned linearly for the edge whose child is `cell`.
/// Only meaningful when each cell appears as a child at most once.
impl PredecessorMap for [TreeEdge] {
    fn predecessor(&self, cell: GridCoord) -> Option<GridCoord> {
        self.iter().find(|edge| edge.child == cell).map(|edge| edge.parent)
    }
}

/// Follow predecessors from `goal` back to `start` and return the path in
/// start-to-goal order. `start == goal` yields the single-cell path.
pub fn reconstruct_path<P>(predecessors: &P, start: GridCoord, goal: GridCoord) -> PlanningResult<GridPath>
where
    P: PredecessorMap + ?Sized,
{
    let mut cells = vec![goal];
    let mut visited = HashSet::from([goal]);
    let mut current = goal;

    while current != start {
        let parent = predecessors.predecessor(current).ok_or_else(|| {
            PlanningError::NotFound(format!(
                "predecessor chain from {} breaks at {} before reaching {}",
                goal, current, start
            ))
        })?;
        if !visited.insert(parent) {
            return Err(PlanningError::NotFound(format!(
                "predecessor chain from {} loops at {}",
                goal, parent
            )));
        }
        cells.push(parent);
        current = parent;
    }

    cells.reverse();
    Ok(GridPath::from_cells(cells))
}
