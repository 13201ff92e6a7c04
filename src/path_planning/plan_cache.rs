//! Plan caching between map edits
//!
//! A planning result stays valid until the map, start, or goal changes.
//! Front ends that redraw every frame ask the cache instead of replanning.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::debug;

use crate::common::{GridCoord, GridPath, GridPlanner, PlanningResult};
use crate::utils::GridMap;

/// Everything a planning result depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlanKey {
    revision: u64,
    width: usize,
    height: usize,
    start: Option<GridCoord>,
    goal: Option<GridCoord>,
}

impl PlanKey {
    fn of(map: &GridMap) -> Self {
        Self {
            revision: map.revision(),
            width: map.width(),
            height: map.height(),
            start: map.start(),
            goal: map.goal(),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedPlan {
    key: PlanKey,
    result: PlanningResult<GridPath>,
}

/// Last result per planner for a single edited map
#[derive(Debug, Clone, Default)]
pub struct PlanCache {
    entries: HashMap<&'static str, CachedPlan>,
    hits: usize,
    misses: usize,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached result for `planner`, replanning only if the map
    /// revision, dimensions, start, or goal changed since it was stored.
    /// Failures are cached like successes.
    pub fn get_or_plan<P>(&mut self, planner: &P, map: &GridMap) -> &PlanningResult<GridPath>
    where
        P: GridPlanner + ?Sized,
    {
        let key = PlanKey::of(map);
        let name = planner.name();
        match self.entries.entry(name) {
            Entry::Occupied(occupied) if occupied.get().key == key => {
                self.hits += 1;
                &occupied.into_mut().result
            }
            entry => {
                self.misses += 1;
                debug!("plan cache miss for {} at map revision {}", name, key.revision);
                let plan = CachedPlan {
                    key,
                    result: planner.plan_on_map(map),
                };
                let slot = match entry {
                    Entry::Occupied(mut occupied) => {
                        occupied.insert(plan);
                        occupied.into_mut()
                    }
                    Entry::Vacant(vacant) => vacant.insert(plan),
                };
                &slot.result
            }
        }
    }

    /// Cached result without planning, `None` if absent or stale
    pub fn peek(&self, planner_name: &str, map: &GridMap) -> Option<&PlanningResult<GridPath>> {
        let key = PlanKey::of(map);
        self.entries
            .get(planner_name)
            .filter(|entry| entry.key == key)
            .map(|entry| &entry.result)
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::path_planning::{AStarPlanner, DijkstraPlanner};

    // Counts how often the cache actually plans
    struct CountingPlanner {
        calls: Cell<usize>,
    }

    impl GridPlanner for CountingPlanner {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn plan(&self, map: &GridMap, start: GridCoord, goal: GridCoord) -> PlanningResult<GridPath> {
            self.calls.set(self.calls.get() + 1);
            DijkstraPlanner::new().plan(map, start, goal)
        }
    }

    #[test]
    fn test_cache_reuses_until_edit() {
        let mut map = GridMap::from_ascii(&["S...", "....", "...G"]).unwrap();
        let planner = CountingPlanner { calls: Cell::new(0) };
        let mut cache = PlanCache::new();

        for _ in 0..10 {
            let result = cache.get_or_plan(&planner, &map);
            assert_eq!(result.as_ref().map(|p| p.cost()).ok(), Some(5));
        }
        assert_eq!(planner.calls.get(), 1);
        assert_eq!(cache.hits(), 9);

        map.set_obstacle(GridCoord::new(1, 0)).unwrap();
        cache.get_or_plan(&planner, &map);
        assert_eq!(planner.calls.get(), 2);

        map.set_goal(GridCoord::new(3, 0)).unwrap();
        assert!(cache.peek("counting", &map).is_none());
        cache.get_or_plan(&planner, &map);
        assert_eq!(planner.calls.get(), 3);
        assert_eq!(cache.misses(), 3);
    }

    #[test]
    fn test_cache_keeps_planners_apart() {
        let map = GridMap::from_ascii(&["S.#", "...", "#.G"]).unwrap();
        let mut cache = PlanCache::new();

        let dijkstra = cache.get_or_plan(&DijkstraPlanner::new(), &map).clone();
        let a_star = cache.get_or_plan(&AStarPlanner::default(), &map).clone();
        assert_eq!(dijkstra.unwrap().cost(), a_star.unwrap().cost());
        assert!(cache.peek("dijkstra", &map).is_some());
        assert!(cache.peek("a_star", &map).is_some());

        cache.invalidate();
        assert!(cache.peek("dijkstra", &map).is_none());
    }

    #[test]
    fn test_cache_replans_for_a_different_map() {
        let open = GridMap::from_ascii(&["S..", "...", "..G"]).unwrap();
        let walled = GridMap::from_ascii(&["S..", "###", "..G"]).unwrap();
        let planner = DijkstraPlanner::new();
        let mut cache = PlanCache::new();

        assert!(cache.get_or_plan(&planner, &open).is_ok());
        assert!(cache.peek("dijkstra", &walled).is_none());

        let err = cache.get_or_plan(&planner, &walled).as_ref().unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_cache_stores_failures() {
        let mut map = GridMap::from_ascii(&["S..", "...", "..."]).unwrap();
        let mut cache = PlanCache::new();

        assert!(cache
            .get_or_plan(&DijkstraPlanner::new(), &map)
            .as_ref()
            .unwrap_err()
            .is_invalid_goal());

        map.apply_click(GridCoord::new(2, 2)).unwrap();
        assert!(cache.get_or_plan(&DijkstraPlanner::new(), &map).is_ok());
    }
}
