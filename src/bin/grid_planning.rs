// Grid planning comparison
// Generates a random occupancy grid and runs Dijkstra, A* and RRT on it.

use std::time::Instant;

use log::{error, info, LevelFilter};

use grid_path_planning::path_planning::{AStarPlanner, DijkstraPlanner, PlanCache, RRTConfig, RRTPlanner};
use grid_path_planning::utils::logger;
use grid_path_planning::{GridMap, GridMapConfig, GridPlanner};

const MAP_WIDTH: usize = 20;
const MAP_HEIGHT: usize = 20;
const OBSTACLE_PROBABILITY: f64 = 0.1;
const SEED: Option<u64> = Some(2024);

fn main() {
    if let Err(e) = logger::init_with_level(LevelFilter::Info) {
        eprintln!("logger init failed: {}", e);
    }
    info!("grid planning start!!");

    let config = GridMapConfig {
        width: MAP_WIDTH,
        height: MAP_HEIGHT,
        obstacle_probability: OBSTACLE_PROBABILITY,
        start: Some((0, 0).into()),
        goal: Some((MAP_WIDTH - 1, MAP_HEIGHT - 1).into()),
        seed: SEED,
    };
    let map = match GridMap::generate(&config) {
        Ok(map) => map,
        Err(e) => {
            error!("map generation failed: {}", e);
            return;
        }
    };
    info!(
        "{}x{} map with {} obstacles",
        map.width(),
        map.height(),
        map.obstacle_count()
    );

    let dijkstra = DijkstraPlanner::new();
    let a_star = AStarPlanner::default();
    let rrt = RRTPlanner::new(RRTConfig {
        seed: SEED,
        ..Default::default()
    });
    let planners: [(&dyn GridPlanner, char); 3] = [(&dijkstra, 'd'), (&a_star, 'a'), (&rrt, 'r')];

    let mut cache = PlanCache::new();
    for (planner, mark) in planners {
        let started = Instant::now();
        match cache.get_or_plan(planner, &map) {
            Ok(path) => {
                info!(
                    "{:>8}: cost {}, {} cells, {:.3} ms",
                    planner.name(),
                    path.cost(),
                    path.len(),
                    started.elapsed().as_secs_f64() * 1e3
                );
                println!("{} ({})\n{}\n", planner.name(), mark, map.render_path(path, mark));
            }
            Err(e) => info!("{:>8}: {}", planner.name(), e),
        }
    }

    // A redraw loop would hit the cache from here on
    for (planner, _) in planners {
        match cache.get_or_plan(planner, &map) {
            Ok(path) => info!("{:>8}: cached cost {}", planner.name(), path.cost()),
            Err(e) => info!("{:>8}: cached {}", planner.name(), e),
        }
    }
    info!("cache hits {}, misses {}", cache.hits(), cache.misses());

    info!("grid planning finish!!");
}
