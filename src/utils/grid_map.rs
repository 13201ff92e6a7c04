// Occupancy grid shared by all planners
// Cells are stored in a (row, column) matrix; coordinates are (column, row).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use itertools::iproduct;
use log::debug;
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Bernoulli, Distribution};

use crate::common::{CellState, GridCoord, GridPath, PlanningError, PlanningResult};

/// Neighbor offsets in the fixed expansion order: east, west, south, north.
/// Planners inherit their tie-breaking from this order.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

// Process-wide source of map revisions
static NEXT_REVISION: AtomicU64 = AtomicU64::new(0);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// Configuration for random map generation
#[derive(Debug, Clone)]
pub struct GridMapConfig {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// Independent probability of each non-endpoint cell being an obstacle
    pub obstacle_probability: f64,
    pub start: Option<GridCoord>,
    pub goal: Option<GridCoord>,
    /// Seed for reproducible maps, `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for GridMapConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            obstacle_probability: 0.1,
            start: Some(GridCoord::new(0, 0)),
            goal: Some(GridCoord::new(19, 19)),
            seed: None,
        }
    }
}

/// Result of an interactive click on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    StartPlaced,
    GoalPlaced,
    GoalCleared,
    Unchanged,
}

/// Fixed-size occupancy grid with at most one Start and one Goal cell
///
/// Equality compares cells and endpoints only, not the revision.
#[derive(Debug, Clone)]
pub struct GridMap {
    cells: DMatrix<CellState>,
    start: Option<GridCoord>,
    goal: Option<GridCoord>,
    revision: u64,
}

impl GridMap {
    /// All-free grid without start or goal
    pub fn new(width: usize, height: usize) -> PlanningResult<Self> {
        if width == 0 || height == 0 {
            return Err(PlanningError::InvalidMap(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            cells: DMatrix::from_element(height, width, CellState::Free),
            start: None,
            goal: None,
            revision: next_revision(),
        })
    }

    /// Generate a map from `config`, seeded if `config.seed` is set
    pub fn generate(config: &GridMapConfig) -> PlanningResult<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::generate_with_rng(config, &mut rng)
    }

    /// Place the endpoints, then draw one Bernoulli sample per remaining cell
    pub fn generate_with_rng<R: Rng + ?Sized>(
        config: &GridMapConfig,
        rng: &mut R,
    ) -> PlanningResult<Self> {
        let p = config.obstacle_probability;
        let bernoulli = Bernoulli::new(p).map_err(|e| {
            PlanningError::InvalidParameter(format!("obstacle probability {}: {}", p, e))
        })?;

        let mut map = Self::new(config.width, config.height)?;
        if let Some(start) = config.start {
            map.set_start(start)?;
        }
        if let Some(goal) = config.goal {
            map.set_goal(goal)?;
        }

        for (y, x) in iproduct!(0..config.height, 0..config.width) {
            let index = GridCoord::new(x, y).matrix_index();
            if map.cells[index] == CellState::Free && bernoulli.sample(rng) {
                map.cells[index] = CellState::Obstacle;
            }
        }
        map.revision = next_revision();

        debug!(
            "generated {}x{} grid with {} obstacles (p = {})",
            map.width(),
            map.height(),
            map.obstacle_count(),
            p
        );
        Ok(map)
    }

    /// Parse rows of `.` (free), `#` (obstacle), `S` (start) and `G` (goal)
    pub fn from_ascii(rows: &[&str]) -> PlanningResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut map = Self::new(width, height)?;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(PlanningError::InvalidMap(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for (x, symbol) in row.chars().enumerate() {
                let cell = GridCoord::new(x, y);
                let state = CellState::from_symbol(symbol).ok_or_else(|| {
                    PlanningError::InvalidMap(format!("unknown cell symbol '{}' at {}", symbol, cell))
                })?;
                match state {
                    CellState::Free => {}
                    CellState::Obstacle => map.set_obstacle(cell)?,
                    CellState::Start => {
                        if let Some(existing) = map.start {
                            return Err(PlanningError::InvalidMap(format!(
                                "second start at {}, first at {}",
                                cell, existing
                            )));
                        }
                        map.set_start(cell)?;
                    }
                    CellState::Goal => {
                        if let Some(existing) = map.goal {
                            return Err(PlanningError::InvalidMap(format!(
                                "second goal at {}, first at {}",
                                cell, existing
                            )));
                        }
                        map.set_goal(cell)?;
                    }
                }
            }
        }
        Ok(map)
    }

    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// Underlying (row, column) storage
    pub fn cells(&self) -> &DMatrix<CellState> {
        &self.cells
    }

    pub fn start(&self) -> Option<GridCoord> {
        self.start
    }

    pub fn goal(&self) -> Option<GridCoord> {
        self.goal
    }

    /// Edit stamp, renewed by every edit that changes a cell.
    ///
    /// Stamps come from one process-wide counter, so two maps share a
    /// revision only when one is an unedited clone of the other.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn in_bounds(&self, cell: GridCoord) -> bool {
        cell.x < self.width() && cell.y < self.height()
    }

    pub fn state(&self, cell: GridCoord) -> Option<CellState> {
        if self.in_bounds(cell) {
            Some(self.cells[cell.matrix_index()])
        } else {
            None
        }
    }

    pub fn is_obstacle(&self, cell: GridCoord) -> bool {
        self.state(cell) == Some(CellState::Obstacle)
    }

    /// In bounds and not an obstacle
    pub fn is_traversable(&self, cell: GridCoord) -> bool {
        matches!(self.state(cell), Some(state) if !state.is_obstacle())
    }

    /// In-bounds 4-neighbors in east, west, south, north order.
    /// Obstacles are included; callers filter them.
    pub fn neighbors4(&self, cell: GridCoord) -> Vec<GridCoord> {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| cell.offset(dx, dy))
            .filter(|n| self.in_bounds(*n))
            .collect()
    }

    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|state| state.is_obstacle()).count()
    }

    /// All cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (GridCoord, CellState)> + '_ {
        iproduct!(0..self.height(), 0..self.width()).map(move |(y, x)| {
            let cell = GridCoord::new(x, y);
            (cell, self.cells[cell.matrix_index()])
        })
    }

    /// Move the start to `cell`; the previous start becomes free
    pub fn set_start(&mut self, cell: GridCoord) -> PlanningResult<()> {
        match self.checked_state(cell)? {
            CellState::Start => Ok(()),
            CellState::Obstacle => Err(PlanningError::InvalidMap(format!(
                "cannot place start on obstacle {}",
                cell
            ))),
            CellState::Goal => Err(PlanningError::InvalidMap(format!(
                "start and goal cannot share cell {}",
                cell
            ))),
            CellState::Free => {
                if let Some(old) = self.start.take() {
                    self.write(old, CellState::Free);
                }
                self.write(cell, CellState::Start);
                self.start = Some(cell);
                Ok(())
            }
        }
    }

    /// Move the goal to `cell`; the previous goal becomes free
    pub fn set_goal(&mut self, cell: GridCoord) -> PlanningResult<()> {
        match self.checked_state(cell)? {
            CellState::Goal => Ok(()),
            CellState::Obstacle => Err(PlanningError::InvalidMap(format!(
                "cannot place goal on obstacle {}",
                cell
            ))),
            CellState::Start => Err(PlanningError::InvalidMap(format!(
                "start and goal cannot share cell {}",
                cell
            ))),
            CellState::Free => {
                if let Some(old) = self.goal.take() {
                    self.write(old, CellState::Free);
                }
                self.write(cell, CellState::Goal);
                self.goal = Some(cell);
                Ok(())
            }
        }
    }

    pub fn clear_start(&mut self) {
        if let Some(old) = self.start.take() {
            self.write(old, CellState::Free);
        }
    }

    pub fn clear_goal(&mut self) {
        if let Some(old) = self.goal.take() {
            self.write(old, CellState::Free);
        }
    }

    pub fn set_obstacle(&mut self, cell: GridCoord) -> PlanningResult<()> {
        match self.checked_state(cell)? {
            CellState::Obstacle => Ok(()),
            CellState::Free => {
                self.write(cell, CellState::Obstacle);
                Ok(())
            }
            endpoint => Err(PlanningError::InvalidMap(format!(
                "cannot place obstacle on {:?} cell {}",
                endpoint, cell
            ))),
        }
    }

    pub fn clear_obstacle(&mut self, cell: GridCoord) -> PlanningResult<()> {
        if self.checked_state(cell)? == CellState::Obstacle {
            self.write(cell, CellState::Free);
        }
        Ok(())
    }

    /// Flip a free cell to obstacle or back; returns the new obstacle status
    pub fn toggle_obstacle(&mut self, cell: GridCoord) -> PlanningResult<bool> {
        if self.checked_state(cell)? == CellState::Obstacle {
            self.clear_obstacle(cell)?;
            Ok(false)
        } else {
            self.set_obstacle(cell)?;
            Ok(true)
        }
    }

    /// Mouse-style editing: clicking the goal removes it, clicking a
    /// non-obstacle cell places the start if unset, otherwise the goal if
    /// unset.
    pub fn apply_click(&mut self, cell: GridCoord) -> PlanningResult<EditOutcome> {
        let state = self.checked_state(cell)?;
        if self.goal == Some(cell) {
            self.clear_goal();
            return Ok(EditOutcome::GoalCleared);
        }
        if state == CellState::Obstacle {
            return Ok(EditOutcome::Unchanged);
        }
        if self.start.is_none() {
            self.set_start(cell)?;
            Ok(EditOutcome::StartPlaced)
        } else if self.goal.is_none() && state == CellState::Free {
            self.set_goal(cell)?;
            Ok(EditOutcome::GoalPlaced)
        } else {
            Ok(EditOutcome::Unchanged)
        }
    }

    /// ASCII rendering with `path` cells drawn as `mark` over free cells
    pub fn render_path(&self, path: &GridPath, mark: char) -> String {
        let mut out = String::with_capacity((self.width() + 1) * self.height());
        for y in 0..self.height() {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..self.width() {
                let cell = GridCoord::new(x, y);
                let state = self.cells[cell.matrix_index()];
                if state == CellState::Free && path.contains(cell) {
                    out.push(mark);
                } else {
                    out.push(state.symbol());
                }
            }
        }
        out
    }

    fn checked_state(&self, cell: GridCoord) -> PlanningResult<CellState> {
        self.state(cell).ok_or_else(|| {
            PlanningError::InvalidMap(format!(
                "cell {} is outside the {}x{} grid",
                cell,
                self.width(),
                self.height()
            ))
        })
    }

    fn write(&mut self, cell: GridCoord, state: CellState) {
        self.cells[cell.matrix_index()] = state;
        self.revision = next_revision();
    }
}

impl PartialEq for GridMap {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells && self.start == other.start && self.goal == other.goal
    }
}

impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width() {
                write!(f, "{}", self.cells[(y, x)].symbol())?;
            }
        }
        Ok(())
    }
}
