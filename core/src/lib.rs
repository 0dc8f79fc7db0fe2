#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views such as [`EnemyView`] and [`TowerView`], and respond exclusively with
//! new command batches.

pub mod config;
pub mod geometry;
pub mod motion;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Defence.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by a single frame.
    Tick,
    /// Requests that a new enemy enters the grid at the provided cell.
    SpawnEnemy {
        /// Cell the enemy should appear on.
        cell: CellCoord,
    },
    /// Requests placement of an impassable obstacle.
    PlaceObstacle {
        /// Cell that should become blocked.
        cell: CellCoord,
    },
    /// Requests that the obstacle at the provided cell is converted into a tower.
    PlaceTower {
        /// Cell holding the obstacle that the tower consumes.
        cell: CellCoord,
    },
    /// Assigns a freshly computed path to an enemy and rewinds its waypoint cursor.
    AssignPath {
        /// Enemy receiving the path.
        enemy: EnemyId,
        /// Cells the enemy should visit, starting with its current cell.
        path: Path,
    },
    /// Moves an enemy to a new continuous position.
    MoveEnemy {
        /// Enemy that moved.
        enemy: EnemyId,
        /// Position reached after the step, in pixels.
        position: Vec2,
        /// Unit vector describing the direction of travel, if any.
        facing: Option<Vec2>,
    },
    /// Advances the waypoint cursor of an enemy that reached its current waypoint.
    AdvanceWaypoint {
        /// Enemy whose cursor advances.
        enemy: EnemyId,
    },
    /// Transitions an enemy whose health is depleted into the dead state.
    MarkEnemyDead {
        /// Enemy that died.
        enemy: EnemyId,
    },
    /// Transitions an enemy that exhausted its path into the escaped state.
    MarkEnemyEscaped {
        /// Enemy that escaped.
        enemy: EnemyId,
    },
    /// Requests that a tower launches a projectile toward an enemy.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
        /// Enemy the projectile homes in on.
        target: EnemyId,
    },
    /// Moves the in-flight projectile owned by a tower.
    MoveProjectile {
        /// Tower that owns the projectile.
        tower: TowerId,
        /// Position reached after the step, in pixels.
        position: Vec2,
    },
    /// Resolves the impact of a tower's projectile against its target.
    ResolveImpact {
        /// Tower that owns the projectile.
        tower: TowerId,
    },
    /// Discards a tower's projectile without applying damage.
    DropProjectile {
        /// Tower that owns the projectile.
        tower: TowerId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just started.
        tick: u64,
    },
    /// Confirms that an enemy entered the grid.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EnemyId,
        /// Cell the enemy occupies after spawning.
        cell: CellCoord,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Cell provided in the spawn request.
        cell: CellCoord,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Confirms that an obstacle now blocks the provided cell.
    ObstaclePlaced {
        /// Cell that became blocked.
        cell: CellCoord,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Cell occupied by the tower.
        cell: CellCoord,
    },
    /// Reports that an obstacle or tower placement request was rejected.
    PlacementRejected {
        /// Kind of structure requested for placement.
        kind: StructureKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that an enemy received a new path.
    PathAssigned {
        /// Enemy that received the path.
        enemy: EnemyId,
        /// Number of cells in the path.
        length: usize,
    },
    /// Reports that an enemy reached a waypoint and advanced its cursor.
    WaypointReached {
        /// Enemy that reached the waypoint.
        enemy: EnemyId,
        /// Waypoint cell that was reached.
        cell: CellCoord,
    },
    /// Reports that an enemy's health was depleted.
    EnemyDied {
        /// Enemy that died.
        enemy: EnemyId,
    },
    /// Reports that an enemy reached the end of its path.
    EnemyEscaped {
        /// Enemy that escaped.
        enemy: EnemyId,
    },
    /// Reports that a terminal enemy was drained from the world.
    EnemyRemoved {
        /// Enemy that was removed.
        enemy: EnemyId,
    },
    /// Reports the player's remaining life after it changed.
    PlayerLifeChanged {
        /// Remaining life points.
        life: u32,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy targeted by the projectile.
        target: EnemyId,
    },
    /// Reports that a projectile hit its target.
    ProjectileImpacted {
        /// Tower that owned the projectile.
        tower: TowerId,
        /// Enemy that was hit.
        target: EnemyId,
        /// Damage applied to the enemy.
        damage: u32,
    },
    /// Reports that a projectile was discarded without dealing damage.
    ProjectileMissed {
        /// Tower that owned the projectile.
        tower: TowerId,
        /// Enemy the projectile was homing in on.
        target: EnemyId,
    },
}

/// Cardinal movement directions on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Returns the adjacent cell in `direction`, if it lies within a
    /// `columns × rows` grid.
    #[must_use]
    pub fn neighbor(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::West => (self.column.checked_sub(1), Some(self.row)),
        };

        let cell = CellCoord::new(column?, row?);
        (cell.column < columns && cell.row < rows).then_some(cell)
    }
}

/// Remaining life of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Numeric health points remaining.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no health remains.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }

    /// Returns the health left after subtracting `damage`, saturating at zero.
    #[must_use]
    pub const fn damaged(self, damage: u32) -> Self {
        Self(self.0.saturating_sub(damage))
    }
}

/// Lifecycle state of an enemy.
///
/// `Alive` is the only state from which transitions occur; `Dead` and
/// `Escaped` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyStatus {
    /// The enemy is walking its path.
    Alive,
    /// The enemy's health was depleted.
    Dead,
    /// The enemy reached the end of its path.
    Escaped,
}

/// Ordered sequence of cells from a start cell to an end cell, inclusive.
///
/// Paths are never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Wraps the provided cells, returning `None` when `cells` is empty.
    #[must_use]
    pub fn from_cells(cells: Vec<CellCoord>) -> Option<Self> {
        if cells.is_empty() {
            None
        } else {
            Some(Self { cells })
        }
    }

    /// Cells composing the path in travel order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of cells in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell stored at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<CellCoord> {
        self.cells.get(index).copied()
    }

    /// First cell of the path.
    #[must_use]
    pub fn first(&self) -> CellCoord {
        self.cells[0]
    }

    /// Last cell of the path.
    #[must_use]
    pub fn last(&self) -> CellCoord {
        self.cells[self.cells.len() - 1]
    }
}

/// Dense row-major grid of impassable cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObstacleGrid {
    columns: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl ObstacleGrid {
    /// Creates a grid of the provided dimensions with every cell free.
    ///
    /// # Panics
    ///
    /// Panics when `columns * rows` cannot be addressed on this platform,
    /// matching [`ObstacleGrid::from_cells`].
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let expected = u64::from(columns) * u64::from(rows);
        let Ok(capacity) = usize::try_from(expected) else {
            panic!("obstacle grid of {columns}x{rows} requires {expected} cells");
        };
        Self {
            columns,
            rows,
            cells: vec![false; capacity],
        }
    }

    /// Creates a grid from a row-major buffer of blocked flags.
    ///
    /// # Panics
    ///
    /// Panics when `cells.len()` does not equal `columns * rows`. A mismatch
    /// means the grid was assembled incorrectly and cannot be searched.
    #[must_use]
    pub fn from_cells(columns: u32, rows: u32, cells: Vec<bool>) -> Self {
        let expected = u64::from(columns) * u64::from(rows);
        assert_eq!(
            cells.len() as u64,
            expected,
            "obstacle grid of {columns}x{rows} requires {expected} cells"
        );
        Self {
            columns,
            rows,
            cells,
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the cell lies within the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether the cell is impassable. Cells outside the grid are
    /// always impassable.
    #[must_use]
    pub fn is_blocked(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(true)
    }

    /// Marks the cell as blocked or free. Cells outside the grid are ignored.
    pub fn set_blocked(&mut self, cell: CellCoord, blocked: bool) {
        if let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            *slot = blocked;
        }
    }

    /// Iterator over every blocked cell in row-major order.
    pub fn blocked_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let width = self.columns.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, blocked)| **blocked)
            .map(move |(index, _)| {
                let index = index as u32;
                CellCoord::new(index % width, index / width)
            })
    }

    /// Row-major offset of the cell, if it lies within the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Firing cadence of a tower measured in ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cooldown {
    interval_ticks: u64,
    last_fired: Option<u64>,
}

impl Cooldown {
    /// Creates a cooldown that has never fired.
    #[must_use]
    pub const fn new(interval_ticks: u64) -> Self {
        Self {
            interval_ticks,
            last_fired: None,
        }
    }

    /// Minimum number of ticks between two shots.
    #[must_use]
    pub const fn interval_ticks(&self) -> u64 {
        self.interval_ticks
    }

    /// Tick on which the tower last fired, if ever.
    #[must_use]
    pub const fn last_fired(&self) -> Option<u64> {
        self.last_fired
    }

    /// Reports whether enough ticks elapsed since the last shot.
    #[must_use]
    pub fn is_ready(&self, tick: u64) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => tick.saturating_sub(last) >= self.interval_ticks,
        }
    }

    /// Records a shot fired on `tick`.
    pub fn record(&mut self, tick: u64) {
        self.last_fired = Some(tick);
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Continuous position in pixels.
    pub position: Vec2,
    /// Remaining health.
    pub health: Health,
    /// Health the enemy spawned with.
    pub max_health: Health,
    /// Lifecycle state of the enemy.
    pub status: EnemyStatus,
    /// Distance covered per tick, in pixels.
    pub speed: f32,
    /// Path assigned to the enemy, if one was computed.
    pub path: Option<Path>,
    /// Index of the waypoint the enemy is walking toward.
    pub cursor: usize,
    /// Position the current leg toward the waypoint started from.
    pub leg_origin: Vec2,
    /// Ticks already spent walking the current leg.
    pub leg_ticks: u32,
    /// Unit vector of the last movement, if the enemy moved.
    pub facing: Option<Vec2>,
}

impl EnemySnapshot {
    /// Reports whether the enemy is still alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.status == EnemyStatus::Alive
    }
}

/// Read-only snapshot describing all enemies within the grid.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single enemy.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Enemy the projectile homes in on.
    pub target: EnemyId,
    /// Continuous position in pixels.
    pub position: Vec2,
    /// Distance covered per tick, in pixels.
    pub speed: f32,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Targeting radius measured in cells.
    pub range_cells: f32,
    /// Damage applied by each projectile impact.
    pub damage: u32,
    /// Firing cadence of the tower.
    pub cooldown: Cooldown,
    /// Projectile currently in flight, if any.
    pub projectile: Option<ProjectileSnapshot>,
}

/// Read-only snapshot describing all towers placed within the grid.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single tower.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Reports whether the view captured no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Target assignment computed for a tower that is ready to fire.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Pixel centre of the tower's cell.
    pub tower_center: Vec2,
    /// Position of the enemy when it was acquired.
    pub enemy_position: Vec2,
}

/// Kinds of structures the player can place on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    /// Impassable obstacle.
    Obstacle,
    /// Tower built on top of an obstacle.
    Tower,
}

/// Reasons a placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The requested cell already holds a structure.
    #[error("cell is already occupied")]
    Occupied,
    /// The requested cell is the start or the target cell.
    #[error("start and target cells must stay free")]
    ReservedCell,
    /// Towers can only be built on top of an existing obstacle.
    #[error("towers must be placed on an obstacle")]
    MissingObstacle,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// The requested cell lies outside the grid.
    #[error("spawn cell lies outside the grid")]
    OutOfBounds,
    /// The requested cell is impassable.
    #[error("spawn cell is blocked")]
    Blocked,
    /// No path connects the requested cell with the target.
    #[error("no path leads from the spawn cell to the target")]
    Unreachable,
}

/// Failures raised while computing enemy paths.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    /// No path connects the two cells.
    #[error("no path from {start:?} to {end:?}")]
    Unreachable {
        /// Cell the search started from.
        start: CellCoord,
        /// Cell the search tried to reach.
        end: CellCoord,
    },
    /// An enemy without a path is positioned outside the grid.
    #[error("enemy {} is outside the grid", .enemy.get())]
    EnemyOffGrid {
        /// Enemy that could not be located.
        enemy: EnemyId,
    },
}
