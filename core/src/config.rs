//! Tunable parameters describing a playthrough.
//!
//! Every section falls back to its defaults when omitted, so adapters may
//! deserialize partial documents. The defaults reproduce the classic layout:
//! a 10×10 grid on an 800×600 canvas, enemies walking from the top-left to the
//! bottom-right corner, one obstacle and one tower near the centre.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geometry::{GeometryError, GridGeometry},
    CellCoord,
};

/// Complete configuration of a game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Life points the player starts with.
    pub player_life: u32,
    /// Grid layout and starting structures.
    pub grid: GridConfig,
    /// Parameters shared by every spawned enemy.
    pub enemy: EnemyConfig,
    /// Parameters shared by every tower.
    pub tower: TowerConfig,
    /// Parameters shared by every projectile.
    pub projectile: ProjectileConfig,
    /// Automatic spawning cadence.
    pub spawning: SpawningConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_life: 100,
            grid: GridConfig::default(),
            enemy: EnemyConfig::default(),
            tower: TowerConfig::default(),
            projectile: ProjectileConfig::default(),
            spawning: SpawningConfig::default(),
        }
    }
}

impl GameConfig {
    /// Builds the grid geometry described by the configuration.
    pub fn geometry(&self) -> Result<GridGeometry, GeometryError> {
        GridGeometry::try_new(
            self.grid.columns,
            self.grid.rows,
            self.grid.canvas_width,
            self.grid.canvas_height,
        )
    }

    /// Checks that the configuration describes a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let geometry = self.geometry()?;

        for (name, cell) in [("start", self.grid.start), ("target", self.grid.target)] {
            if !geometry.contains(cell) {
                return Err(ConfigError::CellOutOfBounds { name, cell });
            }
        }

        for &cell in self.grid.obstacles.iter().chain(self.grid.towers.iter()) {
            if !geometry.contains(cell) {
                return Err(ConfigError::CellOutOfBounds {
                    name: "structure",
                    cell,
                });
            }
            if cell == self.grid.start || cell == self.grid.target {
                return Err(ConfigError::ReservedCell { cell });
            }
        }

        for (field, value) in [
            ("enemy.speed", self.enemy.speed),
            ("tower.range_cells", self.tower.range_cells),
            ("projectile.speed", self.projectile.speed),
            ("projectile.impact_threshold", self.projectile.impact_threshold),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.enemy.life == 0 {
            return Err(ConfigError::NonPositive {
                field: "enemy.life",
                value: 0.0,
            });
        }

        Ok(())
    }
}

/// Grid layout and the structures present when the session starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Width of the canvas hosting the grid, in pixels.
    pub canvas_width: f32,
    /// Height of the canvas hosting the grid, in pixels.
    pub canvas_height: f32,
    /// Cell enemies are spawned on by default.
    pub start: CellCoord,
    /// Cell enemies walk toward.
    pub target: CellCoord,
    /// Cells blocked when the session starts.
    pub obstacles: Vec<CellCoord>,
    /// Cells holding a tower when the session starts.
    pub towers: Vec<CellCoord>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            rows: 10,
            canvas_width: 800.0,
            canvas_height: 600.0,
            start: CellCoord::new(0, 0),
            target: CellCoord::new(9, 9),
            obstacles: vec![CellCoord::new(4, 5)],
            towers: vec![CellCoord::new(5, 5)],
        }
    }
}

/// Parameters shared by every spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnemyConfig {
    /// Health an enemy spawns with.
    pub life: u32,
    /// Pixels travelled per tick.
    pub speed: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            life: 100,
            speed: 1.0,
        }
    }
}

/// Parameters shared by every tower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TowerConfig {
    /// Targeting radius measured in cells.
    pub range_cells: f32,
    /// Damage applied by each projectile impact.
    pub damage: u32,
    /// Minimum ticks between two shots.
    pub cooldown_ticks: u64,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            range_cells: 2.0,
            damage: 10,
            cooldown_ticks: 30,
        }
    }
}

/// Parameters shared by every projectile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectileConfig {
    /// Pixels travelled per tick.
    pub speed: f32,
    /// Distance below which a projectile hits its target, in pixels.
    pub impact_threshold: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            impact_threshold: 5.0,
        }
    }
}

/// Automatic spawning cadence. An interval of zero disables it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawningConfig {
    /// Ticks between two automatic spawns.
    pub interval_ticks: u64,
    /// Maximum number of automatic spawns, unbounded when absent.
    pub limit: Option<u32>,
}

/// Reasons a configuration is rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The grid layout cannot be placed on the canvas.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// A configured cell lies outside the grid.
    #[error("{name} cell {cell:?} lies outside the grid")]
    CellOutOfBounds {
        /// Setting that named the cell.
        name: &'static str,
        /// Offending cell.
        cell: CellCoord,
    },
    /// A structure was configured on the start or target cell.
    #[error("structure at {cell:?} would block the start or target cell")]
    ReservedCell {
        /// Offending cell.
        cell: CellCoord,
    },
    /// A setting that must be positive is not.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Name of the setting.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
}
