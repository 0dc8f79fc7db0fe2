#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Grid Defence adapters.
//!
//! A [`Scene`] is a self-contained snapshot of everything a frontend needs to
//! draw one frame. Backends receive it by reference and never feed anything
//! back into the simulation.

use anyhow::Result as AnyResult;
use glam::Vec2;
use grid_defence_core::{
    geometry::GridGeometry, CellCoord, EnemyId, EnemyStatus, Health, TowerId,
};

/// Enemy as it should appear on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEnemy {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Position of the enemy's centre in canvas pixels.
    pub position: Vec2,
    /// Lifecycle state of the enemy.
    pub status: EnemyStatus,
    /// Remaining health.
    pub health: Health,
    /// Health the enemy spawned with.
    pub max_health: Health,
    /// Unit vector of the last movement, used to orient the sprite.
    pub facing: Option<Vec2>,
}

impl SceneEnemy {
    /// Remaining health as a fraction of the spawn health, in `0.0..=1.0`.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health.get() == 0 {
            return 0.0;
        }
        self.health.get() as f32 / self.max_health.get() as f32
    }
}

/// Tower as it should appear on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTower {
    /// Identifier of the tower.
    pub id: TowerId,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Radius of the range indicator in canvas pixels.
    pub range_pixels: f32,
    /// Position of the projectile in flight, if any.
    pub projectile: Option<Vec2>,
}

/// Scene description combining the grid, its structures and inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Placement of the grid inside the canvas.
    pub geometry: GridGeometry,
    /// Cells holding a plain obstacle.
    pub obstacles: Vec<CellCoord>,
    /// Cell enemies spawn on by default.
    pub start: CellCoord,
    /// Cell enemies walk toward.
    pub target: CellCoord,
    /// Enemies in ascending identifier order.
    pub enemies: Vec<SceneEnemy>,
    /// Towers in ascending identifier order.
    pub towers: Vec<SceneTower>,
    /// Life points the player has left.
    pub player_life: u32,
    /// Index of the tick the scene was captured on.
    pub tick: u64,
}

impl Scene {
    /// Iterator over enemies that are still walking.
    pub fn alive_enemies(&self) -> impl Iterator<Item = &SceneEnemy> {
        self.enemies
            .iter()
            .filter(|enemy| enemy.status == EnemyStatus::Alive)
    }

    /// Cell containing the enemy's centre, if it lies on the grid.
    #[must_use]
    pub fn enemy_cell(&self, enemy: &SceneEnemy) -> Option<CellCoord> {
        self.geometry.pixel_to_cell(enemy.position)
    }

    /// Reports whether a tower stands on the cell.
    #[must_use]
    pub fn has_tower(&self, cell: CellCoord) -> bool {
        self.towers.iter().any(|tower| tower.cell == cell)
    }
}

/// Rendering backend capable of presenting Grid Defence scenes.
pub trait RenderingBackend {
    /// Draws a single frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}
