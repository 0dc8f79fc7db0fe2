#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Grid Defence.

mod enemies;
mod towers;

use grid_defence_core::{
    config::{ConfigError, EnemyConfig, GameConfig, ProjectileConfig, TowerConfig},
    geometry::GridGeometry,
    CellCoord, Command, EnemyId, EnemyStatus, Event, Health, ObstacleGrid, PlacementError,
    SpawnError, StructureKind, TowerId, WELCOME_BANNER,
};
use grid_defence_system_navigation::Navigator;
use tracing::{debug, info};

use crate::{
    enemies::EnemyRegistry,
    towers::{ProjectileState, TowerRegistry},
};

/// Represents the authoritative Grid Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    geometry: GridGeometry,
    obstacles: ObstacleGrid,
    impassable: ObstacleGrid,
    start: CellCoord,
    target: CellCoord,
    player_life: u32,
    enemies: EnemyRegistry,
    towers: TowerRegistry,
    enemy_template: EnemyConfig,
    tower_template: TowerConfig,
    projectile_template: ProjectileConfig,
    navigator: Navigator,
    tick_index: u64,
}

impl World {
    /// Creates a world laid out according to the provided configuration.
    ///
    /// Configured obstacles and towers are placed directly, without the
    /// placement rules that apply to player input.
    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let geometry = config.geometry()?;

        let mut obstacles = ObstacleGrid::new(geometry.columns(), geometry.rows());
        let mut impassable = ObstacleGrid::new(geometry.columns(), geometry.rows());
        for &cell in &config.grid.obstacles {
            obstacles.set_blocked(cell, true);
            impassable.set_blocked(cell, true);
        }

        let mut towers = TowerRegistry::new();
        for &cell in &config.grid.towers {
            if towers.occupies(cell) {
                continue;
            }
            obstacles.set_blocked(cell, false);
            impassable.set_blocked(cell, true);
            let _ = towers.insert(cell, &config.tower);
        }

        Ok(Self {
            banner: WELCOME_BANNER,
            geometry,
            obstacles,
            impassable,
            start: config.grid.start,
            target: config.grid.target,
            player_life: config.player_life,
            enemies: EnemyRegistry::new(),
            towers,
            enemy_template: config.enemy,
            tower_template: config.tower,
            projectile_template: config.projectile,
            navigator: Navigator::default(),
            tick_index: 0,
        })
    }

    fn spawn_enemy(&mut self, cell: CellCoord) -> Result<(EnemyId, usize), SpawnError> {
        if !self.geometry.contains(cell) {
            return Err(SpawnError::OutOfBounds);
        }

        if self.impassable.is_blocked(cell) {
            return Err(SpawnError::Blocked);
        }

        let path = self
            .navigator
            .find_path(&self.impassable, cell, self.target)
            .ok_or(SpawnError::Unreachable)?;
        let length = path.len();

        let id = self.enemies.spawn(
            self.geometry.cell_to_pixel(cell),
            Health::new(self.enemy_template.life),
            self.enemy_template.speed,
            path,
        );
        Ok((id, length))
    }

    fn place_obstacle(&mut self, cell: CellCoord) -> Result<(), PlacementError> {
        if !self.geometry.contains(cell) {
            return Err(PlacementError::OutOfBounds);
        }

        if cell == self.start || cell == self.target {
            return Err(PlacementError::ReservedCell);
        }

        if self.impassable.is_blocked(cell) {
            return Err(PlacementError::Occupied);
        }

        self.obstacles.set_blocked(cell, true);
        self.impassable.set_blocked(cell, true);
        Ok(())
    }

    fn place_tower(&mut self, cell: CellCoord) -> Result<TowerId, PlacementError> {
        if !self.geometry.contains(cell) {
            return Err(PlacementError::OutOfBounds);
        }

        if self.towers.occupies(cell) {
            return Err(PlacementError::Occupied);
        }

        if !self.obstacles.is_blocked(cell) {
            return Err(PlacementError::MissingObstacle);
        }

        self.obstacles.set_blocked(cell, false);
        Ok(self.towers.insert(cell, &self.tower_template))
    }

    fn fire_projectile(&mut self, tower: TowerId, target: EnemyId) -> bool {
        if !self
            .enemies
            .get(target)
            .is_some_and(|enemy| enemy.is_alive())
        {
            return false;
        }

        let tick = self.tick_index;
        let speed = self.projectile_template.speed;
        let geometry = self.geometry;
        let Some(state) = self.towers.get_mut(tower) else {
            return false;
        };

        if state.projectile.is_some() || !state.cooldown.is_ready(tick) {
            return false;
        }

        state.cooldown.record(tick);
        state.projectile = Some(ProjectileState {
            target,
            position: geometry.cell_to_pixel(state.cell),
            speed,
        });
        true
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            for enemy in world.enemies.drain_terminal() {
                out_events.push(Event::EnemyRemoved { enemy });
            }

            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::SpawnEnemy { cell } => match world.spawn_enemy(cell) {
            Ok((enemy, length)) => {
                debug!(enemy = enemy.get(), ?cell, "enemy spawned");
                out_events.push(Event::EnemySpawned { enemy, cell });
                out_events.push(Event::PathAssigned { enemy, length });
            }
            Err(reason) => {
                debug!(?cell, %reason, "spawn rejected");
                out_events.push(Event::SpawnRejected { cell, reason });
            }
        },
        Command::PlaceObstacle { cell } => match world.place_obstacle(cell) {
            Ok(()) => out_events.push(Event::ObstaclePlaced { cell }),
            Err(reason) => {
                debug!(?cell, %reason, "obstacle placement rejected");
                out_events.push(Event::PlacementRejected {
                    kind: StructureKind::Obstacle,
                    cell,
                    reason,
                });
            }
        },
        Command::PlaceTower { cell } => match world.place_tower(cell) {
            Ok(tower) => out_events.push(Event::TowerPlaced { tower, cell }),
            Err(reason) => {
                debug!(?cell, %reason, "tower placement rejected");
                out_events.push(Event::PlacementRejected {
                    kind: StructureKind::Tower,
                    cell,
                    reason,
                });
            }
        },
        Command::AssignPath { enemy, path } => {
            if let Some(state) = world.enemies.alive_mut(enemy) {
                let length = path.len();
                state.path = Some(path);
                state.cursor = 0;
                state.restart_leg();
                out_events.push(Event::PathAssigned { enemy, length });
            }
        }
        Command::MoveEnemy {
            enemy,
            position,
            facing,
        } => {
            if let Some(state) = world.enemies.alive_mut(enemy) {
                state.position = position;
                state.leg_ticks = state.leg_ticks.saturating_add(1);
                if facing.is_some() {
                    state.facing = facing;
                }
            }
        }
        Command::AdvanceWaypoint { enemy } => {
            if let Some(state) = world.enemies.alive_mut(enemy) {
                let reached = state.path.as_ref().and_then(|path| path.get(state.cursor));
                if let Some(cell) = reached {
                    state.cursor += 1;
                    state.restart_leg();
                    out_events.push(Event::WaypointReached { enemy, cell });
                }
            }
        }
        Command::MarkEnemyDead { enemy } => {
            if let Some(state) = world.enemies.alive_mut(enemy) {
                state.status = EnemyStatus::Dead;
                info!(enemy = enemy.get(), "enemy died");
                out_events.push(Event::EnemyDied { enemy });
            }
        }
        Command::MarkEnemyEscaped { enemy } => {
            if let Some(state) = world.enemies.alive_mut(enemy) {
                state.status = EnemyStatus::Escaped;
                world.player_life = world.player_life.saturating_sub(1);
                info!(
                    enemy = enemy.get(),
                    life = world.player_life,
                    "enemy escaped"
                );
                out_events.push(Event::EnemyEscaped { enemy });
                out_events.push(Event::PlayerLifeChanged {
                    life: world.player_life,
                });
            }
        }
        Command::FireProjectile { tower, target } => {
            if world.fire_projectile(tower, target) {
                out_events.push(Event::ProjectileFired { tower, target });
            } else {
                debug!(
                    tower = tower.get(),
                    target = target.get(),
                    "fire request ignored"
                );
            }
        }
        Command::MoveProjectile { tower, position } => {
            if let Some(projectile) = world
                .towers
                .get_mut(tower)
                .and_then(|state| state.projectile.as_mut())
            {
                projectile.position = position;
            }
        }
        Command::ResolveImpact { tower } => {
            let Some(state) = world.towers.get_mut(tower) else {
                return;
            };
            let damage = state.damage;
            let Some(projectile) = state.projectile.take() else {
                return;
            };

            let target = projectile.target;
            match world.enemies.alive_mut(target) {
                Some(enemy) => {
                    enemy.health = enemy.health.damaged(damage);
                    out_events.push(Event::ProjectileImpacted {
                        tower,
                        target,
                        damage,
                    });
                }
                None => out_events.push(Event::ProjectileMissed { tower, target }),
            }
        }
        Command::DropProjectile { tower } => {
            if let Some(projectile) = world
                .towers
                .get_mut(tower)
                .and_then(|state| state.projectile.take())
            {
                out_events.push(Event::ProjectileMissed {
                    tower,
                    target: projectile.target,
                });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use grid_defence_core::{
        geometry::GridGeometry, CellCoord, EnemySnapshot, EnemyView, ObstacleGrid, TowerSnapshot,
        TowerView,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Placement of the grid inside the canvas.
    #[must_use]
    pub fn geometry(world: &World) -> GridGeometry {
        world.geometry
    }

    /// Cells holding a plain obstacle. Tower cells are not included.
    #[must_use]
    pub fn obstacles(world: &World) -> &ObstacleGrid {
        &world.obstacles
    }

    /// Cells enemies cannot walk through: obstacles and towers.
    #[must_use]
    pub fn navigation_grid(world: &World) -> &ObstacleGrid {
        &world.impassable
    }

    /// Cell enemies spawn on by default.
    #[must_use]
    pub fn start(world: &World) -> CellCoord {
        world.start
    }

    /// Cell enemies walk toward.
    #[must_use]
    pub fn target(world: &World) -> CellCoord {
        world.target
    }

    /// Life points the player has left.
    #[must_use]
    pub fn player_life(world: &World) -> u32 {
        world.player_life
    }

    /// Index of the most recent tick.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of enemies stored in the world, terminal ones included.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Distance below which a projectile hits its target, in pixels.
    #[must_use]
    pub fn impact_threshold(world: &World) -> f32 {
        world.projectile_template.impact_threshold
    }

    /// Captures a read-only view of every enemy in the world.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots: Vec<EnemySnapshot> =
            world.enemies.iter().map(|enemy| enemy.snapshot()).collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of every tower in the world.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let snapshots: Vec<TowerSnapshot> =
            world.towers.iter().map(|tower| tower.snapshot()).collect();
        TowerView::from_snapshots(snapshots)
    }
}
