#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven game loop that sequences the Grid Defence systems.
//!
//! A single [`Simulation::step`] advances the world by one tick:
//!
//! 1. the clock ticks, draining enemies that died or escaped last tick;
//! 2. queued player commands are applied;
//! 3. the spawner may add enemies at the start cell;
//! 4. the enemy lifecycle moves, advances, kills or releases enemies;
//! 5. towers pick targets from the post-movement state and projectiles fly.
//!
//! The world is owned by the simulation and is only ever mutated through
//! `grid_defence_world::apply`.

use grid_defence_core::{
    config::{ConfigError, GameConfig},
    Command, Event, NavigationError, TowerTarget,
};
use grid_defence_rendering::{RenderingBackend, Scene, SceneEnemy, SceneTower};
use grid_defence_system_input::{InputTranslator, PointerInput};
use grid_defence_system_movement::Movement;
use grid_defence_system_spawning::{Config as SpawningConfig, Spawning};
use grid_defence_system_tower_combat::TowerCombat;
use grid_defence_system_tower_targeting::TowerTargeting;
use grid_defence_world::{self as world, query, World};
use thiserror::Error;
use tracing::{debug, trace};

/// Failures that abort the game loop.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The configuration does not describe a playable session.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// An enemy lost its route to the target.
    #[error("navigation failed: {0}")]
    Navigation(#[from] NavigationError),
    /// The rendering backend failed to present a frame.
    #[error(transparent)]
    Rendering(#[from] anyhow::Error),
}

/// Aggregate outcome of a sequence of frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of frames that were simulated.
    pub frames: u64,
    /// Enemies that entered the grid.
    pub spawned: u32,
    /// Enemies whose health was depleted.
    pub died: u32,
    /// Enemies that reached the end of their path.
    pub escaped: u32,
    /// Life points the player has left after the last frame.
    pub player_life: u32,
}

impl RunSummary {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemySpawned { .. } => self.spawned += 1,
                Event::EnemyDied { .. } => self.died += 1,
                Event::EnemyEscaped { .. } => self.escaped += 1,
                _ => {}
            }
        }
    }
}

/// Owns the world together with every system that drives it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    input: InputTranslator,
    spawning: Spawning,
    movement: Movement,
    targeting: TowerTargeting,
    combat: TowerCombat,
    queued: Vec<Command>,
    tower_targets: Vec<TowerTarget>,
    scratch: Vec<Command>,
}

impl Simulation {
    /// Builds a simulation from the provided configuration.
    pub fn new(config: &GameConfig) -> Result<Self, SimulationError> {
        let world = World::from_config(config)?;
        debug!(
            banner = query::welcome_banner(&world),
            life = query::player_life(&world),
            "simulation ready"
        );

        Ok(Self {
            world,
            input: InputTranslator::new(),
            spawning: Spawning::new(SpawningConfig::from(config.spawning)),
            movement: Movement::default(),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            queued: Vec::new(),
            tower_targets: Vec::new(),
            scratch: Vec::new(),
        })
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Queues a command for the next step.
    pub fn enqueue(&mut self, command: Command) {
        self.queued.push(command);
    }

    /// Resolves pointer gestures and queues the resulting commands for the
    /// next step. Gestures outside the grid are discarded.
    pub fn enqueue_pointer(&mut self, input: &[PointerInput]) {
        let geometry = query::geometry(&self.world);
        self.input.handle(&geometry, input, &mut self.queued);
    }

    /// Advances the world by a single tick, returning every emitted event.
    ///
    /// `input` is applied after previously queued commands.
    pub fn step(&mut self, input: &[Command]) -> Result<Vec<Event>, SimulationError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick, &mut events);

        for command in self.queued.drain(..).chain(input.iter().cloned()) {
            world::apply(&mut self.world, command, &mut events);
        }

        self.spawning
            .handle(&events, query::start(&self.world), &mut self.scratch);
        self.flush(&mut events);

        let geometry = query::geometry(&self.world);
        self.movement.handle(
            &events,
            &query::enemy_view(&self.world),
            query::navigation_grid(&self.world),
            &geometry,
            query::target(&self.world),
            &mut self.scratch,
        )?;
        self.flush(&mut events);

        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.targeting.handle(
            &towers,
            &enemies,
            &geometry,
            query::tick_index(&self.world),
            &mut self.tower_targets,
        );
        self.combat.handle(
            &towers,
            &enemies,
            &self.tower_targets,
            query::impact_threshold(&self.world),
            &mut self.scratch,
        );
        self.flush(&mut events);

        trace!(
            tick = query::tick_index(&self.world),
            events = events.len(),
            "step complete"
        );
        Ok(events)
    }

    /// Advances one tick and presents the resulting scene.
    pub fn frame<B>(
        &mut self,
        input: &[Command],
        backend: &mut B,
    ) -> Result<Vec<Event>, SimulationError>
    where
        B: RenderingBackend + ?Sized,
    {
        let events = self.step(input)?;
        backend.present(&self.scene())?;
        Ok(events)
    }

    /// Runs `frames` consecutive frames, pulling per-frame input from
    /// `input_source`.
    pub fn run<B, F>(
        &mut self,
        frames: u64,
        backend: &mut B,
        mut input_source: F,
    ) -> Result<RunSummary, SimulationError>
    where
        B: RenderingBackend + ?Sized,
        F: FnMut(u64) -> Vec<Command>,
    {
        let mut summary = RunSummary::default();
        for frame in 0..frames {
            let input = input_source(frame);
            let events = self.frame(&input, backend)?;
            summary.record(&events);
            summary.frames += 1;
        }
        summary.player_life = query::player_life(&self.world);

        debug!(
            frames = summary.frames,
            spawned = summary.spawned,
            died = summary.died,
            escaped = summary.escaped,
            life = summary.player_life,
            "run finished"
        );
        Ok(summary)
    }

    /// Captures a read-only snapshot of the world for rendering.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let geometry = query::geometry(&self.world);
        let enemies = query::enemy_view(&self.world)
            .iter()
            .map(|enemy| SceneEnemy {
                id: enemy.id,
                position: enemy.position,
                status: enemy.status,
                health: enemy.health,
                max_health: enemy.max_health,
                facing: enemy.facing,
            })
            .collect();
        let towers = query::tower_view(&self.world)
            .iter()
            .map(|tower| SceneTower {
                id: tower.id,
                cell: tower.cell,
                range_pixels: geometry.cells_to_pixels(tower.range_cells),
                projectile: tower.projectile.map(|projectile| projectile.position),
            })
            .collect();

        Scene {
            geometry,
            obstacles: query::obstacles(&self.world).blocked_cells().collect(),
            start: query::start(&self.world),
            target: query::target(&self.world),
            enemies,
            towers,
            player_life: query::player_life(&self.world),
            tick: query::tick_index(&self.world),
        }
    }

    fn flush(&mut self, events: &mut Vec<Event>) {
        for command in self.scratch.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }
}
