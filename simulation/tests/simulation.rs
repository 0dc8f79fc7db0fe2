use anyhow::{anyhow, Result as AnyResult};
use glam::Vec2;
use grid_defence_core::{
    config::{ConfigError, GameConfig},
    CellCoord, Command, EnemyStatus, Event, SpawnError,
};
use grid_defence_rendering::{RenderingBackend, Scene};
use grid_defence_simulation::{Simulation, SimulationError};
use grid_defence_system_input::PointerInput;

#[derive(Default)]
struct RecordingBackend {
    frames: u64,
    last: Option<Scene>,
}

impl RenderingBackend for RecordingBackend {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        self.frames += 1;
        self.last = Some(scene.clone());
        Ok(())
    }
}

struct FailingBackend;

impl RenderingBackend for FailingBackend {
    fn present(&mut self, _scene: &Scene) -> AnyResult<()> {
        Err(anyhow!("display lost"))
    }
}

fn corridor_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.grid.columns = 3;
    config.grid.rows = 1;
    config.grid.canvas_width = 300.0;
    config.grid.canvas_height = 100.0;
    config.grid.start = CellCoord::new(0, 0);
    config.grid.target = CellCoord::new(2, 0);
    config.grid.obstacles.clear();
    config.grid.towers.clear();
    config.enemy.speed = 5.0;
    config
}

#[test]
fn every_spawned_enemy_dies_or_escapes() {
    let mut config = GameConfig::default();
    config.grid.towers = vec![CellCoord::new(8, 2)];
    config.tower.range_cells = 3.0;
    config.enemy.life = 20;
    config.spawning.interval_ticks = 60;
    config.spawning.limit = Some(5);

    let mut simulation = Simulation::new(&config).expect("valid configuration");
    let mut backend = RecordingBackend::default();
    let summary = simulation
        .run(2_500, &mut backend, |_| Vec::new())
        .expect("run completes");

    assert_eq!(summary.frames, 2_500);
    assert_eq!(backend.frames, 2_500);
    assert_eq!(summary.spawned, 5);
    assert_eq!(summary.died + summary.escaped, summary.spawned);
    assert!(summary.died >= 1, "tower covering the route never scored");
    assert_eq!(summary.player_life, 100 - summary.escaped);

    let scene = backend.last.expect("scene presented");
    assert!(scene.enemies.is_empty());
    assert_eq!(scene.tick, 2_500);
    assert_eq!(scene.player_life, summary.player_life);
}

#[test]
fn escape_costs_exactly_one_life() {
    let mut simulation = Simulation::new(&corridor_config()).expect("valid configuration");

    let mut events = simulation
        .step(&[Command::SpawnEnemy {
            cell: CellCoord::new(0, 0),
        }])
        .expect("step succeeds");
    for _ in 0..100 {
        events.extend(simulation.step(&[]).expect("step succeeds"));
    }

    let escapes = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyEscaped { .. }))
        .count();
    let life_changes: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::PlayerLifeChanged { life } => Some(*life),
            _ => None,
        })
        .collect();
    let removals = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyRemoved { .. }))
        .count();

    assert_eq!(escapes, 1);
    assert_eq!(life_changes, vec![99]);
    assert_eq!(removals, 1);
    assert!(simulation.scene().enemies.is_empty());
}

#[test]
fn outrun_projectile_misses_and_clears() {
    let mut config = GameConfig::default();
    config.grid.columns = 5;
    config.grid.rows = 2;
    config.grid.canvas_width = 500.0;
    config.grid.canvas_height = 200.0;
    config.grid.start = CellCoord::new(0, 0);
    config.grid.target = CellCoord::new(4, 0);
    config.grid.obstacles.clear();
    config.grid.towers = vec![CellCoord::new(1, 1)];
    config.tower.range_cells = 1.0;
    config.projectile.speed = 1.0;
    config.enemy.speed = 20.0;

    let mut simulation = Simulation::new(&config).expect("valid configuration");
    let mut events = simulation
        .step(&[Command::SpawnEnemy {
            cell: CellCoord::new(0, 0),
        }])
        .expect("step succeeds");
    for _ in 0..40 {
        for enemy in simulation.scene().enemies {
            assert_eq!(enemy.health, enemy.max_health, "enemy took damage");
        }
        events.extend(simulation.step(&[]).expect("step succeeds"));
    }

    let count = |wanted: fn(&Event) -> bool| events.iter().filter(|event| wanted(event)).count();
    assert_eq!(count(|event| matches!(event, Event::ProjectileFired { .. })), 1);
    assert_eq!(count(|event| matches!(event, Event::ProjectileImpacted { .. })), 0);
    assert_eq!(count(|event| matches!(event, Event::ProjectileMissed { .. })), 1);
    assert_eq!(count(|event| matches!(event, Event::EnemyEscaped { .. })), 1);

    let scene = simulation.scene();
    assert!(scene.enemies.is_empty());
    assert_eq!(scene.towers[0].projectile, None);
    assert_eq!(scene.player_life, 99);
}

#[test]
fn unreachable_spawn_is_reported_as_event() {
    let mut simulation = Simulation::new(&GameConfig::default()).expect("valid configuration");
    let events = simulation
        .step(&[
            Command::PlaceObstacle {
                cell: CellCoord::new(8, 9),
            },
            Command::PlaceObstacle {
                cell: CellCoord::new(9, 8),
            },
            Command::SpawnEnemy {
                cell: CellCoord::new(0, 0),
            },
        ])
        .expect("rejections are not errors");

    assert!(events.contains(&Event::SpawnRejected {
        cell: CellCoord::new(0, 0),
        reason: SpawnError::Unreachable,
    }));
    assert!(simulation.scene().enemies.is_empty());
}

#[test]
fn queued_commands_apply_before_frame_input() {
    let mut simulation = Simulation::new(&GameConfig::default()).expect("valid configuration");
    simulation.enqueue(Command::PlaceObstacle {
        cell: CellCoord::new(2, 2),
    });

    let events = simulation
        .step(&[Command::PlaceTower {
            cell: CellCoord::new(2, 2),
        }])
        .expect("step succeeds");

    assert_eq!(events[0], Event::TimeAdvanced { tick: 1 });
    assert_eq!(
        events[1],
        Event::ObstaclePlaced {
            cell: CellCoord::new(2, 2)
        }
    );
    assert!(matches!(events[2], Event::TowerPlaced { .. }));
    assert!(simulation.scene().has_tower(CellCoord::new(2, 2)));
}

#[test]
fn pointer_click_spawns_on_next_step() {
    let mut simulation = Simulation::new(&GameConfig::default()).expect("valid configuration");
    simulation.enqueue_pointer(&[
        PointerInput::click(Vec2::new(130.0, 30.0)),
        PointerInput::click(Vec2::new(5.0, 5.0)),
    ]);

    let events = simulation.step(&[]).expect("step succeeds");
    let spawned: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemySpawned { cell, .. } => Some(*cell),
            _ => None,
        })
        .collect();

    assert_eq!(spawned, vec![CellCoord::new(0, 0)]);
    let scene = simulation.scene();
    assert_eq!(scene.enemies.len(), 1);
    assert_eq!(scene.enemies[0].status, EnemyStatus::Alive);
}

#[test]
fn scene_reflects_configured_layout() {
    let simulation = Simulation::new(&GameConfig::default()).expect("valid configuration");
    let scene = simulation.scene();

    assert_eq!(scene.tick, 0);
    assert_eq!(scene.player_life, 100);
    assert_eq!(scene.start, CellCoord::new(0, 0));
    assert_eq!(scene.target, CellCoord::new(9, 9));
    assert_eq!(scene.obstacles, vec![CellCoord::new(4, 5)]);
    assert_eq!(scene.towers.len(), 1);
    assert_eq!(scene.towers[0].cell, CellCoord::new(5, 5));
    assert_eq!(scene.towers[0].range_pixels, 120.0);
    assert_eq!(scene.towers[0].projectile, None);
}

#[test]
fn rendering_failures_abort_the_frame() {
    let mut simulation = Simulation::new(&GameConfig::default()).expect("valid configuration");
    let error = simulation
        .frame(&[], &mut FailingBackend)
        .expect_err("backend failure propagates");

    assert!(matches!(error, SimulationError::Rendering(_)));
    assert_eq!(error.to_string(), "display lost");
}

#[test]
fn invalid_configuration_is_rejected() {
    let mut config = GameConfig::default();
    config.grid.start = CellCoord::new(20, 0);

    let error = Simulation::new(&config).expect_err("start outside the grid");
    assert!(matches!(
        error,
        SimulationError::Config(ConfigError::CellOutOfBounds { .. })
    ));
}
