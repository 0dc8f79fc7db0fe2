#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic enemy lifecycle system that walks enemies along their paths.
//!
//! Each tick an alive enemy either dies, advances its waypoint cursor, escapes,
//! or moves toward the centre of its current waypoint. Reaching a waypoint
//! consumes the whole tick, so an enemy never moves and advances in the same
//! tick.

use grid_defence_core::{
    geometry::GridGeometry, motion::advance_along, CellCoord, Command, EnemySnapshot, EnemyView,
    Event, NavigationError, ObstacleGrid, Path,
};
use glam::Vec2;
use grid_defence_system_navigation::Navigator;

/// Pure system that reacts to world events and emits enemy lifecycle commands.
#[derive(Debug, Default)]
pub struct Movement {
    navigator: Navigator,
    scratch: Vec<Command>,
}

impl Movement {
    /// Consumes world events and immutable views to emit lifecycle commands.
    ///
    /// Enemies without a path are routed from their current cell to `target`.
    /// Failing to find such a route is reported as an error, since enemies
    /// only spawn on cells connected to the target. On error nothing is
    /// appended to `out`.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        obstacles: &ObstacleGrid,
        geometry: &GridGeometry,
        target: CellCoord,
        out: &mut Vec<Command>,
    ) -> Result<(), NavigationError> {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return Ok(());
        }

        self.scratch.clear();

        for enemy in enemies.iter().filter(|enemy| enemy.is_alive()) {
            if enemy.health.is_depleted() {
                self.scratch.push(Command::MarkEnemyDead { enemy: enemy.id });
                continue;
            }

            let assigned;
            let (path, leg) = match enemy.path.as_ref() {
                Some(path) => (
                    path,
                    Leg {
                        cursor: enemy.cursor,
                        origin: enemy.leg_origin,
                        ticks: enemy.leg_ticks,
                    },
                ),
                None => {
                    assigned = self.route(enemy, obstacles, geometry, target)?;
                    self.scratch.push(Command::AssignPath {
                        enemy: enemy.id,
                        path: assigned.clone(),
                    });
                    (
                        &assigned,
                        Leg {
                            cursor: 0,
                            origin: enemy.position,
                            ticks: 0,
                        },
                    )
                }
            };

            self.scratch.push(next_command(enemy, path, leg, geometry));
        }

        out.append(&mut self.scratch);
        Ok(())
    }

    fn route(
        &mut self,
        enemy: &EnemySnapshot,
        obstacles: &ObstacleGrid,
        geometry: &GridGeometry,
        target: CellCoord,
    ) -> Result<Path, NavigationError> {
        let cell = geometry
            .pixel_to_cell(enemy.position)
            .ok_or(NavigationError::EnemyOffGrid { enemy: enemy.id })?;
        self.navigator.try_find_path(obstacles, cell, target)
    }
}

/// Progress along the leg toward the current waypoint.
#[derive(Clone, Copy, Debug)]
struct Leg {
    cursor: usize,
    origin: Vec2,
    ticks: u32,
}

fn next_command(enemy: &EnemySnapshot, path: &Path, leg: Leg, geometry: &GridGeometry) -> Command {
    let cursor = leg.cursor;
    let Some(waypoint) = path.get(cursor) else {
        return Command::MarkEnemyEscaped { enemy: enemy.id };
    };

    let centre = geometry.cell_to_pixel(waypoint);
    if enemy.position == centre {
        return if cursor + 1 >= path.len() {
            Command::MarkEnemyEscaped { enemy: enemy.id }
        } else {
            Command::AdvanceWaypoint { enemy: enemy.id }
        };
    }

    let step = advance_along(leg.origin, centre, enemy.speed, leg.ticks.saturating_add(1));
    Command::MoveEnemy {
        enemy: enemy.id,
        position: step.position,
        facing: step.direction,
    }
}
