#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that launches, steers and resolves tower projectiles.

use grid_defence_core::{
    motion::step_toward, Command, EnemyView, TowerSnapshot, TowerTarget, TowerView,
};

/// Tower combat system that queues projectile commands.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances projectiles in flight and fires new ones at the provided
    /// targets.
    ///
    /// A projectile whose target is gone or no longer alive is dropped. A
    /// projectile that ends its step closer than `impact_threshold` pixels to
    /// the target's current position hits it.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        enemies: &EnemyView,
        tower_targets: &[TowerTarget],
        impact_threshold: f32,
        out: &mut Vec<Command>,
    ) {
        if towers.is_empty() {
            return;
        }

        self.scratch.clear();

        for tower in towers.iter() {
            steer_projectile(tower, enemies, impact_threshold, &mut self.scratch);
        }

        for target in tower_targets {
            let ready = towers
                .get(target.tower)
                .is_some_and(|tower| tower.projectile.is_none());
            if ready {
                self.scratch.push(Command::FireProjectile {
                    tower: target.tower,
                    target: target.enemy,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn steer_projectile(
    tower: &TowerSnapshot,
    enemies: &EnemyView,
    impact_threshold: f32,
    out: &mut Vec<Command>,
) {
    let Some(projectile) = tower.projectile else {
        return;
    };

    let Some(enemy) = enemies
        .get(projectile.target)
        .filter(|enemy| enemy.is_alive())
    else {
        out.push(Command::DropProjectile { tower: tower.id });
        return;
    };

    let step = step_toward(projectile.position, enemy.position, projectile.speed);
    if step.position.distance(enemy.position) < impact_threshold {
        out.push(Command::ResolveImpact { tower: tower.id });
    } else {
        out.push(Command::MoveProjectile {
            tower: tower.id,
            position: step.position,
        });
    }
}
