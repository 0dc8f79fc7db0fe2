#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use glam::Vec2;
use grid_defence_core::{
    geometry::GridGeometry, EnemyId, EnemyView, TowerId, TowerTarget, TowerView,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes targets for every tower that is ready to fire on `tick`.
    ///
    /// A tower is ready when it has no projectile in flight and its cooldown
    /// elapsed. Each ready tower selects the alive enemy with the smallest
    /// identifier whose position lies within its range. The output buffer is
    /// cleared before populating it with the latest assignments.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        enemies: &EnemyView,
        geometry: &GridGeometry,
        tick: u64,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if towers.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_tower_workspace(towers, geometry, tick);
        if self.tower_workspace.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in &self.tower_workspace {
            let selected = self
                .enemy_workspace
                .iter()
                .find(|candidate| candidate.position.distance_squared(tower.center) <= tower.range_sq);

            if let Some(candidate) = selected {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: candidate.id,
                    tower_center: tower.center,
                    enemy_position: candidate.position,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView, geometry: &GridGeometry, tick: u64) {
        self.tower_workspace.clear();

        for snapshot in towers.iter() {
            if snapshot.projectile.is_some() || !snapshot.cooldown.is_ready(tick) {
                continue;
            }

            let range = geometry.cells_to_pixels(snapshot.range_cells);
            self.tower_workspace.push(TowerWorkspace {
                id: snapshot.id,
                center: geometry.cell_to_pixel(snapshot.cell),
                range_sq: range * range,
            });
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();

        for snapshot in enemies.iter().filter(|enemy| enemy.is_alive()) {
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: TowerId,
    center: Vec2,
    range_sq: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_defence_core::{
        CellCoord, Cooldown, EnemySnapshot, EnemyStatus, Health, ProjectileSnapshot, TowerSnapshot,
    };

    fn geometry() -> GridGeometry {
        GridGeometry::try_new(10, 10, 100.0, 100.0).expect("valid geometry")
    }

    fn tower_snapshot(id: u32, cell: (u32, u32), range_cells: f32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            cell: CellCoord::new(cell.0, cell.1),
            range_cells,
            damage: 10,
            cooldown: Cooldown::new(5),
            projectile: None,
        }
    }

    fn enemy_snapshot(id: u32, position: (f32, f32)) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            position: Vec2::new(position.0, position.1),
            health: Health::new(100),
            max_health: Health::new(100),
            status: EnemyStatus::Alive,
            speed: 1.0,
            path: None,
            cursor: 0,
            leg_origin: Vec2::new(position.0, position.1),
            leg_ticks: 0,
            facing: None,
        }
    }

    fn targets(towers: Vec<TowerSnapshot>, enemies: Vec<EnemySnapshot>, tick: u64) -> Vec<TowerTarget> {
        let mut system = TowerTargeting::new();
        let mut out = Vec::new();
        system.handle(
            &TowerView::from_snapshots(towers),
            &EnemyView::from_snapshots(enemies),
            &geometry(),
            tick,
            &mut out,
        );
        out
    }

    #[test]
    fn targets_enemy_within_range() {
        let out = targets(
            vec![tower_snapshot(1, (5, 5), 2.0)],
            vec![enemy_snapshot(2, (75.0, 55.0))],
            0,
        );

        assert_eq!(
            out,
            vec![TowerTarget {
                tower: TowerId::new(1),
                enemy: EnemyId::new(2),
                tower_center: Vec2::new(55.0, 55.0),
                enemy_position: Vec2::new(75.0, 55.0),
            }]
        );
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let inside = targets(
            vec![tower_snapshot(1, (5, 5), 2.0)],
            vec![enemy_snapshot(1, (55.0, 75.0))],
            0,
        );
        assert_eq!(inside.len(), 1);

        let outside = targets(
            vec![tower_snapshot(1, (5, 5), 2.0)],
            vec![enemy_snapshot(1, (55.0, 75.5))],
            0,
        );
        assert!(outside.is_empty());
    }

    #[test]
    fn smallest_enemy_id_wins_regardless_of_distance() {
        let out = targets(
            vec![tower_snapshot(1, (5, 5), 3.0)],
            vec![
                enemy_snapshot(7, (56.0, 55.0)),
                enemy_snapshot(3, (75.0, 65.0)),
            ],
            0,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(3));
    }

    #[test]
    fn terminal_enemies_are_ignored() {
        let mut dead = enemy_snapshot(1, (55.0, 55.0));
        dead.status = EnemyStatus::Dead;
        let out = targets(
            vec![tower_snapshot(1, (5, 5), 2.0)],
            vec![dead, enemy_snapshot(2, (60.0, 55.0))],
            0,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(2));
    }

    #[test]
    fn towers_on_cooldown_do_not_target() {
        let mut tower = tower_snapshot(1, (5, 5), 2.0);
        tower.cooldown.record(10);
        let enemies = vec![enemy_snapshot(1, (55.0, 55.0))];

        assert!(targets(vec![tower], enemies.clone(), 14).is_empty());
        assert_eq!(targets(vec![tower], enemies, 15).len(), 1);
    }

    #[test]
    fn towers_with_projectile_in_flight_do_not_target() {
        let mut tower = tower_snapshot(1, (5, 5), 2.0);
        tower.projectile = Some(ProjectileSnapshot {
            target: EnemyId::new(1),
            position: Vec2::new(55.0, 55.0),
            speed: 4.0,
        });
        assert!(targets(vec![tower], vec![enemy_snapshot(1, (55.0, 55.0))], 0).is_empty());
    }

    #[test]
    fn each_tower_targets_independently() {
        let out = targets(
            vec![tower_snapshot(2, (8, 8), 1.0), tower_snapshot(1, (1, 1), 1.0)],
            vec![
                enemy_snapshot(1, (85.0, 85.0)),
                enemy_snapshot(2, (15.0, 15.0)),
            ],
            0,
        );
        let pairs: Vec<_> = out
            .iter()
            .map(|target| (target.tower.get(), target.enemy.get()))
            .collect();
        assert_eq!(pairs, vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn stale_output_is_cleared() {
        let mut system = TowerTargeting::new();
        let mut out = vec![TowerTarget {
            tower: TowerId::new(99),
            enemy: EnemyId::new(99),
            tower_center: Vec2::ZERO,
            enemy_position: Vec2::ZERO,
        }];
        system.handle(
            &TowerView::default(),
            &EnemyView::default(),
            &geometry(),
            0,
            &mut out,
        );
        assert!(out.is_empty());
    }
}
