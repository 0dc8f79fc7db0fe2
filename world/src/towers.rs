//! Authoritative tower and projectile state.

use std::collections::BTreeMap;

use glam::Vec2;
use grid_defence_core::{
    config::TowerConfig, CellCoord, Cooldown, EnemyId, ProjectileSnapshot, TowerId, TowerSnapshot,
};

/// Projectile in flight, owned by exactly one tower.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ProjectileState {
    pub(crate) target: EnemyId,
    pub(crate) position: Vec2,
    pub(crate) speed: f32,
}

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    pub(crate) id: TowerId,
    pub(crate) cell: CellCoord,
    pub(crate) range_cells: f32,
    pub(crate) damage: u32,
    pub(crate) cooldown: Cooldown,
    pub(crate) projectile: Option<ProjectileState>,
}

impl TowerState {
    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            cell: self.cell,
            range_cells: self.range_cells,
            damage: self.damage,
            cooldown: self.cooldown,
            projectile: self.projectile.map(|projectile| ProjectileSnapshot {
                target: projectile.target,
                position: projectile.position,
                speed: projectile.speed,
            }),
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Builds a tower on `cell` using the shared tower parameters.
    pub(crate) fn insert(&mut self, cell: CellCoord, template: &TowerConfig) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));

        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                cell,
                range_cells: template.range_cells,
                damage: template.damage,
                cooldown: Cooldown::new(template.cooldown_ticks),
                projectile: None,
            },
        );
        id
    }

    pub(crate) fn occupies(&self, cell: CellCoord) -> bool {
        self.entries.values().any(|tower| tower.cell == cell)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }
}
