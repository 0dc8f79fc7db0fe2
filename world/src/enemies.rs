//! Authoritative enemy state and identifier allocation.

use std::collections::BTreeMap;

use glam::Vec2;
use grid_defence_core::{EnemyId, EnemySnapshot, EnemyStatus, Health, Path};

/// Enemy stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) id: EnemyId,
    pub(crate) position: Vec2,
    pub(crate) health: Health,
    pub(crate) max_health: Health,
    pub(crate) status: EnemyStatus,
    pub(crate) speed: f32,
    pub(crate) path: Option<Path>,
    pub(crate) cursor: usize,
    pub(crate) leg_origin: Vec2,
    pub(crate) leg_ticks: u32,
    pub(crate) facing: Option<Vec2>,
}

impl EnemyState {
    pub(crate) fn is_alive(&self) -> bool {
        self.status == EnemyStatus::Alive
    }

    /// Starts a new leg from the current position.
    pub(crate) fn restart_leg(&mut self) {
        self.leg_origin = self.position;
        self.leg_ticks = 0;
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            status: self.status,
            speed: self.speed,
            path: self.path.clone(),
            cursor: self.cursor,
            leg_origin: self.leg_origin,
            leg_ticks: self.leg_ticks,
            facing: self.facing,
        }
    }
}

/// Registry that stores enemies in spawn order and allocates identifiers.
#[derive(Debug)]
pub(crate) struct EnemyRegistry {
    entries: BTreeMap<EnemyId, EnemyState>,
    next_enemy_id: EnemyId,
}

impl EnemyRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    /// Inserts a freshly spawned enemy and returns its identifier.
    pub(crate) fn spawn(&mut self, position: Vec2, health: Health, speed: f32, path: Path) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().wrapping_add(1));

        let _ = self.entries.insert(
            id,
            EnemyState {
                id,
                position,
                health,
                max_health: health,
                status: EnemyStatus::Alive,
                speed,
                path: Some(path),
                cursor: 0,
                leg_origin: position,
                leg_ticks: 0,
                facing: None,
            },
        );
        id
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&EnemyState> {
        self.entries.get(&id)
    }

    /// Mutable access to an enemy that is still alive.
    pub(crate) fn alive_mut(&mut self, id: EnemyId) -> Option<&mut EnemyState> {
        self.entries.get_mut(&id).filter(|enemy| enemy.is_alive())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &EnemyState> {
        self.entries.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Removes every dead or escaped enemy, returning their identifiers in
    /// ascending order.
    pub(crate) fn drain_terminal(&mut self) -> Vec<EnemyId> {
        let terminal: Vec<EnemyId> = self
            .entries
            .values()
            .filter(|enemy| !enemy.is_alive())
            .map(|enemy| enemy.id)
            .collect();

        for id in &terminal {
            let _ = self.entries.remove(id);
        }

        terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_defence_core::CellCoord;

    fn single_cell_path() -> Path {
        Path::from_cells(vec![CellCoord::new(0, 0)]).expect("non-empty path")
    }

    #[test]
    fn identifiers_increase_monotonically() {
        let mut registry = EnemyRegistry::new();
        let first = registry.spawn(Vec2::ZERO, Health::new(10), 1.0, single_cell_path());
        let second = registry.spawn(Vec2::ZERO, Health::new(10), 1.0, single_cell_path());
        assert_eq!(first, EnemyId::new(0));
        assert_eq!(second, EnemyId::new(1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn terminal_enemies_are_not_mutable() {
        let mut registry = EnemyRegistry::new();
        let id = registry.spawn(Vec2::ZERO, Health::new(10), 1.0, single_cell_path());
        if let Some(enemy) = registry.alive_mut(id) {
            enemy.status = EnemyStatus::Dead;
        }
        assert!(registry.alive_mut(id).is_none());
        assert!(registry.get(id).is_some());
    }

    #[test]
    fn drain_removes_only_terminal_enemies() {
        let mut registry = EnemyRegistry::new();
        let dead = registry.spawn(Vec2::ZERO, Health::new(10), 1.0, single_cell_path());
        let alive = registry.spawn(Vec2::ZERO, Health::new(10), 1.0, single_cell_path());
        let escaped = registry.spawn(Vec2::ZERO, Health::new(10), 1.0, single_cell_path());
        if let Some(enemy) = registry.alive_mut(dead) {
            enemy.status = EnemyStatus::Dead;
        }
        if let Some(enemy) = registry.alive_mut(escaped) {
            enemy.status = EnemyStatus::Escaped;
        }

        assert_eq!(registry.drain_terminal(), vec![dead, escaped]);
        assert_eq!(registry.iter().map(|enemy| enemy.id).collect::<Vec<_>>(), vec![alive]);
        assert!(registry.drain_terminal().is_empty());
    }
}
