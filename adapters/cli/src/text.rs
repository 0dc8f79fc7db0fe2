//! Plain-text rendering backend that draws the grid as ASCII art.

use std::{fmt::Write as _, io::Write};

use anyhow::{Context, Result};
use grid_defence_core::CellCoord;
use grid_defence_rendering::{RenderingBackend, Scene};

const EMPTY: char = '.';
const START: char = 'S';
const TARGET: char = 'T';
const OBSTACLE: char = '#';
const TOWER: char = '^';
const PROJECTILE: char = '*';
const ENEMY: char = 'e';

/// Writes every `every`-th frame to the wrapped writer. An interval of zero
/// disables output.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    writer: W,
    every: u64,
}

impl<W: Write> TextBackend<W> {
    pub(crate) const fn new(writer: W, every: u64) -> Self {
        Self { writer, every }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        if self.every == 0 || scene.tick % self.every != 0 {
            return Ok(());
        }

        self.writer
            .write_all(render(scene).as_bytes())
            .context("failed to write frame")?;
        self.writer.flush().context("failed to flush frame")
    }
}

/// Draws the scene as a status line followed by one text row per grid row.
pub(crate) fn render(scene: &Scene) -> String {
    let columns = scene.geometry.columns();
    let rows = scene.geometry.rows();
    let mut glyphs = vec![EMPTY; (columns * rows) as usize];
    let mut put = |cell: CellCoord, glyph: char| {
        if cell.column() < columns && cell.row() < rows {
            glyphs[(cell.row() * columns + cell.column()) as usize] = glyph;
        }
    };

    put(scene.start, START);
    put(scene.target, TARGET);
    for &cell in &scene.obstacles {
        put(cell, OBSTACLE);
    }
    for tower in &scene.towers {
        put(tower.cell, TOWER);
    }
    for position in scene.towers.iter().filter_map(|tower| tower.projectile) {
        if let Some(cell) = scene.geometry.pixel_to_cell(position) {
            put(cell, PROJECTILE);
        }
    }
    for enemy in scene.alive_enemies() {
        if let Some(cell) = scene.enemy_cell(enemy) {
            put(cell, ENEMY);
        }
    }

    let mut frame = String::new();
    let _ = writeln!(
        frame,
        "tick {} | life {} | enemies {}",
        scene.tick,
        scene.player_life,
        scene.alive_enemies().count()
    );
    for row in glyphs.chunks(columns as usize) {
        frame.extend(row);
        frame.push('\n');
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use grid_defence_core::{
        geometry::GridGeometry, EnemyId, EnemyStatus, Health, TowerId,
    };
    use grid_defence_rendering::{SceneEnemy, SceneTower};

    fn scene(tick: u64) -> Scene {
        Scene {
            geometry: GridGeometry::try_new(4, 3, 40.0, 30.0).expect("valid geometry"),
            obstacles: vec![CellCoord::new(1, 1)],
            start: CellCoord::new(0, 0),
            target: CellCoord::new(3, 2),
            enemies: vec![
                SceneEnemy {
                    id: EnemyId::new(0),
                    position: Vec2::new(25.0, 5.0),
                    status: EnemyStatus::Alive,
                    health: Health::new(10),
                    max_health: Health::new(10),
                    facing: Some(Vec2::X),
                },
                SceneEnemy {
                    id: EnemyId::new(1),
                    position: Vec2::new(5.0, 25.0),
                    status: EnemyStatus::Escaped,
                    health: Health::new(10),
                    max_health: Health::new(10),
                    facing: None,
                },
            ],
            towers: vec![SceneTower {
                id: TowerId::new(0),
                cell: CellCoord::new(2, 1),
                range_pixels: 20.0,
                projectile: Some(Vec2::new(35.0, 15.0)),
            }],
            player_life: 7,
            tick,
        }
    }

    #[test]
    fn renders_grid_with_status_line() {
        let expected = "\
tick 3 | life 7 | enemies 1
S.e.
.#^*
...T
";
        assert_eq!(render(&scene(3)), expected);
    }

    #[test]
    fn writes_only_on_interval() {
        let mut backend = TextBackend::new(Vec::new(), 2);
        for tick in 1..=4 {
            backend.present(&scene(tick)).expect("write succeeds");
        }
        let output = String::from_utf8(backend.into_inner()).expect("utf8");
        assert_eq!(output.matches("tick").count(), 2);
        assert!(output.starts_with("tick 2"));
    }

    #[test]
    fn zero_interval_is_silent() {
        let mut backend = TextBackend::new(Vec::new(), 0);
        backend.present(&scene(5)).expect("nothing to write");
        assert!(backend.into_inner().is_empty());
    }
}
