#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that translates pointer gestures into world commands.
//!
//! The translator only resolves pixel positions into cells. Whether a spawn or
//! placement is legal is decided by the world when the command is applied.

use glam::Vec2;
use grid_defence_core::{geometry::GridGeometry, CellCoord, Command};

/// Structure the player can drag onto the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementItem {
    /// Impassable obstacle.
    Obstacle,
    /// Tower, which must be dropped onto an existing obstacle.
    Tower,
}

/// Pointer gesture captured by an adapter during a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    /// The player clicked the canvas, requesting an enemy spawn.
    Click {
        /// Pointer position in canvas pixels.
        position: Vec2,
    },
    /// The player dropped a dragged structure onto the canvas.
    Drop {
        /// Structure that was dragged.
        item: PlacementItem,
        /// Pointer position in canvas pixels.
        position: Vec2,
    },
}

impl PointerInput {
    /// Creates a click gesture at the provided canvas position.
    #[must_use]
    pub const fn click(position: Vec2) -> Self {
        Self::Click { position }
    }

    /// Creates a drop gesture at the provided canvas position.
    #[must_use]
    pub const fn drop_item(item: PlacementItem, position: Vec2) -> Self {
        Self::Drop { item, position }
    }

    const fn position(&self) -> Vec2 {
        match self {
            Self::Click { position } | Self::Drop { position, .. } => *position,
        }
    }

    fn command(&self, cell: CellCoord) -> Command {
        match self {
            Self::Click { .. } => Command::SpawnEnemy { cell },
            Self::Drop {
                item: PlacementItem::Obstacle,
                ..
            } => Command::PlaceObstacle { cell },
            Self::Drop {
                item: PlacementItem::Tower,
                ..
            } => Command::PlaceTower { cell },
        }
    }
}

/// System that resolves pointer gestures against the grid geometry.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputTranslator;

impl InputTranslator {
    /// Creates a new input translator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits one command per gesture that lands on the grid, in input order.
    ///
    /// Gestures outside the grid are dropped.
    pub fn handle(&self, geometry: &GridGeometry, input: &[PointerInput], out: &mut Vec<Command>) {
        for gesture in input {
            if let Some(cell) = geometry.pixel_to_cell(gesture.position()) {
                out.push(gesture.command(cell));
            }
        }
    }
}
