#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first path search across the obstacle grid.
//!
//! Neighbours are expanded east, south, west, then north. Among several
//! shortest routes the search therefore always returns the same one, which
//! keeps enemy movement reproducible between runs.

use std::collections::VecDeque;

use grid_defence_core::{CellCoord, Direction, NavigationError, ObstacleGrid, Path};

const EXPANSION_ORDER: [Direction; 4] = [
    Direction::East,
    Direction::South,
    Direction::West,
    Direction::North,
];

/// Computes the shortest 4-connected path from `start` to `end`.
///
/// Returns `None` when either endpoint is blocked or outside the grid, or when
/// the obstacles separate the two cells. A path from a cell to itself contains
/// that single cell.
#[must_use]
pub fn find_path(grid: &ObstacleGrid, start: CellCoord, end: CellCoord) -> Option<Path> {
    Navigator::default().find_path(grid, start, end)
}

/// Computes the shortest path, reporting unreachable endpoints as an error.
pub fn try_find_path(
    grid: &ObstacleGrid,
    start: CellCoord,
    end: CellCoord,
) -> Result<Path, NavigationError> {
    Navigator::default().try_find_path(grid, start, end)
}

/// Path search with reusable scratch buffers.
///
/// The buffers are resized to the searched grid on every call, so a single
/// navigator can serve grids of different dimensions.
#[derive(Clone, Debug, Default)]
pub struct Navigator {
    visited: Vec<bool>,
    predecessors: Vec<Option<CellCoord>>,
    queue: VecDeque<CellCoord>,
}

impl Navigator {
    /// Computes the shortest 4-connected path from `start` to `end`.
    pub fn find_path(
        &mut self,
        grid: &ObstacleGrid,
        start: CellCoord,
        end: CellCoord,
    ) -> Option<Path> {
        if grid.is_blocked(start) || grid.is_blocked(end) {
            return None;
        }

        if start == end {
            return Path::from_cells(vec![start]);
        }

        self.reset(grid.cell_count());

        let start_index = grid.index(start)?;
        self.visited[start_index] = true;
        self.queue.push_back(start);

        while let Some(cell) = self.queue.pop_front() {
            if cell == end {
                return self.reconstruct(grid, start, end);
            }

            for direction in EXPANSION_ORDER {
                let Some(neighbor) = cell.neighbor(direction, grid.columns(), grid.rows()) else {
                    continue;
                };

                if grid.is_blocked(neighbor) {
                    continue;
                }

                let Some(index) = grid.index(neighbor) else {
                    continue;
                };

                if self.visited[index] {
                    continue;
                }

                self.visited[index] = true;
                self.predecessors[index] = Some(cell);
                self.queue.push_back(neighbor);
            }
        }

        None
    }

    /// Computes the shortest path, reporting unreachable endpoints as an error.
    pub fn try_find_path(
        &mut self,
        grid: &ObstacleGrid,
        start: CellCoord,
        end: CellCoord,
    ) -> Result<Path, NavigationError> {
        self.find_path(grid, start, end)
            .ok_or(NavigationError::Unreachable { start, end })
    }

    fn reset(&mut self, cell_count: usize) {
        self.visited.clear();
        self.visited.resize(cell_count, false);
        self.predecessors.clear();
        self.predecessors.resize(cell_count, None);
        self.queue.clear();
    }

    fn reconstruct(&self, grid: &ObstacleGrid, start: CellCoord, end: CellCoord) -> Option<Path> {
        let mut cells = vec![end];
        let mut current = end;

        while current != start {
            let index = grid.index(current)?;
            current = self.predecessors.get(index).copied().flatten()?;
            cells.push(current);
        }

        cells.reverse();
        Path::from_cells(cells)
    }
}
