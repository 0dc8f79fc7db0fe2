//! Conversion between discrete grid cells and continuous pixel positions.

use glam::Vec2;
use thiserror::Error;

use crate::CellCoord;

/// Reasons a grid geometry cannot be constructed.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum GeometryError {
    /// The grid has no columns or no rows.
    #[error("grid of {columns}x{rows} cells has no area")]
    EmptyGrid {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
    /// The canvas is too small to hold a single pixel per cell.
    #[error("canvas of {width}x{height} pixels cannot hold the grid")]
    InvalidCanvas {
        /// Requested canvas width.
        width: f32,
        /// Requested canvas height.
        height: f32,
    },
}

/// Placement of a square-celled grid inside a canvas.
///
/// Cells are squares whose side is the largest size that fits both canvas
/// axes. The grid is centred inside the canvas, so `origin` is non-zero on
/// the axis that has leftover space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    columns: u32,
    rows: u32,
    cell_size: f32,
    origin: Vec2,
}

impl GridGeometry {
    /// Lays out a `columns × rows` grid centred within the provided canvas.
    pub fn try_new(
        columns: u32,
        rows: u32,
        canvas_width: f32,
        canvas_height: f32,
    ) -> Result<Self, GeometryError> {
        if columns == 0 || rows == 0 {
            return Err(GeometryError::EmptyGrid { columns, rows });
        }

        let cell_size = (canvas_width / columns as f32).min(canvas_height / rows as f32);
        if !cell_size.is_finite() || cell_size < 1.0 {
            return Err(GeometryError::InvalidCanvas {
                width: canvas_width,
                height: canvas_height,
            });
        }

        let origin = Vec2::new(
            (canvas_width - cell_size * columns as f32) / 2.0,
            (canvas_height - cell_size * rows as f32) / 2.0,
        );

        Ok(Self {
            columns,
            rows,
            cell_size,
            origin,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Pixel position of the grid's top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Reports whether the cell lies within the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Converts a distance measured in cells into pixels.
    #[must_use]
    pub fn cells_to_pixels(&self, cells: f32) -> f32 {
        cells * self.cell_size
    }

    /// Pixel position of the centre of `cell`.
    #[must_use]
    pub fn cell_to_pixel(&self, cell: CellCoord) -> Vec2 {
        let half = self.cell_size / 2.0;
        self.origin
            + Vec2::new(
                cell.column() as f32 * self.cell_size + half,
                cell.row() as f32 * self.cell_size + half,
            )
    }

    /// Cell containing the pixel position, or `None` when the position lies
    /// outside the grid.
    #[must_use]
    pub fn pixel_to_cell(&self, position: Vec2) -> Option<CellCoord> {
        let local = (position - self.origin) / self.cell_size;
        if !local.x.is_finite() || !local.y.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }

        let column = local.x.floor() as u32;
        let row = local.y.floor() as u32;
        let cell = CellCoord::new(column, row);
        self.contains(cell).then_some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_canvas_uses_whole_area() {
        let geometry = GridGeometry::try_new(10, 10, 800.0, 800.0).expect("valid geometry");
        assert_eq!(geometry.cell_size(), 80.0);
        assert_eq!(geometry.origin(), Vec2::ZERO);
        assert_eq!(
            geometry.cell_to_pixel(CellCoord::new(0, 0)),
            Vec2::new(40.0, 40.0)
        );
        assert_eq!(
            geometry.cell_to_pixel(CellCoord::new(9, 9)),
            Vec2::new(760.0, 760.0)
        );
    }

    #[test]
    fn wide_canvas_centres_grid_horizontally() {
        let geometry = GridGeometry::try_new(10, 10, 800.0, 600.0).expect("valid geometry");
        assert_eq!(geometry.cell_size(), 60.0);
        assert_eq!(geometry.origin(), Vec2::new(100.0, 0.0));
        assert_eq!(
            geometry.cell_to_pixel(CellCoord::new(0, 0)),
            Vec2::new(130.0, 30.0)
        );
    }

    #[test]
    fn positions_outside_grid_have_no_cell() {
        let geometry = GridGeometry::try_new(10, 10, 800.0, 600.0).expect("valid geometry");
        assert_eq!(geometry.pixel_to_cell(Vec2::new(50.0, 50.0)), None);
        assert_eq!(geometry.pixel_to_cell(Vec2::new(700.0, 10.0)), None);
        assert_eq!(geometry.pixel_to_cell(Vec2::new(150.0, 610.0)), None);
        assert_eq!(
            geometry.pixel_to_cell(Vec2::new(100.0, 0.0)),
            Some(CellCoord::new(0, 0))
        );
        assert_eq!(
            geometry.pixel_to_cell(Vec2::new(699.9, 599.9)),
            Some(CellCoord::new(9, 9))
        );
    }

    #[test]
    fn degenerate_layouts_are_rejected() {
        assert_eq!(
            GridGeometry::try_new(0, 4, 100.0, 100.0),
            Err(GeometryError::EmptyGrid {
                columns: 0,
                rows: 4
            })
        );
        assert!(matches!(
            GridGeometry::try_new(10, 10, 5.0, 800.0),
            Err(GeometryError::InvalidCanvas { .. })
        ));
    }

    #[test]
    fn range_converts_to_pixels() {
        let geometry = GridGeometry::try_new(4, 4, 200.0, 200.0).expect("valid geometry");
        assert_eq!(geometry.cells_to_pixels(1.5), 75.0);
    }

    proptest::proptest! {
        #[test]
        fn cell_centres_map_back_to_their_cell(
            columns in 1u32..40,
            rows in 1u32..40,
            width in 100.0f32..2000.0,
            height in 100.0f32..2000.0,
            column_seed in 0u32..1000,
            row_seed in 0u32..1000,
        ) {
            let Ok(geometry) = GridGeometry::try_new(columns, rows, width, height) else {
                return Ok(());
            };
            let cell = CellCoord::new(column_seed % columns, row_seed % rows);
            proptest::prop_assert_eq!(geometry.pixel_to_cell(geometry.cell_to_pixel(cell)), Some(cell));
        }
    }
}
