use crate::error::GridError;
use crate::grid::Grid;
use crate::{CELL_SIZE_PX, HEADER_HEIGHT_PX};
use grid_util::Point;

/// Where the start and target sit by default, as fractions of the usable extent.
const MARKER_ROW_FRACTION: f64 = 0.5;
const START_COL_FRACTION: f64 = 0.35;
const TARGET_COL_FRACTION: f64 = 0.65;
/// Cells trimmed off each axis before the fractions are applied.
const MARKER_MARGIN_CELLS: f64 = 3.0;

/// Grid dimensions and default marker placement derived from the size of the drawing area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub rows: usize,
    pub cols: usize,
    pub start: Point,
    pub target: Point,
}

impl Layout {
    /// Fits square cells of [CELL_SIZE_PX] into a viewport of the given size, below a header
    /// of [HEADER_HEIGHT_PX]. Start and target share a row halfway down, a bit left and right
    /// of the centre.
    pub fn from_viewport(width_px: u32, height_px: u32) -> Result<Layout, GridError> {
        let rows = (height_px.saturating_sub(HEADER_HEIGHT_PX) / CELL_SIZE_PX) as usize;
        let cols = (width_px / CELL_SIZE_PX) as usize;
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        let row = marker_index(height_px, MARKER_ROW_FRACTION, rows);
        Ok(Layout {
            rows,
            cols,
            start: Point::new(marker_index(width_px, START_COL_FRACTION, cols), row),
            target: Point::new(marker_index(width_px, TARGET_COL_FRACTION, cols), row),
        })
    }

    pub fn grid(&self) -> Result<Grid, GridError> {
        Grid::new(self.rows, self.cols, self.start, self.target)
    }
}

fn marker_index(extent_px: u32, fraction: f64, len: usize) -> i32 {
    let cells = extent_px as f64 / CELL_SIZE_PX as f64 - MARKER_MARGIN_CELLS;
    let ix = (cells * fraction).floor().max(0.0) as usize;
    ix.min(len - 1) as i32
}
