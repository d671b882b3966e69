use grid_util::Point;
use thiserror::Error;

/// Validation failures raised by the [Grid](crate::grid::Grid) constructors and mutators.
/// These are meant to be surfaced to whoever issued the request so it can be corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("a grid needs at least one row and one column, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("cell (row {}, col {}) lies outside the grid", .cell.y, .cell.x)]
    InvalidPlacement { cell: Point },

    #[error("cell (row {}, col {}) holds the start or target and cannot become a wall", .cell.y, .cell.x)]
    IllegalWallPlacement { cell: Point },

    #[error("cell (row {}, col {}) is a wall", .cell.y, .cell.x)]
    CellIsWall { cell: Point },

    #[error("cell (row {}, col {}) already holds the other marker", .cell.y, .cell.x)]
    SameAsOther { cell: Point },
}

/// Failures of the search itself. Unlike [GridError] these indicate a defect and abort the
/// search; an unreachable target is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("parent chain starting at (row {}, col {}) does not lead back to the start", .cell.y, .cell.x)]
    CorruptParentChain { cell: Point },
}
