//! # grid_replay
//!
//! Single-source shortest paths on a 4-connected grid, computed with
//! [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm) and packaged as
//! a replayable timeline. Every step costs the same, so the search also records the exact order
//! in which cells were finalized; together with the reconstructed path this is laid out as a
//! sequence of timed reveal events that a renderer can play back, pause by not polling, or
//! cancel.
//!
//! ```
//! use grid_replay::{search, Grid, PlaybackConfig};
//! use grid_util::Point;
//!
//! let grid = Grid::new(3, 3, Point::new(0, 0), Point::new(2, 2))
//!     .unwrap()
//!     .toggle_wall(Point::new(1, 1))
//!     .unwrap();
//! let result = search::run(&grid).unwrap();
//! assert_eq!(result.shortest_path.len(), 5);
//! let timeline = PlaybackConfig::default().timeline(&result);
//! assert_eq!(timeline.len(), result.visitation_order.len() + 5);
//! ```
pub mod dijkstra;
pub mod error;
pub mod grid;
pub mod layout;
pub mod playback;
pub mod search;
pub mod session;

pub use error::{GridError, SearchError};
pub use grid::{Cell, Distance, Grid};
pub use layout::Layout;
pub use playback::{
    build_timeline, Clock, PlaybackConfig, PlaybackHandle, RevealKind, Scheduler, SystemClock,
    Timeline, TimelineEvent, VirtualClock,
};
pub use search::{reconstruct_path, SearchResult};
pub use session::{BrushMode, Session, Visualization};

/// Delay between two reveals of explored cells.
pub const DEFAULT_STEP_INTERVAL_MILLIS: u64 = 10;
/// Delay between two reveals of path cells.
pub const DEFAULT_PATH_INTERVAL_MILLIS: u64 = 50;
/// Side of a rendered cell, used to fit a grid into a viewport.
pub const CELL_SIZE_PX: u32 = 26;
/// Vertical space above the grid reserved for controls.
pub const HEADER_HEIGHT_PX: u32 = 150;
