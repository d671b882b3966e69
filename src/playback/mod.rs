//! Turns a finished search into a timeline of reveal events and plays it back against a clock.
//!
//! A [Timeline] is computed once per search and never changes afterwards. Playing it is a
//! cooperative affair: the [Scheduler] owns at most one live playback and delivers whatever is
//! due each time it is polled, so a [VirtualClock] makes the whole thing deterministic.
use crate::search::SearchResult;
use crate::{DEFAULT_PATH_INTERVAL_MILLIS, DEFAULT_STEP_INTERVAL_MILLIS};

pub mod clock;
pub mod scheduler;
pub mod timeline;

pub use clock::{Clock, SystemClock, VirtualClock};
pub use scheduler::{PlaybackHandle, Scheduler};
pub use timeline::{build_timeline, RevealKind, Timeline, TimelineEvent};

/// Spacing between consecutive reveals of each phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlaybackConfig {
    pub step_interval_millis: u64,
    pub path_interval_millis: u64,
}

impl Default for PlaybackConfig {
    fn default() -> PlaybackConfig {
        PlaybackConfig {
            step_interval_millis: DEFAULT_STEP_INTERVAL_MILLIS,
            path_interval_millis: DEFAULT_PATH_INTERVAL_MILLIS,
        }
    }
}

impl PlaybackConfig {
    pub fn new(step_interval_millis: u64, path_interval_millis: u64) -> PlaybackConfig {
        PlaybackConfig {
            step_interval_millis,
            path_interval_millis,
        }
    }

    /// Builds the timeline of `result` with these intervals.
    pub fn timeline(&self, result: &SearchResult) -> Timeline {
        build_timeline(
            &result.visitation_order,
            &result.shortest_path,
            self.step_interval_millis,
            self.path_interval_millis,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::search::run;
    use grid_util::Point;

    #[test]
    fn default_intervals() {
        let config = PlaybackConfig::default();
        assert_eq!(config.step_interval_millis, 10);
        assert_eq!(config.path_interval_millis, 50);
    }

    #[test]
    fn timeline_from_result() {
        let grid = Grid::new(3, 3, Point::new(0, 0), Point::new(2, 2)).unwrap();
        let result = run(&grid).unwrap();
        let timeline = PlaybackConfig::default().timeline(&result);
        assert_eq!(timeline.len(), 9 + 5);
        // 9 visited reveals at 0..=80, then the path from 90 in steps of 50
        assert_eq!(timeline.events()[8].due_at_millis, 80);
        assert_eq!(timeline.events()[9].due_at_millis, 90);
        assert_eq!(timeline.duration_millis(), 90 + 4 * 50);
    }
}
