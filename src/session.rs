use crate::error::{GridError, SearchError};
use crate::grid::Grid;
use crate::layout::Layout;
use crate::playback::{Clock, PlaybackConfig, PlaybackHandle, RevealKind, Scheduler, Timeline};
use crate::search::{self, SearchResult};
use grid_util::Point;
use log::{debug, info};

/// What a pointer press does to the cell under it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BrushMode {
    /// Toggle walls, and keep toggling while the pointer is dragged.
    Wall,
    RelocateStart,
    RelocateTarget,
}

/// A search that is being played back.
#[derive(Clone, Debug)]
pub struct Visualization {
    pub result: SearchResult,
    pub timeline: Timeline,
    pub handle: PlaybackHandle,
}

/// The editing session behind one grid on screen: applies brush strokes to the current grid,
/// runs searches on it and keeps the single live playback.
pub struct Session<C: Clock> {
    initial: Grid,
    grid: Grid,
    config: PlaybackConfig,
    scheduler: Scheduler<C>,
    pointer_pressed: bool,
}

impl<C: Clock> Session<C> {
    pub fn new(grid: Grid, config: PlaybackConfig, clock: C) -> Session<C> {
        Session {
            initial: grid.clone(),
            grid,
            config,
            scheduler: Scheduler::new(clock),
            pointer_pressed: false,
        }
    }

    pub fn from_layout(
        layout: &Layout,
        config: PlaybackConfig,
        clock: C,
    ) -> Result<Session<C>, GridError> {
        Ok(Session::new(layout.grid()?, config, clock))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
    pub fn config(&self) -> PlaybackConfig {
        self.config
    }
    pub fn set_config(&mut self, config: PlaybackConfig) {
        self.config = config;
    }
    pub fn scheduler(&self) -> &Scheduler<C> {
        &self.scheduler
    }
    pub fn is_pointer_pressed(&self) -> bool {
        self.pointer_pressed
    }

    /// Applies `brush` to `cell`. A wall brush also starts a drag, so cells entered afterwards
    /// are painted too until [pointer_up](Self::pointer_up).
    pub fn pointer_down(&mut self, brush: BrushMode, cell: Point) -> Result<(), GridError> {
        self.pointer_pressed = brush == BrushMode::Wall;
        self.apply(brush, cell)
    }

    /// Continues a wall drag onto `cell`. Ignored unless the pointer is pressed with a wall brush.
    pub fn pointer_enter(&mut self, brush: BrushMode, cell: Point) -> Result<(), GridError> {
        if !self.pointer_pressed || brush != BrushMode::Wall {
            return Ok(());
        }
        self.apply(brush, cell)
    }

    pub fn pointer_up(&mut self) {
        self.pointer_pressed = false;
    }

    fn apply(&mut self, brush: BrushMode, cell: Point) -> Result<(), GridError> {
        self.grid = match brush {
            BrushMode::Wall => self.grid.toggle_wall(cell)?,
            BrushMode::RelocateStart => self.grid.relocate_start(cell)?,
            BrushMode::RelocateTarget => self.grid.relocate_target(cell)?,
        };
        debug!("Applied {:?} brush at {}", brush, cell);
        Ok(())
    }

    /// Cancels whatever is playing, searches the current grid and starts playing the result.
    /// `on_event` receives every reveal as it comes due on [poll](Self::poll).
    pub fn visualize<F>(&mut self, on_event: F) -> Result<Visualization, SearchError>
    where
        F: FnMut(Point, RevealKind) + 'static,
    {
        self.scheduler.cancel();
        if !self.grid.reachable(self.grid.start(), self.grid.target()) {
            info!(
                "{} is walled off from {}, playback will only show explored cells",
                self.grid.target(),
                self.grid.start()
            );
        }
        let result = search::run(&self.grid)?;
        let timeline = self.config.timeline(&result);
        let handle = self.scheduler.play(timeline.clone(), on_event);
        Ok(Visualization {
            result,
            timeline,
            handle,
        })
    }

    /// Delivers the reveals that are due. See [Scheduler::poll].
    pub fn poll(&mut self) -> usize {
        self.scheduler.poll()
    }

    /// Plays the current playback to its end. See [Scheduler::run].
    pub fn run_playback(&mut self) -> usize {
        self.scheduler.run()
    }

    pub fn cancel_playback(&mut self) {
        self.scheduler.cancel();
    }

    /// Cancels playback and returns to the grid the session started with.
    pub fn reset(&mut self) {
        self.scheduler.cancel();
        self.pointer_pressed = false;
        self.grid = self.initial.clone();
        debug!("Session reset to a {}x{} grid", self.grid.rows(), self.grid.cols());
    }

    /// Cancels playback and starts over on a grid fitted to the new layout.
    pub fn resize(&mut self, layout: &Layout) -> Result<(), GridError> {
        let grid = layout.grid()?;
        self.scheduler.cancel();
        self.pointer_pressed = false;
        self.initial = grid.clone();
        self.grid = grid;
        debug!("Session resized to a {}x{} grid", layout.rows, layout.cols);
        Ok(())
    }
}
