use grid_replay::{search, Clock, Grid, PlaybackConfig, Scheduler, VirtualClock};
use grid_util::Point;

// Steps through a playback frame by frame with a virtual clock, the way a renderer running at
// a fixed frame rate would, and stops it halfway.
fn main() {
    let grid = Grid::new(6, 6, Point::new(0, 0), Point::new(5, 5)).unwrap();
    let result = search::run(&grid).unwrap();
    let timeline = PlaybackConfig::default().timeline(&result);

    let clock = VirtualClock::new();
    let mut scheduler = Scheduler::new(clock.clone());
    let handle = scheduler.play(timeline.clone(), |cell, kind| {
        println!("  {:?} ({}, {})", kind, cell.y, cell.x)
    });
    const FRAME_MILLIS: u64 = 16;
    while scheduler.is_playing() {
        clock.advance(FRAME_MILLIS);
        println!("frame at {} ms", clock.now_millis());
        scheduler.poll();
        if clock.now_millis() >= timeline.duration_millis() / 2 {
            handle.cancel();
        }
    }
    println!(
        "delivered {} of {} events before cancelling",
        handle.delivered(),
        timeline.len()
    );
}
