use grid_replay::{BrushMode, Layout, PlaybackConfig, RevealKind, Session, SystemClock};
use grid_util::Point;

// Plays a search on a small viewport in real time, printing each reveal as it fires. A wall
// column right of the start is painted the way a user would drag it, leaving a gap at the top.
fn main() {
    let layout = Layout::from_viewport(260, 254).unwrap();
    let mut session = Session::from_layout(&layout, PlaybackConfig::new(20, 60), SystemClock::new())
        .unwrap();
    let wall_col = layout.start.x + 1;
    session
        .pointer_down(BrushMode::Wall, Point::new(wall_col, 0))
        .unwrap();
    for row in 1..layout.rows as i32 {
        session
            .pointer_enter(BrushMode::Wall, Point::new(wall_col, row))
            .unwrap();
    }
    session.pointer_up();
    session
        .pointer_down(BrushMode::Wall, Point::new(wall_col, 0))
        .unwrap();
    session.pointer_up();
    println!("{}", session.grid());

    let run = session
        .visualize(|cell, kind| {
            let label = match kind {
                RevealKind::Visited => "visited",
                RevealKind::OnPath => "path",
            };
            println!("{label:>8} ({}, {})", cell.y, cell.x);
        })
        .unwrap();
    session.run_playback();
    println!(
        "{} cells visited, path of {} cells, {} ms of playback",
        run.result.visitation_order.len(),
        run.result.shortest_path.len(),
        run.timeline.duration_millis()
    );
    println!("{}", run.result.grid);
}
