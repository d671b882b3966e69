use grid_replay::{search, Grid};
use grid_util::Point;

// In this example the target is enclosed:
//  _____
// |S    |
// |  #  |
// | #T# |
// |  #  |
//  _____
// The search explores every reachable cell and reports an empty path.
fn main() {
    let grid = Grid::new(4, 5, Point::new(0, 0), Point::new(2, 2))
        .unwrap()
        .with_walls([
            Point::new(2, 1),
            Point::new(1, 2),
            Point::new(3, 2),
            Point::new(2, 3),
        ])
        .unwrap();
    println!("{}", grid);
    println!(
        "Reachable according to components: {}",
        grid.reachable(grid.start(), grid.target())
    );
    let result = search::run(&grid).unwrap();
    println!(
        "Visited {} cells, path: {:?}",
        result.visitation_order.len(),
        result.shortest_path
    );
    println!("{}", result.grid);
}
