use crate::error::GridError;
use core::fmt;
use grid_util::Point;
use itertools::{iproduct, Itertools};
use log::debug;
use petgraph::unionfind::UnionFind;
use std::sync::Arc;

/// Offsets of the 4-neighbourhood as `(dx, dy)`, in the order up, down, left, right. The search
/// relaxes neighbours in this order, which fixes the visitation order among equal distances.
const NEUMANN_OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Tentative distance of a cell from the start. [Distance::Infinite] orders after every finite
/// distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Distance {
    Finite(u32),
    #[default]
    Infinite,
}

impl Distance {
    pub fn finite(self) -> Option<u32> {
        match self {
            Distance::Finite(d) => Some(d),
            Distance::Infinite => None,
        }
    }
    pub fn is_infinite(self) -> bool {
        self == Distance::Infinite
    }
}

/// Per-cell storage. Start and target are held by the [Grid] itself so that there is always
/// exactly one of each.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) is_wall: bool,
    pub(crate) tentative_distance: Distance,
    pub(crate) visited: bool,
    pub(crate) parent: Option<Point>,
}

impl Node {
    fn cleared(self) -> Node {
        Node {
            is_wall: self.is_wall,
            ..Node::default()
        }
    }
}

/// A read-only view of one cell of a [Grid].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub position: Point,
    pub is_start: bool,
    pub is_target: bool,
    pub is_wall: bool,
    pub tentative_distance: Distance,
    pub visited: bool,
    pub parent: Option<Point>,
}

impl Cell {
    pub fn row(&self) -> usize {
        self.position.y as usize
    }
    pub fn col(&self) -> usize {
        self.position.x as usize
    }
}

/// A fixed-size, row-major grid of cells with exactly one start and one target. Points use `x`
/// for the column and `y` for the row.
///
/// [Grid] has value semantics: every mutator returns a new grid and leaves `self` untouched.
/// Cell storage is shared between copies until one of them is changed, so handing a grid to a
/// search and then editing the original is cheap and never affects the running search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    start: Point,
    target: Point,
    nodes: Arc<Vec<Node>>,
}

impl Grid {
    /// Creates a grid without walls. Fails if either dimension is zero or if the start or target
    /// lies outside the grid.
    pub fn new(rows: usize, cols: usize, start: Point, target: Point) -> Result<Grid, GridError> {
        if rows == 0 || cols == 0 || rows > i32::MAX as usize || cols > i32::MAX as usize {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        let grid = Grid {
            rows,
            cols,
            start,
            target,
            nodes: Arc::new(vec![Node::default(); rows * cols]),
        };
        for marker in [start, target] {
            if !grid.in_bounds(marker) {
                return Err(GridError::InvalidPlacement { cell: marker });
            }
        }
        debug!("Created {}x{} grid, start {} target {}", rows, cols, start, target);
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn start(&self) -> Point {
        self.start
    }
    pub fn target(&self) -> Point {
        self.target
    }
    /// Number of cells, which also bounds the length of any parent chain.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.cols
            && (point.y as usize) < self.rows
    }
    pub(crate) fn index(&self, point: Point) -> Option<usize> {
        self.in_bounds(point)
            .then(|| point.y as usize * self.cols + point.x as usize)
    }
    pub(crate) fn point_at(&self, ix: usize) -> Point {
        Point::new((ix % self.cols) as i32, (ix / self.cols) as i32)
    }
    pub(crate) fn node(&self, point: Point) -> Option<&Node> {
        self.index(point).map(|ix| &self.nodes[ix])
    }
    /// Mutable access to the cell storage, detaching it from other copies first.
    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        Arc::make_mut(&mut self.nodes).as_mut_slice()
    }

    pub fn is_wall(&self, point: Point) -> bool {
        self.node(point).is_some_and(|n| n.is_wall)
    }
    /// In bounds and not a wall.
    pub fn is_open(&self, point: Point) -> bool {
        self.node(point).is_some_and(|n| !n.is_wall)
    }

    pub fn cell(&self, point: Point) -> Option<Cell> {
        self.node(point).map(|node| Cell {
            position: point,
            is_start: point == self.start,
            is_target: point == self.target,
            is_wall: node.is_wall,
            tentative_distance: node.tentative_distance,
            visited: node.visited,
            parent: node.parent,
        })
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        iproduct!(0..self.rows, 0..self.cols)
            .filter_map(move |(row, col)| self.cell(Point::new(col as i32, row as i32)))
    }

    /// Open orthogonal neighbours of `point` in the order up, down, left, right.
    pub fn neighbours(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        NEUMANN_OFFSETS
            .iter()
            .map(move |&(dx, dy)| Point::new(point.x + dx, point.y + dy))
            .filter(move |&p| self.is_open(p))
    }

    fn check_bounds(&self, cell: Point) -> Result<usize, GridError> {
        self.index(cell).ok_or(GridError::InvalidPlacement { cell })
    }

    /// Sets whether `cell` is a wall. The start and target can never be made into walls.
    pub fn set_wall(&self, cell: Point, blocked: bool) -> Result<Grid, GridError> {
        let ix = self.check_bounds(cell)?;
        if blocked && (cell == self.start || cell == self.target) {
            return Err(GridError::IllegalWallPlacement { cell });
        }
        let mut next = self.clone();
        if self.nodes[ix].is_wall != blocked {
            next.nodes_mut()[ix].is_wall = blocked;
            debug!("Wall at {} set to {}", cell, blocked);
        }
        Ok(next)
    }

    /// Flips the wall state of `cell`.
    pub fn toggle_wall(&self, cell: Point) -> Result<Grid, GridError> {
        let ix = self.check_bounds(cell)?;
        self.set_wall(cell, !self.nodes[ix].is_wall)
    }

    /// Places walls on every given cell, failing on the first cell that cannot hold one.
    pub fn with_walls<I>(&self, walls: I) -> Result<Grid, GridError>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut next = self.clone();
        for cell in walls {
            let ix = next.check_bounds(cell)?;
            if cell == next.start || cell == next.target {
                return Err(GridError::IllegalWallPlacement { cell });
            }
            next.nodes_mut()[ix].is_wall = true;
        }
        Ok(next)
    }

    pub fn clear_walls(&self) -> Grid {
        let mut next = self.clone();
        if self.nodes.iter().any(|n| n.is_wall) {
            next.nodes_mut().iter_mut().for_each(|n| n.is_wall = false);
        }
        next
    }

    /// Resets distance, visited flag and parent on every cell, keeping walls and markers.
    pub fn clear_search_state(&self) -> Grid {
        let mut next = self.clone();
        if self.nodes.iter().any(|n| n.cleared() != *n) {
            next.nodes_mut().iter_mut().for_each(|n| *n = n.cleared());
        }
        next
    }

    fn check_marker_cell(&self, cell: Point, other: Point) -> Result<(), GridError> {
        let ix = self.check_bounds(cell)?;
        if self.nodes[ix].is_wall {
            return Err(GridError::CellIsWall { cell });
        }
        if cell == other {
            return Err(GridError::SameAsOther { cell });
        }
        Ok(())
    }

    /// Moves the start marker to `cell` in a single step.
    pub fn relocate_start(&self, cell: Point) -> Result<Grid, GridError> {
        if cell == self.start {
            return Ok(self.clone());
        }
        self.check_marker_cell(cell, self.target)?;
        debug!("Start moved from {} to {}", self.start, cell);
        Ok(Grid {
            start: cell,
            ..self.clone()
        })
    }

    /// Moves the target marker to `cell` in a single step.
    pub fn relocate_target(&self, cell: Point) -> Result<Grid, GridError> {
        if cell == self.target {
            return Ok(self.clone());
        }
        self.check_marker_cell(cell, self.start)?;
        debug!("Target moved from {} to {}", self.target, cell);
        Ok(Grid {
            target: cell,
            ..self.clone()
        })
    }

    /// Builds a [UnionFind] structure in which open cells joined by a 4-neighbour step share a
    /// component. Walls stay singletons.
    pub fn components(&self) -> UnionFind<usize> {
        let mut components = UnionFind::new(self.len());
        for (ix, node) in self.nodes.iter().enumerate() {
            if node.is_wall {
                continue;
            }
            let point = self.point_at(ix);
            // Linking right and down is enough to cover every edge once
            for next in [Point::new(point.x + 1, point.y), Point::new(point.x, point.y + 1)] {
                if let Some(next_ix) = self.index(next).filter(|&i| !self.nodes[i].is_wall) {
                    components.union(ix, next_ix);
                }
            }
        }
        components
    }

    /// Checks whether `to` can be reached from `from` through open cells.
    pub fn reachable(&self, from: Point, to: Point) -> bool {
        if !self.is_open(from) || !self.is_open(to) {
            return false;
        }
        match (self.index(from), self.index(to)) {
            (Some(a), Some(b)) => self.components().equiv(a, b),
            _ => false,
        }
    }

    fn glyph(&self, cell: &Cell) -> char {
        if cell.is_start {
            'S'
        } else if cell.is_target {
            'T'
        } else if cell.is_wall {
            '#'
        } else if cell.visited {
            'o'
        } else {
            '.'
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = (0..self.rows as i32)
            .map(|row| {
                (0..self.cols as i32)
                    .filter_map(|col| self.cell(Point::new(col, row)))
                    .map(|cell| self.glyph(&cell))
                    .collect::<String>()
            })
            .join("\n");
        writeln!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: i32, col: i32) -> Point {
        Point::new(col, row)
    }

    #[test]
    fn new_grid_is_clear() {
        let grid = Grid::new(3, 4, p(0, 0), p(2, 3)).unwrap();
        assert_eq!(grid.len(), 12);
        for cell in grid.cells() {
            assert!(!cell.is_wall);
            assert!(!cell.visited);
            assert_eq!(cell.tentative_distance, Distance::Infinite);
            assert_eq!(cell.parent, None);
        }
        assert_eq!(grid.cells().filter(|c| c.is_start).count(), 1);
        assert_eq!(grid.cells().filter(|c| c.is_target).count(), 1);
        assert!(grid.cell(p(2, 3)).unwrap().is_target);
    }

    #[test]
    fn new_grid_rejects_bad_input() {
        assert_eq!(
            Grid::new(0, 4, p(0, 0), p(0, 1)),
            Err(GridError::InvalidDimensions { rows: 0, cols: 4 })
        );
        assert_eq!(
            Grid::new(3, 0, p(0, 0), p(0, 1)),
            Err(GridError::InvalidDimensions { rows: 3, cols: 0 })
        );
        assert_eq!(
            Grid::new(3, 3, p(0, 3), p(0, 1)),
            Err(GridError::InvalidPlacement { cell: p(0, 3) })
        );
        assert_eq!(
            Grid::new(3, 3, p(0, 0), p(-1, 1)),
            Err(GridError::InvalidPlacement { cell: p(-1, 1) })
        );
    }

    #[test]
    fn toggle_wall_flips_and_guards_markers() {
        let grid = Grid::new(3, 3, p(0, 0), p(2, 2)).unwrap();
        let walled = grid.toggle_wall(p(1, 1)).unwrap();
        assert!(walled.is_wall(p(1, 1)));
        assert!(!walled.toggle_wall(p(1, 1)).unwrap().is_wall(p(1, 1)));
        assert_eq!(
            grid.toggle_wall(p(0, 0)),
            Err(GridError::IllegalWallPlacement { cell: p(0, 0) })
        );
        assert_eq!(
            grid.toggle_wall(p(2, 2)),
            Err(GridError::IllegalWallPlacement { cell: p(2, 2) })
        );
        assert_eq!(
            grid.toggle_wall(p(3, 0)),
            Err(GridError::InvalidPlacement { cell: p(3, 0) })
        );
    }

    /// Holders of an older grid never observe later edits.
    #[test]
    fn mutators_leave_snapshot_untouched() {
        let grid = Grid::new(2, 2, p(0, 0), p(1, 1)).unwrap();
        let snapshot = grid.clone();
        let edited = grid.toggle_wall(p(0, 1)).unwrap();
        let moved = edited.relocate_target(p(1, 0)).unwrap();
        assert!(!snapshot.is_wall(p(0, 1)));
        assert_eq!(snapshot.target(), p(1, 1));
        assert_eq!(snapshot, grid);
        assert!(moved.is_wall(p(0, 1)));
        assert_eq!(moved.target(), p(1, 0));
    }

    #[test]
    fn relocation_swaps_marker() {
        let grid = Grid::new(3, 3, p(0, 0), p(2, 2)).unwrap();
        let moved = grid.relocate_start(p(1, 2)).unwrap();
        assert_eq!(moved.start(), p(1, 2));
        assert!(!moved.cell(p(0, 0)).unwrap().is_start);
        assert!(moved.cell(p(1, 2)).unwrap().is_start);
        assert_eq!(moved.cells().filter(|c| c.is_start).count(), 1);
        assert_eq!(grid.relocate_start(p(0, 0)).unwrap(), grid);
    }

    #[test]
    fn relocation_rejects_walls_and_other_marker() {
        let grid = Grid::new(3, 3, p(0, 0), p(2, 2))
            .unwrap()
            .toggle_wall(p(1, 1))
            .unwrap();
        assert_eq!(
            grid.relocate_start(p(1, 1)),
            Err(GridError::CellIsWall { cell: p(1, 1) })
        );
        assert_eq!(
            grid.relocate_target(p(1, 1)),
            Err(GridError::CellIsWall { cell: p(1, 1) })
        );
        assert_eq!(
            grid.relocate_start(p(2, 2)),
            Err(GridError::SameAsOther { cell: p(2, 2) })
        );
        assert_eq!(
            grid.relocate_target(p(0, 0)),
            Err(GridError::SameAsOther { cell: p(0, 0) })
        );
        assert_eq!(
            grid.relocate_target(p(5, 5)),
            Err(GridError::InvalidPlacement { cell: p(5, 5) })
        );
    }

    #[test]
    fn neighbours_are_orthogonal_and_open() {
        let grid = Grid::new(3, 3, p(0, 0), p(2, 2))
            .unwrap()
            .toggle_wall(p(0, 1))
            .unwrap();
        let centre = grid.neighbours(p(1, 1)).collect::<Vec<_>>();
        assert_eq!(centre, vec![p(2, 1), p(1, 0), p(1, 2)]);
        let corner = grid.neighbours(p(0, 0)).collect::<Vec<_>>();
        assert_eq!(corner, vec![p(1, 0)]);
    }

    /// Corresponds to the following grid, where the wall column splits it in two:
    ///  ___
    /// |S#T|
    /// | # |
    ///  ___
    #[test]
    fn components_follow_walls() {
        let grid = Grid::new(2, 3, p(0, 0), p(0, 2))
            .unwrap()
            .with_walls([p(0, 1), p(1, 1)])
            .unwrap();
        assert!(!grid.reachable(p(0, 0), p(0, 2)));
        assert!(grid.reachable(p(0, 0), p(1, 0)));
        assert!(!grid.reachable(p(0, 0), p(0, 1)));
        let open = grid.toggle_wall(p(1, 1)).unwrap();
        assert!(open.reachable(p(0, 0), p(0, 2)));
    }

    #[test]
    fn clear_walls_and_state() {
        let grid = Grid::new(2, 2, p(0, 0), p(1, 1))
            .unwrap()
            .with_walls([p(0, 1)])
            .unwrap();
        let mut dirty = grid.clone();
        dirty.nodes_mut()[0].visited = true;
        dirty.nodes_mut()[0].tentative_distance = Distance::Finite(0);
        let cleared = dirty.clear_search_state();
        assert_eq!(cleared, grid);
        assert!(cleared.is_wall(p(0, 1)));
        assert!(!grid.clear_walls().is_wall(p(0, 1)));
    }

    #[test]
    fn display_marks_cells() {
        let grid = Grid::new(2, 3, p(0, 0), p(1, 2))
            .unwrap()
            .with_walls([p(0, 1)])
            .unwrap();
        assert_eq!(grid.to_string(), "S#.\n..T\n");
    }

    #[test]
    fn distance_orders_infinite_last() {
        assert!(Distance::Finite(u32::MAX) < Distance::Infinite);
        assert!(Distance::Finite(1) < Distance::Finite(2));
        assert_eq!(Distance::Finite(3).finite(), Some(3));
        assert!(Distance::default().is_infinite());
    }
}
