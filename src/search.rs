use crate::dijkstra::dijkstra_trace;
use crate::error::SearchError;
use crate::grid::{Distance, Grid};
use grid_util::Point;
use log::{debug, info, warn};

/// Cost of a single orthogonal step.
const STEP_COST: u32 = 1;

/// The search state left behind by [explore]: cells in the order they were finalized, and a copy
/// of the input grid carrying the distances and parent links found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exploration {
    pub visitation_order: Vec<Point>,
    pub grid: Grid,
}

/// A complete search: the visitation order, the shortest path from start to target (empty when
/// the target cannot be reached) and the finalized grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub visitation_order: Vec<Point>,
    pub shortest_path: Vec<Point>,
    pub grid: Grid,
}

impl SearchResult {
    pub fn is_reachable(&self) -> bool {
        !self.shortest_path.is_empty()
    }
}

/// Runs Dijkstra's algorithm over the 4-neighbourhood of `grid`, from its start until its target
/// is finalized or every reachable cell has been.
///
/// `grid` itself is not modified: the search state is written to a fresh copy with any earlier
/// search state cleared, which is returned in the [Exploration]. Cells that were relaxed but
/// not finalized before the target was reached keep their tentative distance and parent.
pub fn explore(grid: &Grid) -> Exploration {
    let start = grid.start();
    let target = grid.target();
    let trace = dijkstra_trace(
        &start,
        |&point| grid.neighbours(point).map(|n| (n, STEP_COST)),
        |&point| point == target,
    );

    let mut working = grid.clear_search_state();
    let nodes = working.nodes_mut();
    for discovery in trace.discovered() {
        let Some(ix) = grid.index(*discovery.node) else {
            continue;
        };
        let node = &mut nodes[ix];
        node.tentative_distance = Distance::Finite(discovery.cost);
        node.parent = discovery.parent.copied();
        node.visited = discovery.finalized;
    }
    debug!(
        "Explored {} cells from {}, target {}",
        trace.visited_count(),
        start,
        if trace.reached().is_some() { "reached" } else { "not reached" }
    );
    Exploration {
        visitation_order: trace.visitation_order().copied().collect(),
        grid: working,
    }
}

/// Follows parent links from `target` back to the start of `grid` and returns the cells in
/// start to target order. Returns an empty path if `target` was never reached.
///
/// A chain longer than the number of cells, or one that ends anywhere but the start, can only
/// come from broken search state and is reported as [SearchError::CorruptParentChain].
pub fn reconstruct_path(grid: &Grid, target: Point) -> Result<Vec<Point>, SearchError> {
    let Some(cell) = grid.cell(target) else {
        return Ok(Vec::new());
    };
    if cell.parent.is_none() && target != grid.start() {
        return Ok(Vec::new());
    }
    let mut path = std::iter::successors(Some(target), |&point| {
        grid.cell(point).and_then(|cell| cell.parent)
    })
    .take(grid.len() + 1)
    .collect::<Vec<_>>();
    if path.len() > grid.len() || path.last() != Some(&grid.start()) {
        warn!("Parent chain from {} does not lead back to {}", target, grid.start());
        return Err(SearchError::CorruptParentChain { cell: target });
    }
    path.reverse();
    Ok(path)
}

/// Explores `grid` and reconstructs the path to its target.
pub fn run(grid: &Grid) -> Result<SearchResult, SearchError> {
    let Exploration {
        visitation_order,
        grid,
    } = explore(grid);
    let shortest_path = reconstruct_path(&grid, grid.target())?;
    if shortest_path.is_empty() {
        info!(
            "{} is not reachable from {} ({} cells visited)",
            grid.target(),
            grid.start(),
            visitation_order.len()
        );
    } else {
        info!(
            "Found path of {} cells from {} to {} ({} cells visited)",
            shortest_path.len(),
            grid.start(),
            grid.target(),
            visitation_order.len()
        );
    }
    Ok(SearchResult {
        visitation_order,
        shortest_path,
        grid,
    })
}
