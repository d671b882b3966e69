/// Generic uniform-cost search which, unlike a plain shortest-path routine, records the order in
/// which nodes are finalized so the exploration itself can be replayed. Discovered nodes live in
/// an insertion-ordered map, so the frontier only has to carry indices.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::trace;
use num_traits::Zero;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

const NO_PARENT: usize = usize::MAX;

struct SmallestCostHolder<K> {
    cost: K,
    sequence: usize,
    index: usize,
}

impl<K: PartialEq> Eq for SmallestCostHolder<K> {}

impl<K: PartialEq> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cost.eq(&other.cost) && self.sequence == other.sequence
    }
}

impl<K: Ord> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: the smallest cost must compare greatest, and among equal
        // costs the entry pushed first wins
        match other.cost.cmp(&self.cost) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            s => s,
        }
    }
}

struct Record<C> {
    parent: usize,
    cost: C,
    finalized: bool,
}

/// One node discovered during a search, with its best known cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discovery<'a, N, C> {
    pub node: &'a N,
    pub parent: Option<&'a N>,
    pub cost: C,
    pub finalized: bool,
}

/// The outcome of [dijkstra_trace]: every discovered node with its parent and cost, plus the
/// order in which nodes were finalized.
pub struct Trace<N, C> {
    discovered: FxIndexMap<N, Record<C>>,
    order: Vec<usize>,
    goal: Option<usize>,
}

impl<N, C> Trace<N, C>
where
    N: Eq + Hash,
    C: Copy,
{
    /// Nodes in the order they were popped from the frontier with their final cost.
    pub fn visitation_order(&self) -> impl Iterator<Item = &N> + '_ {
        self.order
            .iter()
            .filter_map(|&ix| self.discovered.get_index(ix).map(|(node, _)| node))
    }
    pub fn visited_count(&self) -> usize {
        self.order.len()
    }
    /// The node that satisfied the success predicate, if the search got there.
    pub fn reached(&self) -> Option<&N> {
        self.goal
            .and_then(|ix| self.discovered.get_index(ix))
            .map(|(node, _)| node)
    }
    pub fn cost(&self, node: &N) -> Option<C> {
        self.discovered.get(node).map(|r| r.cost)
    }
    pub fn parent(&self, node: &N) -> Option<&N> {
        self.discovered
            .get(node)
            .and_then(|r| self.discovered.get_index(r.parent))
            .map(|(parent, _)| parent)
    }
    pub fn is_finalized(&self, node: &N) -> bool {
        self.discovered.get(node).is_some_and(|r| r.finalized)
    }
    /// Every discovered node in discovery order, including nodes still on the frontier when the
    /// search stopped.
    pub fn discovered(&self) -> impl Iterator<Item = Discovery<'_, N, C>> + '_ {
        self.discovered.iter().map(|(node, record)| Discovery {
            node,
            parent: self
                .discovered
                .get_index(record.parent)
                .map(|(parent, _)| parent),
            cost: record.cost,
            finalized: record.finalized,
        })
    }
}

/// Runs Dijkstra's algorithm from `start`, stopping as soon as a node for which `success` holds
/// is popped from the frontier, or when the frontier runs dry.
///
/// Nodes with equal cost are finalized in the order they were (last) pushed, which makes the
/// visitation order fully determined by the order `successors` yields nodes in. A finalized
/// node is never relaxed again, and frontier entries superseded by a cheaper one are skipped.
pub fn dijkstra_trace<N, C, FN, IN, FS>(
    start: &N,
    mut successors: FN,
    mut success: FS,
) -> Trace<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FS: FnMut(&N) -> bool,
{
    let mut to_see = BinaryHeap::new();
    let mut sequence = 0;
    to_see.push(SmallestCostHolder {
        cost: Zero::zero(),
        sequence,
        index: 0,
    });
    let mut discovered: FxIndexMap<N, Record<C>> = FxIndexMap::default();
    discovered.insert(
        start.clone(),
        Record {
            parent: NO_PARENT,
            cost: Zero::zero(),
            finalized: false,
        },
    );
    let mut order = Vec::new();
    while let Some(SmallestCostHolder { cost, index, .. }) = to_see.pop() {
        let successors = {
            let Some((node, record)) = discovered.get_index_mut(index) else {
                continue;
            };
            // A node may sit in the heap several times if a cheaper way to it was found later.
            if record.finalized || cost > record.cost {
                continue;
            }
            record.finalized = true;
            order.push(index);
            if success(node) {
                trace!("Goal popped after {} nodes", order.len());
                return Trace {
                    discovered,
                    order,
                    goal: Some(index),
                };
            }
            successors(node)
        };
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            let n; // index for successor
            match discovered.entry(successor) {
                Vacant(e) => {
                    n = e.index();
                    e.insert(Record {
                        parent: index,
                        cost: new_cost,
                        finalized: false,
                    });
                }
                Occupied(mut e) => {
                    if e.get().finalized || e.get().cost <= new_cost {
                        continue;
                    }
                    n = e.index();
                    let record = e.get_mut();
                    record.parent = index;
                    record.cost = new_cost;
                }
            }
            sequence += 1;
            to_see.push(SmallestCostHolder {
                cost: new_cost,
                sequence,
                index: n,
            });
        }
    }
    trace!("Frontier exhausted after {} nodes", order.len());
    Trace {
        discovered,
        order,
        goal: None,
    }
}
