use grid_util::Point;
use std::sync::Arc;

/// How a cell should be shown when its event fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealKind {
    Visited,
    OnPath,
}

/// A single reveal, due `due_at_millis` after playback starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimelineEvent {
    pub cell: Point,
    pub kind: RevealKind,
    pub due_at_millis: u64,
}

/// An immutable, ordered sequence of [TimelineEvent]s with non-decreasing due times. Cloning
/// shares the events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timeline {
    events: Arc<[TimelineEvent]>,
}

impl Timeline {
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }
    pub fn len(&self) -> usize {
        self.events.len()
    }
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
    /// Due time of the last event, or 0 for an empty timeline.
    pub fn duration_millis(&self) -> u64 {
        self.events.last().map_or(0, |e| e.due_at_millis)
    }
    pub fn iter(&self) -> std::slice::Iter<'_, TimelineEvent> {
        self.events.iter()
    }
    /// Events of one kind, in timeline order.
    pub fn phase(&self, kind: RevealKind) -> impl Iterator<Item = &TimelineEvent> + '_ {
        self.events.iter().filter(move |e| e.kind == kind)
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimelineEvent;
    type IntoIter = std::slice::Iter<'a, TimelineEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lays out one [RevealKind::Visited] event per visited cell followed by one
/// [RevealKind::OnPath] event per path cell.
///
/// Visited event `i` is due at `i * step_interval_millis`. The path phase begins one step after
/// the last visited reveal, at `visitation_order.len() * step_interval_millis`, and its events
/// are `path_interval_millis` apart.
pub fn build_timeline(
    visitation_order: &[Point],
    shortest_path: &[Point],
    step_interval_millis: u64,
    path_interval_millis: u64,
) -> Timeline {
    let path_start = (visitation_order.len() as u64).saturating_mul(step_interval_millis);
    let visited = visitation_order
        .iter()
        .enumerate()
        .map(|(i, &cell)| TimelineEvent {
            cell,
            kind: RevealKind::Visited,
            due_at_millis: (i as u64).saturating_mul(step_interval_millis),
        });
    let on_path = shortest_path
        .iter()
        .enumerate()
        .map(|(j, &cell)| TimelineEvent {
            cell,
            kind: RevealKind::OnPath,
            due_at_millis: path_start.saturating_add((j as u64).saturating_mul(path_interval_millis)),
        });
    Timeline {
        events: visited.chain(on_path).collect(),
    }
}
