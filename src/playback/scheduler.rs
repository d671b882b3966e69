use super::clock::Clock;
use super::timeline::{RevealKind, Timeline};
use grid_util::Point;
use log::{debug, trace};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct PlaybackState {
    cancelled: AtomicBool,
    finished: AtomicBool,
    delivered: AtomicUsize,
}

/// Control handle of one playback, returned by [Scheduler::play]. Cloning shares the playback.
#[derive(Clone, Debug, Default)]
pub struct PlaybackHandle {
    state: Arc<PlaybackState>,
}

impl PlaybackHandle {
    /// Stops the playback: once this returns no further event of it is delivered. Events that
    /// already fired stay fired. Cancelling twice, or after the playback finished, does nothing.
    pub fn cancel(&self) {
        if self.is_finished() {
            return;
        }
        if !self.state.cancelled.swap(true, Ordering::AcqRel) {
            debug!("Playback cancelled after {} events", self.delivered());
        }
    }
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }
    /// Whether every event of the timeline was delivered.
    pub fn is_finished(&self) -> bool {
        self.state.finished.load(Ordering::Acquire)
    }
    /// Number of events delivered so far.
    pub fn delivered(&self) -> usize {
        self.state.delivered.load(Ordering::Acquire)
    }
}

type EventSink = Box<dyn FnMut(Point, RevealKind)>;

struct Playback {
    timeline: Timeline,
    started_at: u64,
    cursor: usize,
    on_event: EventSink,
    handle: PlaybackHandle,
}

impl Playback {
    /// Delivers every event due at `elapsed`, in timeline order, checking for cancellation
    /// before each one.
    fn deliver_due(&mut self, elapsed: u64) -> usize {
        let mut delivered = 0;
        while let Some(&event) = self.timeline.events().get(self.cursor) {
            if self.handle.is_cancelled() || event.due_at_millis > elapsed {
                break;
            }
            (self.on_event)(event.cell, event.kind);
            self.cursor += 1;
            delivered += 1;
            self.handle.state.delivered.fetch_add(1, Ordering::AcqRel);
        }
        delivered
    }
    fn is_done(&self) -> bool {
        self.cursor >= self.timeline.len()
    }
}

/// Single-threaded, timer-driven player for [Timeline]s. It holds at most one live playback:
/// starting another one cancels the current one first.
pub struct Scheduler<C: Clock> {
    clock: C,
    active: Option<Playback>,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C) -> Scheduler<C> {
        Scheduler {
            clock,
            active: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Starts playing `timeline` now. `on_event` receives each event's cell and kind once the
    /// clock reaches its due time, in timeline order, as [poll](Self::poll) is called.
    pub fn play<F>(&mut self, timeline: Timeline, on_event: F) -> PlaybackHandle
    where
        F: FnMut(Point, RevealKind) + 'static,
    {
        self.cancel();
        let handle = PlaybackHandle::default();
        debug!("Starting playback of {} events", timeline.len());
        self.active = Some(Playback {
            timeline,
            started_at: self.clock.now_millis(),
            cursor: 0,
            on_event: Box::new(on_event),
            handle: handle.clone(),
        });
        // Events due at t = 0 go out straight away
        self.poll();
        handle
    }

    /// Cancels the live playback, if any.
    pub fn cancel(&mut self) {
        if let Some(playback) = self.active.take() {
            playback.handle.cancel();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|p| !p.handle.is_cancelled())
    }

    /// Delivers all events that are due by now and returns how many were delivered. Drops the
    /// playback once it is cancelled or complete.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now_millis();
        let Some(playback) = self.active.as_mut() else {
            return 0;
        };
        let delivered = playback.deliver_due(now.saturating_sub(playback.started_at));
        if playback.handle.is_cancelled() {
            self.active = None;
        } else if playback.is_done() {
            playback.handle.state.finished.store(true, Ordering::Release);
            trace!("Playback finished after {} events", playback.cursor);
            self.active = None;
        }
        delivered
    }

    /// Milliseconds until the next event of the live playback is due.
    pub fn next_due_in_millis(&self) -> Option<u64> {
        let playback = self.active.as_ref()?;
        if playback.handle.is_cancelled() {
            return None;
        }
        let event = playback.timeline.events().get(playback.cursor)?;
        let elapsed = self.clock.now_millis().saturating_sub(playback.started_at);
        Some(event.due_at_millis.saturating_sub(elapsed))
    }

    /// Plays the live playback to its end (or cancellation), waiting on the clock between
    /// events. Returns the number of events delivered.
    pub fn run(&mut self) -> usize {
        let mut delivered = self.poll();
        while let Some(wait) = self.next_due_in_millis() {
            self.clock.wait(wait);
            delivered += self.poll();
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::super::clock::VirtualClock;
    use super::super::timeline::build_timeline;
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(Point, RevealKind)>>>;

    fn recorder() -> (Log, impl FnMut(Point, RevealKind) + 'static) {
        let log: Log = Rc::default();
        let sink = log.clone();
        (log, move |cell, kind| sink.borrow_mut().push((cell, kind)))
    }

    fn cells(n: i32) -> Vec<Point> {
        (0..n).map(|i| Point::new(i, 0)).collect()
    }

    #[test]
    fn delivers_on_schedule() {
        let clock = VirtualClock::new();
        let mut scheduler = Scheduler::new(clock.clone());
        let (log, sink) = recorder();
        let timeline = build_timeline(&cells(3), &cells(2), 10, 50);
        let handle = scheduler.play(timeline.clone(), sink);
        assert_eq!(log.borrow().len(), 1);
        clock.advance(9);
        assert_eq!(scheduler.poll(), 0);
        clock.advance(1);
        assert_eq!(scheduler.poll(), 1);
        assert_eq!(scheduler.next_due_in_millis(), Some(10));
        clock.advance(20);
        // Last visited reveal at 20 and first path reveal at 30
        assert_eq!(scheduler.poll(), 2);
        clock.advance(1000);
        assert_eq!(scheduler.poll(), 1);
        assert!(handle.is_finished());
        assert!(!scheduler.is_playing());
        let expected = timeline.iter().map(|e| (e.cell, e.kind)).collect::<Vec<_>>();
        assert_eq!(*log.borrow(), expected);
        assert_eq!(handle.delivered(), 5);
    }

    /// Nine events ten milliseconds apart; cancelling after two have fired leaves exactly two.
    #[test]
    fn cancel_after_two_events() {
        let clock = VirtualClock::new();
        let mut scheduler = Scheduler::new(clock.clone());
        let (log, sink) = recorder();
        let handle = scheduler.play(build_timeline(&cells(9), &[], 10, 50), sink);
        clock.advance(10);
        scheduler.poll();
        assert_eq!(log.borrow().len(), 2);
        handle.cancel();
        for _ in 0..10 {
            clock.advance(10);
            assert_eq!(scheduler.poll(), 0);
        }
        assert_eq!(log.borrow().len(), 2);
        assert!(handle.is_cancelled());
        assert!(!handle.is_finished());
        assert!(!scheduler.is_playing());
        // Repeated cancellation is harmless
        handle.cancel();
        scheduler.cancel();
        assert_eq!(handle.delivered(), 2);
    }

    #[test]
    fn cancel_after_completion_is_noop() {
        let clock = VirtualClock::new();
        let mut scheduler = Scheduler::new(clock.clone());
        let (log, sink) = recorder();
        let handle = scheduler.play(build_timeline(&cells(2), &cells(1), 5, 5), sink);
        assert_eq!(scheduler.run(), 2);
        assert!(handle.is_finished());
        handle.cancel();
        assert!(!handle.is_cancelled());
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(clock.now_millis(), 10);
    }

    #[test]
    fn new_playback_cancels_previous() {
        let clock = VirtualClock::new();
        let mut scheduler = Scheduler::new(clock.clone());
        let (first_log, first_sink) = recorder();
        let (second_log, second_sink) = recorder();
        let first = scheduler.play(build_timeline(&cells(5), &[], 10, 10), first_sink);
        clock.advance(10);
        scheduler.poll();
        let second = scheduler.play(build_timeline(&cells(3), &[], 10, 10), second_sink);
        assert!(first.is_cancelled());
        scheduler.run();
        assert_eq!(first_log.borrow().len(), 2);
        assert_eq!(second_log.borrow().len(), 3);
        assert!(second.is_finished());
    }

    #[test]
    fn cancel_from_inside_callback() {
        let clock = VirtualClock::new();
        let mut scheduler = Scheduler::new(clock.clone());
        let slot: Rc<RefCell<Option<PlaybackHandle>>> = Rc::default();
        let count = Rc::new(RefCell::new(0));
        let (inner_slot, inner_count) = (slot.clone(), count.clone());
        // All events share t = 0, so they would otherwise fire in a single poll
        let handle = scheduler.play(build_timeline(&cells(4), &[], 0, 0), move |_, _| {
            *inner_count.borrow_mut() += 1;
            if *inner_count.borrow() == 1 {
                if let Some(h) = inner_slot.borrow().as_ref() {
                    h.cancel();
                }
            }
        });
        assert_eq!(*count.borrow(), 4);
        assert!(handle.is_finished());

        let handle = scheduler.play(build_timeline(&cells(4), &[], 10, 10), {
            let (inner_slot, inner_count) = (slot.clone(), count.clone());
            move |_, _| {
                *inner_count.borrow_mut() += 1;
                if let Some(h) = inner_slot.borrow().as_ref() {
                    h.cancel();
                }
            }
        });
        *slot.borrow_mut() = Some(handle.clone());
        scheduler.run();
        // One event at t = 0 fired before the handle was stored, then one more cancelled it
        assert_eq!(*count.borrow(), 4 + 2);
        assert!(handle.is_cancelled());
    }

    #[test]
    fn empty_timeline_finishes_immediately() {
        let mut scheduler = Scheduler::new(VirtualClock::new());
        let (log, sink) = recorder();
        let handle = scheduler.play(build_timeline(&[], &[], 10, 50), sink);
        assert!(handle.is_finished());
        assert!(log.borrow().is_empty());
        assert_eq!(scheduler.next_due_in_millis(), None);
    }
}
