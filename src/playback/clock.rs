use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic millisecond time source for playback.
pub trait Clock {
    /// Milliseconds since some fixed origin.
    fn now_millis(&self) -> u64;
    /// Blocks (or pretends to) until `millis` have passed.
    fn wait(&self, millis: u64);
}

/// Wall-clock time measured from the moment the clock was created.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> SystemClock {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
    fn wait(&self, millis: u64) {
        std::thread::sleep(Duration::from_millis(millis));
    }
}

/// A clock that only moves when told to. Clones share the same time, so a test can keep one
/// handle and give another to a [Scheduler](super::Scheduler).
#[derive(Clone, Debug, Default)]
pub struct VirtualClock {
    now: Arc<AtomicU64>,
}

impl VirtualClock {
    pub fn new() -> VirtualClock {
        VirtualClock::default()
    }
    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::Release);
    }
    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::AcqRel);
    }
}

impl Clock for VirtualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
    /// Waiting on a virtual clock simply moves it forward.
    fn wait(&self, millis: u64) {
        self.advance(millis);
    }
}
