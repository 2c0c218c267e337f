use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Time source driving the app loop.
///
/// `now` is monotonic and measured from an arbitrary origin; only differences
/// between two readings are meaningful.
pub trait Clock {
    fn now(&self) -> Duration;

    /// Blocks the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `Instant` and `thread::sleep`.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Default)]
struct ManualState {
    now: Duration,
    sleeps: Vec<Duration>,
}

/// Deterministic clock whose time only moves when told to.
///
/// Clones share the same timeline, so a test can keep one handle and give
/// another to the `App`. `sleep` does not block: it records the request and
/// advances time by the same amount.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<ManualState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.state.borrow_mut().now += dt;
    }

    /// Every duration passed to `sleep`, oldest first.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.borrow().sleeps.clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.state.borrow().now
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.state.borrow_mut();
        state.sleeps.push(duration);
        state.now += duration;
    }
}
