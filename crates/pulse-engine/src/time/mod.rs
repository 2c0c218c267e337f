//! Time subsystem.
//!
//! - `Clock` abstracts "now" and the rate-limiting sleep so the loop can run
//!   against wall time (`SystemClock`) or a scripted timeline (`ManualClock`)
//! - `FixedStep` owns the fixed-update accumulator

mod clock;
mod fixed_step;

use std::time::Duration;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fixed_step::FixedStep;

/// Summary of one loop tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameTime {
    /// Wall time elapsed since the previous tick.
    pub dt: Duration,

    /// Fixed-update invocations performed during the tick.
    pub fixed_steps: u32,

    /// Monotonic tick counter, starting at 0.
    pub frame_index: u64,
}
