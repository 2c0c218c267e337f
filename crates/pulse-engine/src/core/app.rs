use std::cell::Cell;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ShellError;
use crate::time::{Clock, FixedStep, FrameTime, SystemClock};
use crate::window::Platform;

use super::callback::{Callback, Signature};
use super::handlers::{EventContract, HandlerTable};

/// The two update events an `App` dispatches.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UpdateKind {
    /// Once per tick with the elapsed wall time.
    Variable,
    /// Zero or more times per tick with the nominal fixed interval.
    Fixed,
}

impl EventContract for UpdateKind {
    fn name(self) -> &'static str {
        match self {
            UpdateKind::Variable => "on_update",
            UpdateKind::Fixed => "on_fix_update",
        }
    }

    fn signature(self) -> Signature {
        Signature::Step
    }
}

impl FromStr for UpdateKind {
    type Err = ShellError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "on_update" | "update" => Ok(UpdateKind::Variable),
            "on_fix_update" | "fix_update" | "on_fixed_update" | "fixed_update" => {
                Ok(UpdateKind::Fixed)
            }
            _ => Err(ShellError::InvalidEventKind { name: name.to_string() }),
        }
    }
}

/// Loop configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Interval consumed by each fixed update.
    pub fixed_step: Duration,

    /// Frame-rate cap; each tick sleeps `1 / target_fps` seconds.
    /// Zero, negative or non-finite values disable the sleep.
    pub target_fps: f64,

    /// Keep pumping windows after they were closed, like an append-only
    /// registry would.
    pub pump_closed_windows: bool,

    /// Stop the loop once every registered window is closed.
    pub exit_when_all_closed: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fixed_step: Duration::from_millis(20),
            target_fps: 60.0,
            pump_closed_windows: false,
            exit_when_all_closed: false,
        }
    }
}

/// Lifecycle of an `App`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppState {
    /// Constructed, `run` not called yet.
    Idle,
    Running,
    /// Terminal.
    Stopped,
}

/// Shared `running` flag of an `App`.
///
/// Clone it into handlers to end the loop from inside a tick; the in-flight
/// tick always completes. Once cleared the flag cannot be set again.
#[derive(Debug, Clone)]
pub struct RunFlag(Rc<Cell<bool>>);

impl RunFlag {
    fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.0.get()
    }

    /// Clears the flag. Idempotent.
    #[inline]
    pub fn stop(&self) {
        self.0.set(false);
    }
}

/// Fixed/variable timestep main loop.
///
/// Each tick:
/// 1. measures `dt` since the previous tick and adds it to the accumulator
/// 2. calls `on_update(dt)` once
/// 3. calls `on_fix_update(fixed_step)` while the accumulator holds a whole step
/// 4. sleeps `1 / target_fps`
/// 5. updates every registered window in registration order
///
/// Everything runs on the thread that calls `run`.
pub struct App<C: Clock = SystemClock> {
    platform: Platform,
    clock: C,
    config: AppConfig,

    running: RunFlag,
    started: bool,

    last_tick: Duration,
    step: FixedStep,
    frame_index: u64,

    handlers: HandlerTable<UpdateKind>,
}

impl App<SystemClock> {
    /// Creates a loop over `platform`'s windows, timed by the wall clock.
    pub fn new(platform: &Platform) -> Self {
        Self::with_clock(platform, SystemClock::new(), AppConfig::default())
    }
}

impl<C: Clock> App<C> {
    pub fn with_clock(platform: &Platform, clock: C, config: AppConfig) -> Self {
        let last_tick = clock.now();
        Self {
            platform: platform.clone(),
            step: FixedStep::new(config.fixed_step),
            clock,
            config,
            running: RunFlag::new(),
            started: false,
            last_tick,
            frame_index: 0,
            handlers: HandlerTable::new(),
        }
    }

    /// Partial update of the timing parameters; `None` keeps the current value.
    ///
    /// Values are not validated. A zero fixed step makes the next tick drain
    /// forever.
    pub fn configure(&mut self, fixed_step: Option<Duration>, target_fps: Option<f64>) {
        if let Some(step) = fixed_step {
            if step.is_zero() {
                log::warn!("fixed step set to zero; the next tick will not terminate");
            }
            self.config.fixed_step = step;
            self.step.set_interval(step);
        }
        if let Some(fps) = target_fps {
            if !(fps.is_finite() && fps > 0.0) {
                log::warn!("target fps {fps} disables frame-rate limiting");
            }
            self.config.target_fps = fps;
        }
    }

    /// Stops the loop once every registered window is closed.
    pub fn set_exit_when_all_closed(&mut self, on: bool) {
        self.config.exit_when_all_closed = on;
    }

    /// Keeps pumping closed windows instead of skipping them.
    pub fn set_pump_closed_windows(&mut self, on: bool) {
        self.config.pump_closed_windows = on;
    }

    /// Registers an update handler by event name.
    ///
    /// Fails with `InvalidEventKind` for any name other than `on_update` /
    /// `on_fix_update`, then with `DuplicateRegistration`, then with
    /// `ArityMismatch` if `callback` does not take exactly `(dt)`.
    pub fn event(&mut self, name: &str, callback: Callback) -> Result<(), ShellError> {
        let kind: UpdateKind = name.parse()?;
        self.register(kind, callback)
    }

    pub fn register(&mut self, kind: UpdateKind, callback: Callback) -> Result<(), ShellError> {
        self.handlers.register(kind, callback)
    }

    /// Variable update, called once per tick with the elapsed wall time.
    pub fn on_update(&mut self, f: impl FnMut(Duration) + 'static) -> Result<(), ShellError> {
        self.register(UpdateKind::Variable, Callback::step(f))
    }

    /// Fixed update, called with the configured fixed step.
    pub fn on_fixed_update(
        &mut self,
        f: impl FnMut(Duration) + 'static,
    ) -> Result<(), ShellError> {
        self.register(UpdateKind::Fixed, Callback::step(f))
    }

    pub fn has_handler(&self, kind: UpdateKind) -> bool {
        self.handlers.contains(kind)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Unconsumed simulation time carried to the next tick.
    pub fn accumulator(&self) -> Duration {
        self.step.accumulator()
    }

    /// Number of completed ticks.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Handle to the `running` flag.
    pub fn run_flag(&self) -> RunFlag {
        self.running.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    pub fn state(&self) -> AppState {
        match (self.running.is_running(), self.started) {
            (false, _) => AppState::Stopped,
            (true, false) => AppState::Idle,
            (true, true) => AppState::Running,
        }
    }

    /// Runs one loop iteration.
    pub fn tick(&mut self) -> FrameTime {
        let now = self.clock.now();
        let dt = now.saturating_sub(self.last_tick);
        self.last_tick = now;
        self.step.accumulate(dt);

        call_step(&mut self.handlers, UpdateKind::Variable, dt);

        let handlers = &mut self.handlers;
        let fixed_steps = self
            .step
            .drain(|interval| call_step(handlers, UpdateKind::Fixed, interval));

        if let Some(frame) = self.frame_budget() {
            self.clock.sleep(frame);
        }

        self.pump_windows();

        let ft = FrameTime {
            dt,
            fixed_steps,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    /// Ticks until the `running` flag is cleared. Returns immediately when
    /// the app is already stopped.
    pub fn run(&mut self) {
        self.started = true;
        log::debug!("app loop started");

        while self.running.is_running() {
            self.tick();
        }

        log::debug!("app loop stopped after {} ticks", self.frame_index);
    }

    fn frame_budget(&self) -> Option<Duration> {
        let fps = self.config.target_fps;
        if !(fps.is_finite() && fps > 0.0) {
            return None;
        }
        Duration::try_from_secs_f64(1.0 / fps).ok()
    }

    fn pump_windows(&mut self) {
        let registry = self.platform.windows();

        // Snapshot: windows created by handlers during the pump start next tick.
        for window in registry.snapshot() {
            if self.config.pump_closed_windows || window.is_open() {
                window.update();
            }
        }

        if self.config.exit_when_all_closed && !registry.is_empty() && !registry.any_open() {
            log::debug!("all windows closed; stopping");
            self.running.stop();
        }
    }
}

fn call_step(handlers: &mut HandlerTable<UpdateKind>, kind: UpdateKind, dt: Duration) {
    if let Some(Callback::Step(f)) = handlers.get_mut(kind) {
        f(dt);
    }
}
