use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use pulse_engine::backend::{BackendCall, HeadlessBackend, NativeEvent};
use pulse_engine::components::{RigidBody, Transform};
use pulse_engine::coords::Vec2;
use pulse_engine::input::{Action, Key, Modifiers};
use pulse_engine::paint::Color;
use pulse_engine::shapes::{Batch, Circle, Drawable, Rectangle, SharedDrawable};
use pulse_engine::time::ManualClock;
use pulse_engine::{
    App, AppConfig, Callback, ClosePolicy, Platform, ShellError, Signature, WindowConfig,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

struct Rig {
    headless: HeadlessBackend,
    platform: Platform,
    clock: ManualClock,
}

impl Rig {
    fn new() -> Self {
        let headless = HeadlessBackend::new();
        Self {
            platform: Platform::new(headless.clone()),
            headless,
            clock: ManualClock::new(),
        }
    }

    fn app(&self, config: AppConfig) -> App<ManualClock> {
        App::with_clock(&self.platform, self.clock.clone(), config)
    }

    fn unthrottled(&self) -> App<ManualClock> {
        self.app(AppConfig {
            target_fps: 0.0,
            ..AppConfig::default()
        })
    }
}

#[test]
fn fifty_ms_tick_with_twenty_ms_step() {
    let rig = Rig::new();
    let mut app = rig.unthrottled();
    app.configure(Some(ms(20)), None);

    let calls = Rc::new(RefCell::new(Vec::new()));
    let c = calls.clone();
    app.event("on_fix_update", Callback::step(move |fdt| c.borrow_mut().push(fdt)))
        .unwrap();

    rig.clock.advance(ms(50));
    app.tick();

    assert_eq!(*calls.borrow(), vec![ms(20), ms(20)]);
    assert_eq!(app.accumulator(), ms(10));
}

#[test]
fn accumulator_stays_below_step_over_irregular_ticks() {
    let rig = Rig::new();
    let mut app = rig.unthrottled();
    app.configure(Some(ms(16)), None);

    let total = Rc::new(Cell::new(0u32));
    let t = total.clone();
    app.on_fixed_update(move |_| t.set(t.get() + 1)).unwrap();

    let mut elapsed = Duration::ZERO;
    for dt in [3, 40, 0, 16, 7, 100, 1, 15] {
        let before = app.accumulator();
        rig.clock.advance(ms(dt));
        elapsed += ms(dt);

        let ft = app.tick();

        let expected = ((before + ms(dt)).as_millis() / 16) as u32;
        assert_eq!(ft.fixed_steps, expected);
        assert!(app.accumulator() < ms(16));
    }

    assert_eq!(ms(16) * total.get() + app.accumulator(), elapsed);
}

#[test]
fn two_windows_are_updated_once_each_in_creation_order() {
    let rig = Rig::new();
    let first = rig.platform.create_window(WindowConfig::default()).unwrap();
    let second = rig.platform.create_window(WindowConfig::default()).unwrap();

    let reg = rig.platform.windows();
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.get(0), Some(first.clone()));
    assert_eq!(reg.get(1), Some(second.clone()));

    let order = Rc::new(RefCell::new(Vec::new()));
    for (w, tag) in [(&first, "first"), (&second, "second")] {
        let o = order.clone();
        w.on_draw(move || o.borrow_mut().push(tag)).unwrap();
    }

    let mut app = rig.unthrottled();
    rig.headless.clear_calls();
    app.tick();

    assert_eq!(*order.borrow(), vec!["first", "second"]);

    let swaps: Vec<_> = rig
        .headless
        .calls()
        .into_iter()
        .filter(|c| matches!(c, BackendCall::SwapBuffers(_)))
        .collect();
    assert_eq!(
        swaps,
        vec![
            BackendCall::SwapBuffers(first.handle()),
            BackendCall::SwapBuffers(second.handle()),
        ]
    );
}

#[test]
fn draw_handler_with_one_parameter_is_rejected() {
    let rig = Rig::new();
    let w = rig.platform.create_window(WindowConfig::default()).unwrap();

    let err = w.event("draw", Callback::step(|_| {})).unwrap_err();
    assert_eq!(
        err,
        ShellError::ArityMismatch {
            event: "on_draw",
            expected: Signature::Unit,
            actual: Signature::Step,
        }
    );
    assert_eq!(err.to_string(), "on_draw expects 0 arguments () but got 1 (dt)");
}

#[test]
fn duplicate_registration_keeps_the_first_handler() {
    let rig = Rig::new();
    let w = rig.platform.create_window(WindowConfig::default()).unwrap();
    let which = Rc::new(Cell::new(""));

    let a = which.clone();
    w.on_key_press(move |_, _| a.set("first")).unwrap();
    let b = which.clone();
    let err = w
        .event("on_key_press", Callback::key(move |_, _| b.set("second")))
        .unwrap_err();
    assert_eq!(err, ShellError::DuplicateRegistration { event: "on_key_press" });

    rig.headless.inject(
        w.handle(),
        NativeEvent::Key {
            key: Key::Enter,
            scancode: 28,
            action: Action::Press,
            mods: Modifiers::NONE,
        },
    );
    let mut app = rig.unthrottled();
    app.tick();
    assert_eq!(which.get(), "first");
}

#[test]
fn batch_members_join_at_construction_and_draw_in_a_window() {
    let rig = Rig::new();
    let w = rig.platform.create_window(WindowConfig::default()).unwrap();

    let batch = Rc::new(RefCell::new(Batch::new()));
    let rect = Rectangle::new(Vec2::new(10.0, 10.0), Vec2::new(50.0, 20.0))
        .into_shared(Some(&mut *batch.borrow_mut()));
    Circle::new(Vec2::new(100.0, 100.0), 25.0).into_shared(Some(&mut *batch.borrow_mut()));

    let other = Batch::new();
    let rect: SharedDrawable = rect;
    assert!(batch.borrow().contains(&rect));
    assert!(!other.contains(&rect));
    assert_eq!(batch.borrow().len(), 2);

    let (b, me) = (batch.clone(), w.clone());
    w.on_draw(move || {
        me.clear(Color::RED);
        me.paint(|p| b.borrow().draw(p));
    })
    .unwrap();

    rig.headless.clear_calls();
    w.update();

    let calls = rig.headless.calls();
    assert_eq!(calls[1], BackendCall::Clear(Color::RED));
    assert!(calls.contains(&BackendCall::SetColor(Color::WHITE)));
    assert!(calls.contains(&BackendCall::SetColor(Color::BLUE)));
}

#[test]
fn unhandled_close_shuts_the_process_down_by_default() {
    let rig = Rig::new();
    let a = rig.platform.create_window(WindowConfig::default()).unwrap();
    let b = rig.platform.create_window(WindowConfig::default()).unwrap();
    let b_draws = Rc::new(Cell::new(0));

    let d = b_draws.clone();
    b.on_draw(move || d.set(d.get() + 1)).unwrap();

    let mut app = rig.unthrottled();
    app.set_exit_when_all_closed(true);

    rig.headless.inject(a.handle(), NativeEvent::Close);
    app.tick();

    // `b` was already closed by the shutdown when its turn came.
    assert_eq!(b_draws.get(), 0);
    assert!(!a.is_open() && !b.is_open());
    assert!(!app.is_running());
}

#[test]
fn close_this_window_only_keeps_the_loop_alive() {
    let rig = Rig::new();
    let cfg = WindowConfig::default().close_policy(ClosePolicy::CloseThisWindowOnly);
    let a = rig.platform.create_window(cfg.clone()).unwrap();
    let b = rig.platform.create_window(cfg).unwrap();

    let mut app = rig.unthrottled();
    app.set_exit_when_all_closed(true);

    rig.headless.inject(a.handle(), NativeEvent::Close);
    app.tick();
    assert!(!a.is_open());
    assert!(b.is_open());
    assert!(app.is_running());

    rig.headless.inject(b.handle(), NativeEvent::Close);
    app.tick();
    assert!(!app.is_running());
    assert!(rig.headless.open_windows().is_empty());
}

#[test]
fn closed_windows_are_pumped_only_when_configured() {
    let rig = Rig::new();
    let cfg = WindowConfig::default().close_policy(ClosePolicy::CloseThisWindowOnly);
    let w = rig.platform.create_window(cfg).unwrap();
    let draws = Rc::new(Cell::new(0));
    let d = draws.clone();
    w.on_draw(move || d.set(d.get() + 1)).unwrap();
    w.close();

    let mut skipping = rig.unthrottled();
    skipping.tick();
    assert_eq!(draws.get(), 0);

    let mut compatible = rig.app(AppConfig {
        target_fps: 0.0,
        pump_closed_windows: true,
        ..AppConfig::default()
    });
    compatible.tick();
    assert_eq!(draws.get(), 1);
}

#[test]
fn close_handler_can_stop_the_loop() {
    let rig = Rig::new();
    let w = rig.platform.create_window(WindowConfig::default()).unwrap();
    let mut app = rig.unthrottled();

    let (flag, me) = (app.run_flag(), w.clone());
    w.on_close(move || {
        me.close();
        flag.stop();
    })
    .unwrap();

    let clock = rig.clock.clone();
    let (headless, handle) = (rig.headless.clone(), w.handle());
    let ticks = Rc::new(Cell::new(0));
    let t = ticks.clone();
    app.on_update(move |_| {
        t.set(t.get() + 1);
        clock.advance(ms(5));
        if t.get() == 4 {
            headless.inject(handle, NativeEvent::Close);
        }
    })
    .unwrap();

    app.run();

    assert_eq!(ticks.get(), 4);
    assert!(!w.is_open());
    // The handler replaced the default, so the backend was not terminated.
    assert!(!rig.headless.calls().contains(&BackendCall::Terminate));
}

#[test]
fn window_created_during_a_tick_is_pumped_from_the_next_one() {
    let rig = Rig::new();
    let first = rig.platform.create_window(WindowConfig::default()).unwrap();
    let spawned = Rc::new(RefCell::new(None));

    let (platform, slot) = (rig.platform.clone(), spawned.clone());
    first
        .on_draw(move || {
            if slot.borrow().is_none() {
                let w = platform.create_window(WindowConfig::default()).unwrap();
                *slot.borrow_mut() = Some(w);
            }
        })
        .unwrap();

    let mut app = rig.unthrottled();
    rig.headless.clear_calls();
    app.tick();

    let new_handle = spawned.borrow().as_ref().map(|w| w.handle()).unwrap();
    assert!(!rig
        .headless
        .calls()
        .contains(&BackendCall::SwapBuffers(new_handle)));

    app.tick();
    assert!(rig
        .headless
        .calls()
        .contains(&BackendCall::SwapBuffers(new_handle)));
}

#[test]
fn frame_rate_cap_sleeps_after_the_fixed_updates() {
    let rig = Rig::new();
    let w = rig.platform.create_window(WindowConfig::default()).unwrap();
    let mut app = rig.app(AppConfig::default());
    app.configure(None, Some(50.0));

    let clock = rig.clock.clone();
    let sleeps_seen_by_draw = Rc::new(Cell::new(usize::MAX));
    let s = sleeps_seen_by_draw.clone();
    w.on_draw(move || s.set(clock.sleeps().len())).unwrap();

    app.tick();
    assert_eq!(rig.clock.sleeps(), vec![ms(20)]);
    assert_eq!(sleeps_seen_by_draw.get(), 1);
}

#[test]
fn window_placed_before_the_loop_moves_from_that_spot() {
    let rig = Rig::new();
    let w = rig.platform.create_window(WindowConfig::default()).unwrap();

    let mut transform = Transform::from_position(Vec2::new(200.0, 200.0));
    let body = RigidBody::new(Vec2::new(50.0, 0.0), Vec2::zero(), 1.0);
    w.set_position(200.0, 200.0);

    let mut app = rig.unthrottled();
    app.configure(Some(ms(20)), None);
    let me = w.clone();
    app.on_fixed_update(move |step| {
        transform.position += body.velocity * step.as_secs_f32();
        me.set_position(transform.position.x as f64, transform.position.y as f64);
    })
    .unwrap();

    rig.headless.clear_calls();
    rig.clock.advance(ms(40));
    app.tick();

    let (x, y) = w.position();
    assert!((x - 202.0).abs() < 1e-3, "x = {x}");
    assert_eq!(y, 200.0);
    assert!(rig.headless.calls().contains(&BackendCall::SetWindowPos {
        handle: w.handle(),
        x: 202,
        y: 200,
    }));
}
