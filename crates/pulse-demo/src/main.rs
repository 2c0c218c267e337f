use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use pulse_engine::backend::winit::WinitBackend;
use pulse_engine::components::{RigidBody, Transform};
use pulse_engine::coords::Vec2;
use pulse_engine::input::Key;
use pulse_engine::logging::{init_logging, LoggingConfig};
use pulse_engine::paint::Color;
use pulse_engine::shapes::{Batch, Circle, Drawable, Rectangle};
use pulse_engine::{App, ClosePolicy, Platform, WindowConfig};

/// Window speed in pixels per second.
const SPEED: f32 = 240.0;

/// Moves the window around the desktop with the keyboard.
///
/// Keys are physical: W/A/S/D here are Z/Q/S/D on an AZERTY layout.
/// Escape closes the window, which ends the loop.
fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let backend = WinitBackend::new()?;
    let platform = Platform::new(backend);

    let window = platform.create_window(
        WindowConfig::new(480, 320, "pulse demo").close_policy(ClosePolicy::ShutdownProcess),
    )?;

    let mut app = App::new(&platform);
    app.set_exit_when_all_closed(true);

    let mut batch = Batch::new();
    Rectangle::new(Vec2::new(40.0, 40.0), Vec2::new(160.0, 90.0)).into_shared(Some(&mut batch));
    let circle = Circle::new(Vec2::new(340.0, 200.0), 50.0)
        .with_color(Color::YELLOW)
        .into_shared(Some(&mut batch));
    let batch = Rc::new(batch);

    // Direction held on each axis: -1, 0 or 1.
    let direction = Rc::new(Cell::new(Vec2::zero()));

    let (dir, me) = (direction.clone(), window.clone());
    window.on_key_press(move |key, _| match key {
        Key::Escape => me.close(),
        other => {
            if let Some(axis) = axis_of(other) {
                dir.set(dir.get() + axis);
            }
        }
    })?;

    let dir = direction.clone();
    window.on_key_release(move |key, _| {
        if let Some(axis) = axis_of(key) {
            dir.set(dir.get() - axis);
        }
    })?;

    // Releases that happen while unfocused never arrive.
    let dir = direction.clone();
    window.on_lose_focus(move || dir.set(Vec2::zero()))?;

    let (b, me) = (batch.clone(), window.clone());
    window.on_draw(move || {
        me.clear(Color::RED);
        me.paint(|p| b.draw(p));
    })?;

    let me = window.clone();
    window.on_resize(move |w, h| log::info!("{} resized to {w}x{h}", me.title()))?;

    // Simulation: move the window in fixed slices so speed does not depend
    // on the frame rate.
    let mut transform = Transform::from_position(Vec2::new(200.0, 200.0));
    let mut body = RigidBody::default();
    window.set_position(transform.position.x as f64, transform.position.y as f64);

    let (dir, me) = (direction.clone(), window.clone());
    app.on_fixed_update(move |step| {
        body.velocity = dir.get() * SPEED;
        if body.velocity == Vec2::zero() {
            return;
        }
        transform.position += body.velocity * step.as_secs_f32();
        me.set_position(transform.position.x as f64, transform.position.y as f64);
    })?;

    // Presentation: the circle breathes with wall time.
    let mut elapsed = 0.0f32;
    app.on_update(move |dt| {
        elapsed += dt.as_secs_f32();
        circle.borrow_mut().radius = 50.0 + 10.0 * (elapsed * 2.0).sin();
    })?;

    app.run();
    log::info!("all windows closed after {} frames", app.frame_index());
    Ok(())
}

fn axis_of(key: Key) -> Option<Vec2> {
    match key {
        Key::W | Key::ArrowUp => Some(Vec2::new(0.0, -1.0)),
        Key::S | Key::ArrowDown => Some(Vec2::new(0.0, 1.0)),
        Key::A | Key::ArrowLeft => Some(Vec2::new(-1.0, 0.0)),
        Key::D | Key::ArrowRight => Some(Vec2::new(1.0, 0.0)),
        _ => None,
    }
}
