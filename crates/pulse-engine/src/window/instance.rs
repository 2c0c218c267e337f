use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::backend::{Backend, NativeEvent, NativeHandle, Painter};
use crate::core::{Callback, HandlerTable};
use crate::error::ShellError;
use crate::input::{Action, InputState, Key, Modifiers, MouseButton};
use crate::paint::Color;

use super::{ClosePolicy, EventKind, Platform, WindowConfig};

/// Lifecycle of a window. `Closed` is terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WindowState {
    Open,
    Closed,
}

struct WindowInner {
    handle: NativeHandle,
    x: f64,
    y: f64,
    width: u32,
    height: u32,
    title: String,
    close_policy: ClosePolicy,
    state: WindowState,

    handlers: HandlerTable<EventKind>,
    input: InputState,
}

/// One native window, its geometry and its event handler table.
///
/// `Window` is a cheap handle; clones address the same window. It is not
/// `Send`: create and use windows on the thread that runs the `App`.
///
/// Handlers may call back into the window they are registered on.
#[derive(Clone)]
pub struct Window {
    inner: Rc<RefCell<WindowInner>>,
    backend: Backend,
}

impl Window {
    /// Opens a native window, binds it as the current target with a pixel
    /// projection and appends it to the platform's registry.
    ///
    /// Fails with `ShellError::BackendInit` when the backend cannot create the
    /// window; nothing is registered in that case.
    pub fn new(platform: &Platform, config: WindowConfig) -> Result<Self, ShellError> {
        let backend = platform.backend().clone();

        let handle = backend.with(|b| -> Result<NativeHandle, ShellError> {
            let handle = b.create_window(&config)?;
            b.make_context_current(handle);
            b.set_projection(handle, config.width, config.height);
            Ok(handle)
        })?;

        log::debug!(
            "window {handle} created ({}x{}, {:?})",
            config.width,
            config.height,
            config.title
        );

        let window = Self {
            inner: Rc::new(RefCell::new(WindowInner {
                handle,
                x: 0.0,
                y: 0.0,
                width: config.width,
                height: config.height,
                title: config.title,
                close_policy: config.close_policy,
                state: WindowState::Open,
                handlers: HandlerTable::new(),
                input: InputState::default(),
            })),
            backend,
        };

        platform.windows().register(window.clone());
        Ok(window)
    }

    // ── registration ──────────────────────────────────────────────────────

    /// Registers a handler by event name (`on_draw` or `draw`, ...).
    ///
    /// Fails with `UnknownEvent`, then `DuplicateRegistration`, then
    /// `ArityMismatch`. On failure the handler table is unchanged.
    pub fn event(&self, name: &str, callback: Callback) -> Result<(), ShellError> {
        let kind: EventKind = name.parse()?;
        self.register(kind, callback)
    }

    pub fn register(&self, kind: EventKind, callback: Callback) -> Result<(), ShellError> {
        self.inner.borrow_mut().handlers.register(kind, callback)
    }

    pub fn has_handler(&self, kind: EventKind) -> bool {
        self.inner.borrow().handlers.contains(kind)
    }

    pub fn on_draw(&self, f: impl FnMut() + 'static) -> Result<(), ShellError> {
        self.register(EventKind::Draw, Callback::unit(f))
    }

    pub fn on_resize(&self, f: impl FnMut(u32, u32) + 'static) -> Result<(), ShellError> {
        self.register(EventKind::Resize, Callback::size(f))
    }

    /// Replaces the default close behavior (see `ClosePolicy`). The window
    /// stays open unless the handler closes it.
    pub fn on_close(&self, f: impl FnMut() + 'static) -> Result<(), ShellError> {
        self.register(EventKind::Close, Callback::unit(f))
    }

    pub fn on_key_press(&self, f: impl FnMut(Key, Modifiers) + 'static) -> Result<(), ShellError> {
        self.register(EventKind::KeyPress, Callback::key(f))
    }

    pub fn on_key_release(
        &self,
        f: impl FnMut(Key, Modifiers) + 'static,
    ) -> Result<(), ShellError> {
        self.register(EventKind::KeyRelease, Callback::key(f))
    }

    pub fn on_mouse_press(
        &self,
        f: impl FnMut(f64, f64, MouseButton, Modifiers) + 'static,
    ) -> Result<(), ShellError> {
        self.register(EventKind::MousePress, Callback::button(f))
    }

    pub fn on_mouse_release(
        &self,
        f: impl FnMut(f64, f64, MouseButton, Modifiers) + 'static,
    ) -> Result<(), ShellError> {
        self.register(EventKind::MouseRelease, Callback::button(f))
    }

    pub fn on_mouse_motion(&self, f: impl FnMut(f64, f64) + 'static) -> Result<(), ShellError> {
        self.register(EventKind::MouseMotion, Callback::cursor(f))
    }

    pub fn on_mouse_scroll(
        &self,
        f: impl FnMut(f64, f64, f64, f64) + 'static,
    ) -> Result<(), ShellError> {
        self.register(EventKind::MouseScroll, Callback::scroll(f))
    }

    pub fn on_gain_focus(&self, f: impl FnMut() + 'static) -> Result<(), ShellError> {
        self.register(EventKind::GainFocus, Callback::unit(f))
    }

    pub fn on_lose_focus(&self, f: impl FnMut() + 'static) -> Result<(), ShellError> {
        self.register(EventKind::LoseFocus, Callback::unit(f))
    }

    pub fn on_show(&self, f: impl FnMut() + 'static) -> Result<(), ShellError> {
        self.register(EventKind::Show, Callback::unit(f))
    }

    pub fn on_hide(&self, f: impl FnMut() + 'static) -> Result<(), ShellError> {
        self.register(EventKind::Hide, Callback::unit(f))
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Draws and presents one frame, then processes pending input.
    ///
    /// Binds this window as the current target, calls the `draw` handler,
    /// swaps buffers, polls the backend and dispatches every event queued for
    /// this window, synchronously and in arrival order.
    pub fn update(&self) {
        let handle = self.handle();

        self.backend.with(|b| b.make_context_current(handle));
        self.dispatch(EventKind::Draw, |cb| {
            if let Callback::Unit(f) = cb {
                f();
            }
        });

        let events = self.backend.with(|b| {
            b.swap_buffers(handle);
            b.poll_events();
            b.drain_events(handle)
        });

        for event in events {
            if self.state() == WindowState::Closed {
                break;
            }
            self.handle_native(event);
        }
    }

    /// Clears the current frame to `color`.
    pub fn clear(&self, color: Color) {
        self.paint(|p| p.clear(color));
    }

    /// Runs `f` against the backend painter. Meant for `draw` handlers,
    /// where this window is the current target.
    pub fn paint<R>(&self, f: impl FnOnce(&mut dyn Painter) -> R) -> R {
        self.backend.paint(f)
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    pub fn handle(&self) -> NativeHandle {
        self.inner.borrow().handle
    }

    /// `Closed` once `close` ran or the backend lost the native window
    /// (e.g. after a process shutdown).
    pub fn state(&self) -> WindowState {
        let (handle, state) = {
            let inner = self.inner.borrow();
            (inner.handle, inner.state)
        };
        match state {
            WindowState::Open if self.backend.with(|b| b.window_exists(handle)) => {
                WindowState::Open
            }
            _ => WindowState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == WindowState::Open
    }

    pub fn close_policy(&self) -> ClosePolicy {
        self.inner.borrow().close_policy
    }

    pub fn set_close_policy(&self, policy: ClosePolicy) {
        self.inner.borrow_mut().close_policy = policy;
    }

    /// Destroys the native window. Other windows are unaffected. Idempotent.
    pub fn close(&self) {
        let handle = {
            let mut inner = self.inner.borrow_mut();
            if inner.state == WindowState::Closed {
                return;
            }
            inner.state = WindowState::Closed;
            inner.handle
        };
        self.backend.with(|b| b.destroy_window(handle));
        log::debug!("window {handle} closed");
    }

    /// Default reaction to a close request without an `on_close` handler.
    ///
    /// With `ClosePolicy::ShutdownProcess` this terminates the backend, which
    /// closes every window of the process, not only this one.
    fn close_by_policy(&self) {
        self.close();
        if self.close_policy() == ClosePolicy::ShutdownProcess {
            log::debug!("window {} requested process shutdown", self.handle());
            self.backend.with(|b| b.terminate());
        }
    }

    // ── geometry ──────────────────────────────────────────────────────────

    pub fn x(&self) -> f64 {
        self.inner.borrow().x
    }

    pub fn y(&self) -> f64 {
        self.inner.borrow().y
    }

    pub fn position(&self) -> (f64, f64) {
        let inner = self.inner.borrow();
        (inner.x, inner.y)
    }

    pub fn width(&self) -> u32 {
        self.inner.borrow().width
    }

    pub fn height(&self) -> u32 {
        self.inner.borrow().height
    }

    pub fn size(&self) -> (u32, u32) {
        let inner = self.inner.borrow();
        (inner.width, inner.height)
    }

    pub fn title(&self) -> String {
        self.inner.borrow().title.clone()
    }

    pub fn set_x(&self, x: f64) {
        let y = self.y();
        self.set_position(x, y);
    }

    pub fn set_y(&self, y: f64) {
        let x = self.x();
        self.set_position(x, y);
    }

    /// Moves the window; the backend receives whole pixels.
    pub fn set_position(&self, x: f64, y: f64) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.x = x;
            inner.y = y;
        }
        self.push(|b, h| b.set_window_pos(h, x as i32, y as i32));
    }

    pub fn set_width(&self, width: u32) {
        let height = self.height();
        self.set_size(width, height);
    }

    pub fn set_height(&self, height: u32) {
        let width = self.width();
        self.set_size(width, height);
    }

    pub fn set_size(&self, width: u32, height: u32) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.width = width;
            inner.height = height;
        }
        self.push(|b, h| b.set_window_size(h, width, height));
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.inner.borrow_mut().title = title.clone();
        self.push(|b, h| b.set_window_title(h, &title));
    }

    fn push(&self, f: impl FnOnce(&mut dyn crate::backend::GraphicsBackend, NativeHandle)) {
        let handle = self.handle();
        if !self.is_open() {
            log::warn!("window {handle} is closed; change kept locally only");
            return;
        }
        self.backend.with(|b| f(b, handle));
    }

    // ── input queries ─────────────────────────────────────────────────────

    pub fn is_key_down(&self, key: Key) -> bool {
        self.inner.borrow().input.key_down(key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.inner.borrow().input.button_down(button)
    }

    /// Last cursor position reported for this window, if any.
    pub fn cursor_position(&self) -> Option<(f64, f64)> {
        self.inner.borrow().input.cursor
    }

    pub fn has_focus(&self) -> bool {
        self.inner.borrow().input.focused
    }

    pub fn modifiers(&self) -> Modifiers {
        self.inner.borrow().input.modifiers
    }

    // ── native translation ────────────────────────────────────────────────

    fn handle_native(&self, event: NativeEvent) {
        match event {
            NativeEvent::Key { key, action, mods, .. } => {
                self.inner.borrow_mut().input.apply_key(key, action, mods);
                let kind = match action {
                    Action::Press => EventKind::KeyPress,
                    Action::Release => EventKind::KeyRelease,
                    Action::Repeat => return,
                };
                self.dispatch(kind, |cb| {
                    if let Callback::Key(f) = cb {
                        f(key, mods);
                    }
                });
            }
            NativeEvent::MouseButton { button, action, mods } => {
                self.inner.borrow_mut().input.apply_button(button, action, mods);
                let kind = match action {
                    Action::Press => EventKind::MousePress,
                    Action::Release => EventKind::MouseRelease,
                    Action::Repeat => return,
                };
                let (x, y) = self.native_cursor();
                self.dispatch(kind, |cb| {
                    if let Callback::Button(f) = cb {
                        f(x, y, button, mods);
                    }
                });
            }
            NativeEvent::CursorPos { x, y } => {
                self.inner.borrow_mut().input.apply_cursor(x, y);
                self.dispatch(EventKind::MouseMotion, |cb| {
                    if let Callback::Cursor(f) = cb {
                        f(x, y);
                    }
                });
            }
            NativeEvent::Scroll { dx, dy } => {
                let (x, y) = self.native_cursor();
                self.dispatch(EventKind::MouseScroll, |cb| {
                    if let Callback::Scroll(f) = cb {
                        f(x, y, dx, dy);
                    }
                });
            }
            NativeEvent::Size { width, height } => {
                let handle = {
                    let mut inner = self.inner.borrow_mut();
                    inner.width = width;
                    inner.height = height;
                    inner.handle
                };
                self.backend.with(|b| b.set_projection(handle, width, height));
                self.dispatch(EventKind::Resize, |cb| {
                    if let Callback::Size(f) = cb {
                        f(width, height);
                    }
                });
            }
            NativeEvent::Close => {
                if !self.fire(EventKind::Close) {
                    self.close_by_policy();
                }
            }
            NativeEvent::Focus(focused) => {
                self.inner.borrow_mut().input.apply_focus(focused);
                self.fire(if focused { EventKind::GainFocus } else { EventKind::LoseFocus });
            }
            NativeEvent::Iconify(iconified) => {
                self.fire(if iconified { EventKind::Hide } else { EventKind::Show });
            }
            NativeEvent::Maximize(maximized) => {
                self.fire(if maximized { EventKind::Show } else { EventKind::Hide });
            }
        }
    }

    fn native_cursor(&self) -> (f64, f64) {
        let handle = self.handle();
        self.backend.with(|b| b.cursor_position(handle))
    }

    /// Dispatches a no-argument event. Returns whether a handler ran.
    fn fire(&self, kind: EventKind) -> bool {
        self.dispatch(kind, |cb| {
            if let Callback::Unit(f) = cb {
                f();
            }
        })
    }

    /// Calls the handler for `kind`, if any, without holding a borrow of the
    /// window so the handler may re-enter it. Returns whether a handler ran.
    fn dispatch(&self, kind: EventKind, call: impl FnOnce(&mut Callback)) -> bool {
        let Some(mut callback) = self.inner.borrow_mut().handlers.take(kind) else {
            return false;
        };
        call(&mut callback);
        self.inner.borrow_mut().handlers.restore(kind, callback);
        true
    }
}

impl PartialEq for Window {
    /// Identity: two handles are equal when they address the same window.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Window {}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Window")
            .field("handle", &inner.handle)
            .field("title", &inner.title)
            .field("size", &(inner.width, inner.height))
            .field("state", &inner.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, HeadlessBackend};
    use crate::core::Signature;
    use std::cell::Cell;

    fn setup() -> (HeadlessBackend, Platform) {
        let headless = HeadlessBackend::new();
        let platform = Platform::new(headless.clone());
        (headless, platform)
    }

    fn key_event(key: Key, action: Action) -> NativeEvent {
        NativeEvent::Key {
            key,
            scancode: 0,
            action,
            mods: Modifiers::NONE,
        }
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn construction_binds_context_and_projection() {
        let (headless, platform) = setup();
        let w = Window::new(&platform, WindowConfig::new(320, 240, "t")).unwrap();
        let h = w.handle();

        assert_eq!(
            headless.calls(),
            vec![
                BackendCall::CreateWindow {
                    handle: h,
                    width: 320,
                    height: 240,
                    title: "t".into()
                },
                BackendCall::MakeContextCurrent(h),
                BackendCall::SetProjection {
                    handle: h,
                    width: 320,
                    height: 240
                },
            ]
        );
        assert_eq!(platform.windows().len(), 1);
    }

    #[test]
    fn failed_creation_registers_nothing() {
        let (headless, platform) = setup();
        headless.fail_window_creation("no display");
        let err = Window::new(&platform, WindowConfig::default()).unwrap_err();
        assert!(matches!(err, ShellError::BackendInit(_)));
        assert!(platform.windows().is_empty());
    }

    // ── registration ──────────────────────────────────────────────────────

    #[test]
    fn draw_with_a_parameter_is_arity_mismatch() {
        let (_, platform) = setup();
        let w = platform.create_window(WindowConfig::default()).unwrap();
        let err = w.event("on_draw", Callback::size(|_, _| {})).unwrap_err();
        assert_eq!(
            err,
            ShellError::ArityMismatch {
                event: "on_draw",
                expected: Signature::Unit,
                actual: Signature::Size,
            }
        );
        assert!(!w.has_handler(EventKind::Draw));
    }

    #[test]
    fn unknown_window_event_is_rejected() {
        let (_, platform) = setup();
        let w = platform.create_window(WindowConfig::default()).unwrap();
        let err = w.event("on_update", Callback::step(|_| {})).unwrap_err();
        assert_eq!(err, ShellError::UnknownEvent { name: "on_update".into() });
    }

    #[test]
    fn second_draw_handler_is_duplicate() {
        let (_, platform) = setup();
        let w = platform.create_window(WindowConfig::default()).unwrap();
        w.on_draw(|| {}).unwrap();
        assert_eq!(
            w.on_draw(|| {}),
            Err(ShellError::DuplicateRegistration { event: "on_draw" })
        );
    }

    // ── update ────────────────────────────────────────────────────────────

    #[test]
    fn update_draws_then_swaps_then_polls() {
        let (headless, platform) = setup();
        let w = platform.create_window(WindowConfig::default()).unwrap();
        let h = w.handle();
        let painter = w.clone();
        w.on_draw(move || painter.clear(Color::RED)).unwrap();

        headless.clear_calls();
        w.update();

        assert_eq!(
            headless.calls(),
            vec![
                BackendCall::MakeContextCurrent(h),
                BackendCall::Clear(Color::RED),
                BackendCall::SwapBuffers(h),
                BackendCall::PollEvents,
            ]
        );
    }

    #[test]
    fn key_action_is_split_into_press_and_release() {
        let (headless, platform) = setup();
        let w = platform.create_window(WindowConfig::default()).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        w.on_key_press(move |k, _| l.borrow_mut().push(("press", k))).unwrap();
        let l = log.clone();
        w.on_key_release(move |k, _| l.borrow_mut().push(("release", k))).unwrap();

        headless.inject(w.handle(), key_event(Key::A, Action::Press));
        headless.inject(w.handle(), key_event(Key::A, Action::Repeat));
        headless.inject(w.handle(), key_event(Key::A, Action::Release));
        w.update();

        assert_eq!(*log.borrow(), vec![("press", Key::A), ("release", Key::A)]);
        assert!(!w.is_key_down(Key::A));
    }

    #[test]
    fn key_is_held_while_press_handler_runs() {
        let (headless, platform) = setup();
        let w = platform.create_window(WindowConfig::default()).unwrap();
        let seen = Rc::new(Cell::new(false));

        let (s, me) = (seen.clone(), w.clone());
        w.on_key_press(move |k, _| s.set(me.is_key_down(k))).unwrap();

        headless.inject(w.handle(), key_event(Key::Space, Action::Press));
        w.update();
        assert!(seen.get());
    }

    #[test]
    fn mouse_press_carries_backend_cursor() {
        let (headless, platform) = setup();
        let w = platform.create_window(WindowConfig::default()).unwrap();
        let got = Rc::new(RefCell::new(None));

        let g = got.clone();
        w.on_mouse_press(move |x, y, b, _| *g.borrow_mut() = Some((x, y, b)))
            .unwrap();

        headless.set_cursor(w.handle(), 12.0, 34.0);
        headless.inject(
            w.handle(),
            NativeEvent::MouseButton {
                button: MouseButton::Left,
                action: Action::Press,
                mods: Modifiers::NONE,
            },
        );
        w.update();
        assert_eq!(*got.borrow(), Some((12.0, 34.0, MouseButton::Left)));
    }

    #[test]
    fn scroll_passes_cursor_and_offsets() {
        let (headless, platform) = setup();
        let w = platform.create_window(WindowConfig::default()).unwrap();
        let got = Rc::new(RefCell::new(None));

        let g = got.clone();
        w.on_mouse_scroll(move |x, y, sx, sy| *g.borrow_mut() = Some((x, y, sx, sy)))
            .unwrap();

        headless.set_cursor(w.handle(), 1.0, 2.0);
        headless.inject(w.handle(), NativeEvent::Scroll { dx: 0.0, dy: -3.0 });
        w.update();
        assert_eq!(*got.borrow(), Some((1.0, 2.0, 0.0, -3.0)));
    }

    #[test]
    fn resize_updates_stored_size_before_handler() {
        let (headless, platform) = setup();
        let w = platform.create_window(WindowConfig::default()).unwrap();
        let seen = Rc::new(Cell::new((0, 0)));

        let (s, me) = (seen.clone(), w.clone());
        w.on_resize(move |_, _| s.set(me.size())).unwrap();

        headless.inject(w.handle(), NativeEvent::Size { width: 640, height: 480 });
        w.update();
        assert_eq!(seen.get(), (640, 480));
    }

    #[test]
    fn focus_iconify_and_maximize_map_to_lifecycle_events() {
        let (headless, platform) = setup();
        let w = platform.create_window(WindowConfig::default()).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (kind, tag) in [
            (EventKind::GainFocus, "gain"),
            (EventKind::LoseFocus, "lose"),
            (EventKind::Show, "show"),
            (EventKind::Hide, "hide"),
        ] {
            let l = log.clone();
            w.register(kind, Callback::unit(move || l.borrow_mut().push(tag)))
                .unwrap();
        }

        let h = w.handle();
        headless.inject(h, NativeEvent::Focus(true));
        headless.inject(h, NativeEvent::Iconify(true));
        headless.inject(h, NativeEvent::Iconify(false));
        headless.inject(h, NativeEvent::Maximize(true));
        headless.inject(h, NativeEvent::Maximize(false));
        headless.inject(h, NativeEvent::Focus(false));
        w.update();

        assert_eq!(
            *log.borrow(),
            vec!["gain", "hide", "show", "show", "hide", "lose"]
        );
        assert!(!w.has_focus());
    }

    // ── close ─────────────────────────────────────────────────────────────

    #[test]
    fn close_handler_replaces_default_close() {
        let (headless, platform) = setup();
        let w = platform.create_window(WindowConfig::default()).unwrap();
        let hits = Rc::new(Cell::new(0));

        let c = hits.clone();
        w.on_close(move || c.set(c.get() + 1)).unwrap();
        headless.inject(w.handle(), NativeEvent::Close);
        w.update();

        assert_eq!(hits.get(), 1);
        assert!(w.is_open());
    }

    #[test]
    fn unhandled_close_with_shutdown_closes_every_window() {
        let (headless, platform) = setup();
        let a = platform.create_window(WindowConfig::default()).unwrap();
        let b = platform.create_window(WindowConfig::default()).unwrap();

        headless.inject(a.handle(), NativeEvent::Close);
        a.update();

        assert!(!a.is_open());
        assert!(!b.is_open());
        assert!(headless.calls().contains(&BackendCall::Terminate));
    }

    #[test]
    fn unhandled_close_with_window_only_policy_spares_others() {
        let (headless, platform) = setup();
        let cfg = WindowConfig::default().close_policy(ClosePolicy::CloseThisWindowOnly);
        let a = platform.create_window(cfg.clone()).unwrap();
        let b = platform.create_window(cfg).unwrap();

        headless.inject(a.handle(), NativeEvent::Close);
        a.update();

        assert_eq!(a.state(), WindowState::Closed);
        assert!(b.is_open());
        assert!(!headless.calls().contains(&BackendCall::Terminate));
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn setters_push_to_backend_immediately() {
        let (headless, platform) = setup();
        let w = platform.create_window(WindowConfig::default()).unwrap();
        let h = w.handle();
        headless.clear_calls();

        w.set_x(10.7);
        w.set_height(300);
        w.set_title("moved");

        assert_eq!(
            headless.calls(),
            vec![
                BackendCall::SetWindowPos { handle: h, x: 10, y: 0 },
                BackendCall::SetWindowSize { handle: h, width: 800, height: 300 },
                BackendCall::SetWindowTitle { handle: h, title: "moved".into() },
            ]
        );
        assert_eq!(w.position(), (10.7, 0.0));
        assert_eq!(w.title(), "moved");
    }

    #[test]
    fn handler_can_reenter_its_window() {
        let (headless, platform) = setup();
        let w = platform.create_window(WindowConfig::default()).unwrap();

        let me = w.clone();
        let hide_bound = Rc::new(RefCell::new(None));
        let h = hide_bound.clone();
        w.on_key_press(move |k, _| {
            me.set_title(format!("pressed {k}"));
            *h.borrow_mut() = Some(me.on_hide(|| {}));
        })
        .unwrap();

        headless.inject(w.handle(), key_event(Key::Q, Action::Press));
        w.update();

        assert_eq!(w.title(), "pressed Q");
        assert_eq!(*hide_bound.borrow(), Some(Ok(())));
        assert!(w.has_handler(EventKind::KeyPress));
        assert!(w.has_handler(EventKind::Hide));
    }

    #[test]
    fn handler_cannot_rebind_its_own_event() {
        let (headless, platform) = setup();
        let w = platform.create_window(WindowConfig::default()).unwrap();

        let first_calls = Rc::new(Cell::new(0));
        let second_calls = Rc::new(Cell::new(0));
        let rebind = Rc::new(RefCell::new(None));

        let (me, f, s, r) = (w.clone(), first_calls.clone(), second_calls.clone(), rebind.clone());
        w.on_key_press(move |_, _| {
            f.set(f.get() + 1);
            if r.borrow().is_none() {
                let s = s.clone();
                *r.borrow_mut() = Some(me.on_key_press(move |_, _| s.set(s.get() + 1)));
            }
        })
        .unwrap();

        headless.inject(w.handle(), key_event(Key::A, Action::Press));
        w.update();
        headless.inject(w.handle(), key_event(Key::B, Action::Press));
        w.update();

        assert_eq!(
            *rebind.borrow(),
            Some(Err(ShellError::DuplicateRegistration { event: "on_key_press" }))
        );
        assert_eq!(first_calls.get(), 2);
        assert_eq!(second_calls.get(), 0);
    }
}
