//! Backend boundary.
//!
//! The core never talks to a windowing system directly. It drives a
//! `GraphicsBackend`, which owns native windows, polls input and executes
//! primitive draw commands. Two implementations ship with the crate:
//!
//! - `HeadlessBackend`: in-memory, records every call; used by tests and
//!   headless simulation
//! - `winit::WinitBackend`: desktop windows via winit, drawing via wgpu

mod headless;
mod painter;
pub mod winit;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::input::{Action, Key, Modifiers, MouseButton};
use crate::window::WindowConfig;

pub use headless::{BackendCall, HeadlessBackend};
pub use painter::{ColorVertex, Painter, PrimitiveBatcher, PrimitiveKind};

/// Opaque identifier of a native window, unique for the backend's lifetime.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NativeHandle(pub u64);

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Native callback payloads, queued per window by `poll_events`.
///
/// Parameters are the backend's own, untranslated: a single `Key` event
/// carries an action code that the window splits into press/release.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    Key {
        key: Key,
        scancode: u32,
        action: Action,
        mods: Modifiers,
    },
    MouseButton {
        button: MouseButton,
        action: Action,
        mods: Modifiers,
    },
    CursorPos { x: f64, y: f64 },
    Scroll { dx: f64, dy: f64 },
    Size { width: u32, height: u32 },
    Close,
    Focus(bool),
    Iconify(bool),
    Maximize(bool),
}

/// Failure reported by a backend during initialization or window creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { message: msg.into() }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BackendError {}

/// Windowing + drawing backend consumed by the core.
///
/// Calls addressing a handle that was destroyed (or a backend that was
/// terminated) must be ignored rather than fail.
pub trait GraphicsBackend: Painter {
    /// Creates a native window of the configured size and title.
    fn create_window(&mut self, config: &WindowConfig) -> Result<NativeHandle, BackendError>;

    fn destroy_window(&mut self, handle: NativeHandle);

    /// Whether `handle` still refers to a live native window.
    fn window_exists(&self, handle: NativeHandle) -> bool;

    /// Destroys every window and releases the backend for the whole process.
    fn terminate(&mut self);

    /// Binds `handle` as the target of subsequent `Painter` calls.
    fn make_context_current(&mut self, handle: NativeHandle);

    /// Sets a top-left-origin orthographic projection of `width` × `height` pixels.
    fn set_projection(&mut self, handle: NativeHandle, width: u32, height: u32);

    /// Presents everything painted into `handle` since the previous swap.
    fn swap_buffers(&mut self, handle: NativeHandle);

    /// Collects pending native input for every window into per-window queues.
    fn poll_events(&mut self);

    /// Takes the events queued for `handle` by `poll_events`, oldest first.
    fn drain_events(&mut self, handle: NativeHandle) -> Vec<NativeEvent>;

    fn set_window_size(&mut self, handle: NativeHandle, width: u32, height: u32);
    fn set_window_pos(&mut self, handle: NativeHandle, x: i32, y: i32);
    fn set_window_title(&mut self, handle: NativeHandle, title: &str);

    /// Cursor position in window pixels, relative to the top-left corner.
    fn cursor_position(&self, handle: NativeHandle) -> (f64, f64);

    fn as_painter(&mut self) -> &mut dyn Painter;
}

/// Shared, single-threaded handle to the process backend.
///
/// Borrows are scoped to one closure call; never hold one across a user
/// callback.
#[derive(Clone)]
pub struct Backend(Rc<RefCell<dyn GraphicsBackend>>);

impl Backend {
    pub fn new<B: GraphicsBackend + 'static>(backend: B) -> Self {
        Self(Rc::new(RefCell::new(backend)))
    }

    /// Runs `f` with exclusive access to the backend.
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn GraphicsBackend) -> R) -> R {
        f(&mut *self.0.borrow_mut())
    }

    /// Runs `f` against the backend's painter (the current window's frame).
    pub fn paint<R>(&self, f: impl FnOnce(&mut dyn Painter) -> R) -> R {
        self.with(|b| f(b.as_painter()))
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Backend")
    }
}
