//! Windows and their event contract.
//!
//! A `Window` owns one native window of the `Platform`'s backend. Its
//! `update` draws a frame, presents it and translates the backend's native
//! input into the fixed `EventKind` set. Every window created on a platform
//! is appended to that platform's `WindowRegistry`, which the `App` pumps
//! once per tick.

mod config;
mod event;
mod instance;
mod platform;
mod registry;

pub use config::{ClosePolicy, WindowConfig};
pub use event::EventKind;
pub use instance::{Window, WindowState};
pub use platform::Platform;
pub use registry::WindowRegistry;
