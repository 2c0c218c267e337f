//! Pulse engine crate.
//!
//! A small 2D application shell:
//! - `core::App` runs a fixed/variable timestep loop and pumps windows
//! - `window::Window` turns native input into a fixed set of named events
//! - `shapes` holds drawables and the `Batch` that draws them together
//! - `components` holds plain data components such as `Transform`
//! - `backend` is the boundary to the windowing/drawing system, with a
//!   recording headless backend and a winit + wgpu desktop backend

pub mod backend;
pub mod components;
pub mod core;
pub mod coords;
pub mod error;
pub mod input;
pub mod logging;
pub mod paint;
pub mod shapes;
pub mod time;
pub mod window;

pub use crate::core::{App, AppConfig, Callback, RunFlag, Signature, UpdateKind};
pub use crate::error::ShellError;
pub use crate::window::{ClosePolicy, EventKind, Platform, Window, WindowConfig};
