//! Core loop contracts.
//!
//! - `App` drives the fixed/variable timestep loop and pumps windows
//! - `Callback` / `Signature` describe handler shapes; every event has exactly
//!   one expected signature, checked at registration time
//! - `EventContract` ties an event enum to its name and signature

mod app;
mod callback;
mod handlers;

pub use app::{App, AppConfig, AppState, RunFlag, UpdateKind};
pub use callback::{Callback, Signature};
pub use handlers::EventContract;

pub(crate) use handlers::HandlerTable;
