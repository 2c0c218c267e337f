//! Input subsystem.
//!
//! Backend-agnostic key, button and modifier types. Backends translate their
//! native events into these before handing them to a `Window`.

mod state;
mod types;

pub use state::InputState;
pub use types::{Action, Key, Modifiers, MouseButton};
