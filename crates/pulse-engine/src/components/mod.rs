//! Plain data components.
//!
//! Components carry state only. Systems that read them (movement, physics)
//! live in application code, typically in an `on_fixed_update` handler.

mod rigid_body;
mod transform;

pub use rigid_body::RigidBody;
pub use transform::Transform;

/// Marker for data that can be attached to a game object.
pub trait Component: 'static {}
