//! Coordinate types.
//!
//! Canonical space is window pixels: origin top-left, +X right, +Y down.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
