//! Paint model: solid colors only.

pub mod color;

pub use color::Color;
