use crate::coords::Vec2;

use super::Component;

/// Placement of an object in window pixels.
///
/// `rotation` is a direction vector, not an angle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: Vec2,
    pub scale: Vec2,
}

impl Component for Transform {}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            rotation: Vec2::new(1.0, 0.0),
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn new(position: Vec2, rotation: Vec2, scale: Vec2) -> Self {
        Self { position, rotation, scale }
    }

    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}
