use crate::coords::Vec2;

use super::Component;

/// Linear motion state. Velocity is in pixels per second, acceleration in
/// pixels per second squared.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RigidBody {
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub mass: f32,
}

impl Component for RigidBody {}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            velocity: Vec2::zero(),
            acceleration: Vec2::zero(),
            mass: 1.0,
        }
    }
}

impl RigidBody {
    pub fn new(velocity: Vec2, acceleration: Vec2, mass: f32) -> Self {
        Self {
            velocity,
            acceleration,
            mass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_component<C: Component>(_: &C) {}

    #[test]
    fn fields_are_stored_as_given() {
        let body = RigidBody::new(Vec2::new(3.0, -1.0), Vec2::new(0.0, 9.8), 2.5);
        assert_eq!(body.velocity, Vec2::new(3.0, -1.0));
        assert_eq!(body.acceleration, Vec2::new(0.0, 9.8));
        assert_eq!(body.mass, 2.5);
        assert_component(&body);
    }

    #[test]
    fn default_is_at_rest_with_unit_mass() {
        let body = RigidBody::default();
        assert_eq!(body.velocity, Vec2::zero());
        assert_eq!(body.mass, 1.0);
    }
}
