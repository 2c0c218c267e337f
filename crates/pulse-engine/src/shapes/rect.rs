use crate::backend::{Painter, PrimitiveKind};
use crate::coords::Vec2;
use crate::paint::Color;

use super::Drawable;

/// Axis-aligned filled rectangle; `position` is the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub position: Vec2,
    pub size: Vec2,
    pub color: Color,
}

impl Rectangle {
    #[inline]
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            color: Color::WHITE,
        }
    }

    #[inline]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Drawable for Rectangle {
    fn draw(&self, painter: &mut dyn Painter) {
        let Vec2 { x, y } = self.position;
        let Vec2 { x: w, y: h } = self.size;

        painter.set_color(self.color);
        painter.begin(PrimitiveKind::Quads);
        painter.vertex(x, y);
        painter.vertex(x + w, y);
        painter.vertex(x + w, y + h);
        painter.vertex(x, y + h);
        painter.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, HeadlessBackend};

    #[test]
    fn draws_one_quad_clockwise_from_top_left() {
        let mut p = HeadlessBackend::new();
        Rectangle::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0))
            .with_color(Color::GREEN)
            .draw(&mut p);

        assert_eq!(
            p.calls(),
            vec![
                BackendCall::SetColor(Color::GREEN),
                BackendCall::Begin(PrimitiveKind::Quads),
                BackendCall::Vertex(1.0, 2.0),
                BackendCall::Vertex(4.0, 2.0),
                BackendCall::Vertex(4.0, 6.0),
                BackendCall::Vertex(1.0, 6.0),
                BackendCall::End,
            ]
        );
    }

    #[test]
    fn default_color_is_white() {
        let r = Rectangle::new(Vec2::zero(), Vec2::zero());
        assert_eq!(r.color, Color::WHITE);
    }
}
