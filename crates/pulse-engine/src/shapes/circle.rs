use std::f32::consts::TAU;

use crate::backend::{Painter, PrimitiveKind};
use crate::coords::Vec2;
use crate::paint::Color;

use super::Drawable;

/// Filled circle approximated by a triangle fan.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,

    /// Rim subdivisions. Values below 3 are drawn as 3.
    pub segments: u32,
}

impl Circle {
    pub const DEFAULT_SEGMENTS: u32 = 30;

    #[inline]
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            color: Color::BLUE,
            segments: Self::DEFAULT_SEGMENTS,
        }
    }

    #[inline]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = segments;
        self
    }
}

impl Drawable for Circle {
    /// Emits the centre, then `segments + 1` rim points so the fan closes.
    fn draw(&self, painter: &mut dyn Painter) {
        let segments = self.segments.max(3);
        let Vec2 { x, y } = self.center;

        painter.set_color(self.color);
        painter.begin(PrimitiveKind::TriangleFan);
        painter.vertex(x, y);
        for i in 0..=segments {
            let theta = i as f32 * TAU / segments as f32;
            painter.vertex(x + self.radius * theta.cos(), y + self.radius * theta.sin());
        }
        painter.end();
    }
}
