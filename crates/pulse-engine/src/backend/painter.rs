use bytemuck::{Pod, Zeroable};

use crate::paint::Color;

/// Primitive assembly modes understood by every backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveKind {
    /// Every 4 vertices form one quad.
    Quads,
    /// First vertex is the hub; each following pair forms a triangle with it.
    TriangleFan,
    /// Every 3 vertices form one triangle.
    Triangles,
}

/// Immediate-mode drawing commands.
///
/// A primitive is `begin(kind)`, any number of `vertex` calls, then `end`.
/// Vertices take the color set most recently.
pub trait Painter {
    /// Discards everything painted this frame and fills it with `color`.
    fn clear(&mut self, color: Color);

    fn set_color(&mut self, color: Color);
    fn begin(&mut self, kind: PrimitiveKind);
    fn vertex(&mut self, x: f32, y: f32);
    fn end(&mut self);
}

/// GPU vertex: pixel position + premultiplied color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

impl ColorVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4  // color
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// `Painter` that triangulates primitives into a flat triangle list.
///
/// Incomplete trailing vertices (a quad with 3 corners, a fan with fewer
/// than 3 vertices) are dropped at `end`. Vertices outside `begin`/`end`
/// are ignored.
#[derive(Debug)]
pub struct PrimitiveBatcher {
    color: [f32; 4],
    clear: Option<Color>,
    open: Option<(PrimitiveKind, Vec<ColorVertex>)>,
    triangles: Vec<ColorVertex>,
}

impl PrimitiveBatcher {
    pub fn new() -> Self {
        Self {
            color: Color::WHITE.to_premul_array(),
            clear: None,
            open: None,
            triangles: Vec::new(),
        }
    }

    /// Triangle-list vertices recorded so far.
    pub fn triangles(&self) -> &[ColorVertex] {
        &self.triangles
    }

    /// Clear color requested this frame, if any.
    pub fn clear_color(&self) -> Option<Color> {
        self.clear
    }

    /// Ends the frame: returns the recorded triangles and clear request, and
    /// resets for the next frame. The current color carries over.
    pub fn finish(&mut self) -> (Vec<ColorVertex>, Option<Color>) {
        self.open = None;
        (std::mem::take(&mut self.triangles), self.clear.take())
    }

    fn flush(&mut self, kind: PrimitiveKind, verts: Vec<ColorVertex>) {
        match kind {
            PrimitiveKind::Triangles => {
                let whole = verts.len() - verts.len() % 3;
                self.triangles.extend_from_slice(&verts[..whole]);
            }
            PrimitiveKind::Quads => {
                for q in verts.chunks_exact(4) {
                    self.triangles.extend_from_slice(&[q[0], q[1], q[2], q[0], q[2], q[3]]);
                }
            }
            PrimitiveKind::TriangleFan => {
                if verts.len() < 3 {
                    return;
                }
                let hub = verts[0];
                for pair in verts[1..].windows(2) {
                    self.triangles.extend_from_slice(&[hub, pair[0], pair[1]]);
                }
            }
        }
    }
}

impl Default for PrimitiveBatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Painter for PrimitiveBatcher {
    fn clear(&mut self, color: Color) {
        self.triangles.clear();
        self.clear = Some(color);
    }

    fn set_color(&mut self, color: Color) {
        self.color = color.to_premul_array();
    }

    fn begin(&mut self, kind: PrimitiveKind) {
        if self.open.is_some() {
            log::debug!("begin({kind:?}) inside an open primitive; previous one dropped");
        }
        self.open = Some((kind, Vec::new()));
    }

    fn vertex(&mut self, x: f32, y: f32) {
        let color = self.color;
        if let Some((_, verts)) = self.open.as_mut() {
            verts.push(ColorVertex { pos: [x, y], color });
        }
    }

    fn end(&mut self) {
        if let Some((kind, verts)) = self.open.take() {
            self.flush(kind, verts);
        }
    }
}
