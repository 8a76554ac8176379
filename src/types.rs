use glam::{Vec2, Vec3, Vec4};

use crate::color::ColorRGB;

/// Model-space vertex as supplied by the scene.
#[derive(Clone, Copy, Debug, Default)]
pub struct Vertex {
    pub pos: Vec3,
    pub color: ColorRGB,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
}

/// Vertex after projection.
///
/// `pos.xy` is in pixels, `pos.z` is normalized depth and `pos.w` keeps the
/// view-space depth from before the perspective divide. On interpolated
/// fragments `pos.z` and `pos.w` both hold the interpolated view depth.
#[derive(Clone, Copy, Debug, Default)]
pub struct VertexOut {
    pub pos: Vec4,
    pub world_pos: Vec3,
    pub color: ColorRGB,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// NDC `[-1, 1]` to pixels, with Y pointing down.
    #[inline]
    pub fn to_screen(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (1.0 + ndc.x) * 0.5 * self.width as f32,
            (1.0 - ndc.y) * 0.5 * self.height as f32,
        )
    }
}

/// Axis-aligned screen-space bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn from_points(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self {
            left: a.x.min(b.x).min(c.x),
            right: a.x.max(b.x).max(c.x),
            top: a.y.min(b.y).min(c.y),
            bottom: a.y.max(b.y).max(c.y),
        }
    }
}

/// Three projected vertices and their screen-space face normal.
///
/// The normal is built from `(x, y, w)` of each vertex; a positive `z` means the
/// face points away from the viewer.
#[derive(Clone, Copy, Debug)]
pub struct TriangleOut {
    pub v: [VertexOut; 3],
    pub normal: Vec3,
}

impl TriangleOut {
    pub fn new(v0: VertexOut, v1: VertexOut, v2: VertexOut) -> Self {
        let p0 = Vec3::new(v0.pos.x, v0.pos.y, v0.pos.w);
        let p1 = Vec3::new(v1.pos.x, v1.pos.y, v1.pos.w);
        let p2 = Vec3::new(v2.pos.x, v2.pos.y, v2.pos.w);
        let normal = (p2 - p0).cross(p1 - p0).normalize_or_zero();
        Self { v: [v0, v1, v2], normal }
    }

    #[inline]
    pub fn screen(&self, k: usize) -> Vec2 {
        self.v[k].pos.truncate().truncate()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.screen(0), self.screen(1), self.screen(2))
    }
}
