use std::cmp::Ordering;

use glam::{Vec2, Vec3, Vec4};

use crate::types::{TriangleOut, VertexOut};

/// Rows per band when a frame is split for parallel rasterization.
pub const CHUNK_ROWS: usize = 16;

/// Winning fragment for one pixel: the interpolated vertex and the index of
/// the mesh it came from.
#[derive(Clone, Copy, Debug)]
pub struct Fragment {
    pub mesh: usize,
    pub vertex: VertexOut,
}

/// Mutable view of rows `y0..y1` of the depth and attribute buffers.
///
/// Bands never overlap, so each can be rasterized on its own thread.
pub struct Band<'a> {
    pub depth: &'a mut [f32],
    pub fragments: &'a mut [Option<Fragment>],
    pub w: usize,
    pub y0: i32,
    pub y1: i32,
}

#[inline]
fn band_idx(band: &Band, x: i32, y: i32) -> usize {
    let local_row = (y - band.y0) as usize;
    local_row * band.w + (x as usize)
}

/// Twice the signed area of `(a, b, p)`; positive when `p` lies clockwise of
/// `a -> b` on a Y-down screen.
#[inline]
pub fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}

#[inline]
pub fn clamp_i32(v: i32, lo: i32, hi: i32) -> i32 { v.max(lo).min(hi) }

/// Barycentric weights of the center of pixel `(px, py)`, or `None` when the
/// center is outside the triangle or the triangle has no positive area.
///
/// The edge from vertex `i` to `i + 1` weighs vertex `i + 2`.
pub fn barycentric(tri: &TriangleOut, px: i32, py: i32) -> Option<Vec3> {
    let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
    let v = [tri.screen(0), tri.screen(1), tri.screen(2)];

    let area = (v[1] - v[0]).perp_dot(v[2] - v[0]);
    if area <= 0.0 {
        return None;
    }

    let mut bary = [0.0f32; 3];
    for i in 0..3 {
        let signed = edge(v[i], v[(i + 1) % 3], p);
        if signed < 0.0 {
            return None;
        }
        bary[(i + 2) % 3] = signed / area;
    }
    Some(Vec3::from_array(bary))
}

/// Perspective-correct depth: the harmonic blend of the per-vertex view depths.
#[inline]
pub fn interpolate_depth(tri: &TriangleOut, bary: Vec3) -> f32 {
    let inv = bary.x / tri.v[0].pos.w + bary.y / tri.v[1].pos.w + bary.z / tri.v[2].pos.w;
    1.0 / inv
}

/// Blends every vertex attribute at `bary` with `1/w` weighting. `depth` is
/// the value from [`interpolate_depth`].
pub fn interpolate(tri: &TriangleOut, bary: Vec3, depth: f32) -> VertexOut {
    let [a, b, c] = &tri.v;
    let wa = bary.x / a.pos.w * depth;
    let wb = bary.y / b.pos.w * depth;
    let wc = bary.z / c.pos.w * depth;

    let xy = a.pos.truncate().truncate() * bary.x
        + b.pos.truncate().truncate() * bary.y
        + c.pos.truncate().truncate() * bary.z;

    VertexOut {
        pos: Vec4::new(xy.x, xy.y, depth, depth),
        world_pos: a.world_pos * wa + b.world_pos * wb + c.world_pos * wc,
        color: a.color * wa + b.color * wb + c.color * wc,
        uv: a.uv * wa + b.uv * wb + c.uv * wc,
        normal: (a.normal * wa + b.normal * wb + c.normal * wc).normalize_or_zero(),
        tangent: (a.tangent * wa + b.tangent * wb + c.tangent * wc).normalize_or_zero(),
    }
}

/// Rasterizes the part of `tri` that falls inside `band`.
///
/// Walks `floor(left)..ceil(right)` by `floor(top)..ceil(bottom)`, clipped to
/// the band, and keeps a fragment only when its depth is strictly smaller than
/// what the depth buffer holds. Returns the number of fragments written.
pub fn draw_triangle_band(band: &mut Band, tri: &TriangleOut, mesh: usize) -> usize {
    let bounds = tri.bounds();
    let min_x = clamp_i32(bounds.left.floor() as i32, 0, band.w as i32);
    let max_x = clamp_i32(bounds.right.ceil() as i32, 0, band.w as i32);
    let min_y = clamp_i32(bounds.top.floor() as i32, band.y0, band.y1);
    let max_y = clamp_i32(bounds.bottom.ceil() as i32, band.y0, band.y1);

    let mut written = 0;
    for y in min_y..max_y {
        for x in min_x..max_x {
            let Some(bary) = barycentric(tri, x, y) else { continue };

            let depth = interpolate_depth(tri, bary);
            let idx = band_idx(band, x, y);
            if depth.partial_cmp(&band.depth[idx]) != Some(Ordering::Less) {
                continue;
            }
            band.depth[idx] = depth;
            band.fragments[idx] = Some(Fragment { mesh, vertex: interpolate(tri, bary, depth) });
            written += 1;
        }
    }
    written
}
