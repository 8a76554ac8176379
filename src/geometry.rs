use glam::{vec2, vec3, Vec2, Vec3};

use crate::color::ColorRGB;
use crate::types::Vertex;

#[inline]
fn vertex(pos: Vec3, normal: Vec3, uv: Vec2, color: ColorRGB) -> Vertex {
    Vertex { pos, color, uv, normal, tangent: Vec3::ZERO }
}

/// Axis-aligned cube as a triangle list, 4 vertices per face.
pub fn make_cube(size: f32, color: ColorRGB) -> (Vec<Vertex>, Vec<u32>) {
    let s = size * 0.5;
    let p = [
        vec3(-s, -s,  s), vec3( s, -s,  s), vec3( s,  s,  s), vec3(-s,  s,  s),
        vec3(-s, -s, -s), vec3(-s,  s, -s), vec3( s,  s, -s), vec3( s, -s, -s),
        vec3(-s,  s, -s), vec3(-s,  s,  s), vec3( s,  s,  s), vec3( s,  s, -s),
        vec3(-s, -s, -s), vec3( s, -s, -s), vec3( s, -s,  s), vec3(-s, -s,  s),
        vec3( s, -s, -s), vec3( s,  s, -s), vec3( s,  s,  s), vec3( s, -s,  s),
        vec3(-s, -s, -s), vec3(-s, -s,  s), vec3(-s,  s,  s), vec3(-s,  s, -s),
    ];
    let face_normals = [Vec3::Z, Vec3::NEG_Z, Vec3::Y, Vec3::NEG_Y, Vec3::X, Vec3::NEG_X];
    let uv = [vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(1.0, 1.0), vec2(0.0, 1.0)];

    let mut verts: Vec<Vertex> = (0..24)
        .map(|i| vertex(p[i], face_normals[i / 4], uv[i % 4], color))
        .collect();
    let idx: Vec<u32> = (0..6u32)
        .flat_map(|face| {
            let b = face * 4;
            [b, b + 1, b + 2, b, b + 2, b + 3]
        })
        .collect();

    compute_tangents(&mut verts, &idx);
    (verts, idx)
}

/// UV sphere as a triangle list.
pub fn make_uv_sphere(rings: u32, segments: u32, radius: f32, color: ColorRGB) -> (Vec<Vertex>, Vec<u32>) {
    let rings = rings.max(2);
    let segments = segments.max(3);
    let mut verts: Vec<Vertex> = Vec::with_capacity((rings as usize + 1) * (segments as usize + 1));
    for r in 0..=rings {
        let v = r as f32 / rings as f32;
        let theta = v * std::f32::consts::PI;
        let (st, ct) = theta.sin_cos();
        for s in 0..=segments {
            let u = s as f32 / segments as f32;
            let phi = u * std::f32::consts::TAU;
            let (sp, cp) = phi.sin_cos();
            let n = vec3(cp * st, ct, sp * st);
            let mut vert = vertex(n * radius, n, vec2(u, 1.0 - v), color);
            // direction of increasing u
            vert.tangent = vec3(-sp, 0.0, cp);
            verts.push(vert);
        }
    }
    let stride = segments + 1;
    let mut idx: Vec<u32> = Vec::with_capacity(rings as usize * segments as usize * 6);
    for r in 0..rings {
        for s in 0..segments {
            let i0 = r * stride + s;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;
            idx.extend_from_slice(&[i0, i1, i2, i1, i3, i2]);
        }
    }
    (verts, idx)
}

/// Quad in the XY plane facing -Z, as a two-triangle list.
pub fn make_quad(half_width: f32, half_height: f32, color: ColorRGB) -> (Vec<Vertex>, Vec<u32>) {
    let n = Vec3::NEG_Z;
    let mut verts = vec![
        vertex(vec3(-half_width,  half_height, 0.0), n, vec2(0.0, 0.0), color),
        vertex(vec3( half_width,  half_height, 0.0), n, vec2(1.0, 0.0), color),
        vertex(vec3(-half_width, -half_height, 0.0), n, vec2(0.0, 1.0), color),
        vertex(vec3( half_width, -half_height, 0.0), n, vec2(1.0, 1.0), color),
    ];
    for v in &mut verts {
        v.tangent = Vec3::X;
    }
    (verts, vec![0, 1, 2, 1, 3, 2])
}

/// Wavy band facing -Z, emitted as a triangle strip of `2 * (segments + 1)`
/// indices. Pairs run bottom then top so even strip triangles face the viewer.
pub fn make_ribbon(width: f32, height: f32, segments: u32, amplitude: f32, color: ColorRGB) -> (Vec<Vertex>, Vec<u32>) {
    let segments = segments.max(3);
    let freq = std::f32::consts::TAU / width;
    let mut verts = Vec::with_capacity(2 * (segments as usize + 1));
    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let x = -0.5 * width + t * width;
        let z = amplitude * (x * freq).sin();
        let slope = amplitude * freq * (x * freq).cos();
        let normal = vec3(slope, 0.0, -1.0).normalize();
        let tangent = vec3(1.0, 0.0, slope).normalize();
        for (y, v) in [(-0.5 * height, 1.0), (0.5 * height, 0.0)] {
            let mut vert = vertex(vec3(x, y, z), normal, vec2(t, v), color);
            vert.tangent = tangent;
            verts.push(vert);
        }
    }
    let idx = (0..verts.len() as u32).collect();
    (verts, idx)
}

/// Per-vertex tangents from UV gradients over a triangle list, orthogonalized
/// against the vertex normal.
pub fn compute_tangents(verts: &mut [Vertex], indices: &[u32]) {
    let mut acc = vec![Vec3::ZERO; verts.len()];
    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (a, b, c) = (verts[i0], verts[i1], verts[i2]);
        let e1 = b.pos - a.pos;
        let e2 = c.pos - a.pos;
        let d1 = b.uv - a.uv;
        let d2 = c.uv - a.uv;
        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() < 1e-8 {
            continue;
        }
        let t = (e1 * d2.y - e2 * d1.y) / det;
        acc[i0] += t;
        acc[i1] += t;
        acc[i2] += t;
    }
    for (v, t) in verts.iter_mut().zip(acc) {
        v.tangent = (t - v.normal * v.normal.dot(t)).normalize_or_zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cube_has_six_faces_of_two_triangles() {
        let (verts, idx) = make_cube(1.0, ColorRGB::WHITE);
        assert_eq!(verts.len(), 24);
        assert_eq!(idx.len(), 36);
        assert!(idx.iter().all(|&i| (i as usize) < verts.len()));
    }

    #[test]
    fn cube_tangents_are_orthogonal_unit_vectors() {
        let (verts, _) = make_cube(2.0, ColorRGB::WHITE);
        for v in &verts {
            assert_relative_eq!(v.tangent.length(), 1.0, epsilon = 1e-5);
            assert_relative_eq!(v.tangent.dot(v.normal), 0.0, epsilon = 1e-5);
        }
        // +Z face: u runs along +X
        assert_relative_eq!(verts[0].tangent.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn ribbon_is_a_valid_strip() {
        let (verts, idx) = make_ribbon(2.0, 0.5, 8, 0.1, ColorRGB::WHITE);
        assert_eq!(verts.len(), 18);
        assert_eq!(idx.len(), 18);
        assert!(idx.len() > 6);
    }

    #[test]
    fn sphere_indices_in_range() {
        let (verts, idx) = make_uv_sphere(8, 12, 1.0, ColorRGB::WHITE);
        assert_eq!(idx.len() % 3, 0);
        assert!(idx.iter().all(|&i| (i as usize) < verts.len()));
    }
}
