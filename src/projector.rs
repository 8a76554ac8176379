use glam::{Mat4, Vec2};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::types::{Vertex, VertexOut, Viewport};

/// Per-mesh transform inputs shared by every vertex.
#[derive(Clone, Copy, Debug)]
pub struct Transforms {
    pub model_to_world: Mat4,
    pub world_to_camera: Mat4,
    pub projection: Mat4,
    pub viewport: Viewport,
}

impl Transforms {
    pub fn new(camera: &Camera, model_to_world: Mat4, viewport: Viewport) -> Self {
        Self {
            model_to_world,
            world_to_camera: camera.view_matrix(),
            projection: camera.projection_matrix(viewport.aspect_ratio()),
            viewport,
        }
    }
}

#[inline]
pub fn project_vertex(v: &Vertex, t: &Transforms) -> VertexOut {
    let world_pos = t.model_to_world.transform_point3(v.pos);
    let normal = t.model_to_world.transform_vector3(v.normal).normalize_or_zero();
    let tangent = t.model_to_world.transform_vector3(v.tangent).normalize_or_zero();

    let view_pos = t.world_to_camera.transform_point3(world_pos);
    let mut pos = t.projection * view_pos.extend(1.0);

    // W keeps the view depth for perspective-correct interpolation
    let inv_w = 1.0 / pos.w;
    pos.x *= inv_w;
    pos.y *= inv_w;
    pos.z *= inv_w;

    let screen = t.viewport.to_screen(Vec2::new(pos.x, pos.y));
    pos.x = screen.x;
    pos.y = screen.y;

    VertexOut { pos, world_pos, color: v.color, uv: v.uv, normal, tangent }
}

/// Projects `vertices` into `out`, index for index. With `parallel` the map is
/// spread over the rayon pool; output order is the same either way.
pub fn project(vertices: &[Vertex], transforms: &Transforms, out: &mut Vec<VertexOut>, parallel: bool) {
    if parallel {
        vertices
            .par_iter()
            .map(|v| project_vertex(v, transforms))
            .collect_into_vec(out);
    } else {
        out.clear();
        out.extend(vertices.iter().map(|v| project_vertex(v, transforms)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorRGB;
    use approx::assert_relative_eq;
    use glam::{vec3, Vec3};

    fn camera() -> Camera {
        Camera::new(Vec3::ZERO, 90.0, 0.1, 100.0)
    }

    fn vert(pos: Vec3) -> Vertex {
        Vertex { pos, color: ColorRGB::WHITE, normal: Vec3::NEG_Z, tangent: Vec3::X, ..Default::default() }
    }

    #[test]
    fn centre_of_view_lands_mid_screen() {
        let vp = Viewport::new(200, 100);
        let t = Transforms::new(&camera(), Mat4::from_translation(vec3(0.0, 0.0, 10.0)), vp);
        let out = project_vertex(&vert(Vec3::ZERO), &t);
        assert_relative_eq!(out.pos.x, 100.0, epsilon = 1e-3);
        assert_relative_eq!(out.pos.y, 50.0, epsilon = 1e-3);
        assert_relative_eq!(out.pos.w, 10.0, epsilon = 1e-4);
        assert!(out.pos.z > 0.0 && out.pos.z < 1.0);
        assert_relative_eq!(out.world_pos.z, 10.0);
    }

    #[test]
    fn up_is_top_of_screen() {
        let vp = Viewport::new(100, 100);
        let t = Transforms::new(&camera(), Mat4::IDENTITY, vp);
        let out = project_vertex(&vert(vec3(0.0, 2.0, 4.0)), &t);
        assert!(out.pos.y < 50.0);
    }

    #[test]
    fn directions_are_renormalized() {
        let vp = Viewport::new(100, 100);
        let t = Transforms::new(&camera(), Mat4::from_scale(vec3(3.0, 3.0, 3.0)), vp);
        let out = project_vertex(&vert(vec3(0.0, 0.0, 4.0)), &t);
        assert_relative_eq!(out.normal.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(out.tangent.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn parallel_and_serial_agree_in_order() {
        let vp = Viewport::new(320, 240);
        let t = Transforms::new(&camera(), Mat4::from_translation(vec3(0.0, 0.0, 5.0)), vp);
        let verts: Vec<Vertex> = (0..500)
            .map(|i| vert(vec3((i % 25) as f32 * 0.1 - 1.2, (i / 25) as f32 * 0.1 - 1.0, (i % 7) as f32 * 0.2)))
            .collect();
        let mut serial = Vec::new();
        let mut parallel = Vec::new();
        project(&verts, &t, &mut serial, false);
        project(&verts, &t, &mut parallel, true);
        assert_eq!(serial.len(), verts.len());
        for (a, b) in serial.iter().zip(&parallel) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.world_pos, b.world_pos);
        }
    }
}
