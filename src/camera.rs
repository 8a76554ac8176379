use glam::{vec3, Mat4, Vec3, Vec4};

use crate::input::CameraInput;

const PITCH_LIMIT: f32 = 1.2;

/// Left-handed fly camera. At zero yaw and pitch it looks down +Z.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    fov_degrees: f32,
    fov_scale: f32,
    near: f32,
    far: f32,
    pub move_speed: f32,
    pub turn_speed: f32,
}

impl Camera {
    pub fn new(position: Vec3, fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees,
            fov_scale: fov_scale(fov_degrees),
            near,
            far,
            move_speed: 2.0,
            turn_speed: 1.8,
        }
    }

    pub fn fov_degrees(&self) -> f32 { self.fov_degrees }
    pub fn fov_scale(&self) -> f32 { self.fov_scale }
    pub fn near(&self) -> f32 { self.near }
    pub fn far(&self) -> f32 { self.far }

    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        vec3(sy * cp, sp, cy * cp)
    }

    /// World-to-camera transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_lh(self.position, self.forward(), Vec3::Y)
    }

    /// Maps view-space Z in `[near, far]` to `[0, 1]` after the divide, with W
    /// carrying the view-space depth.
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        let a = self.far / (self.far - self.near);
        let b = -(self.far * self.near) / (self.far - self.near);
        Mat4::from_cols(
            Vec4::new(1.0 / (aspect_ratio * self.fov_scale), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0 / self.fov_scale, 0.0, 0.0),
            Vec4::new(0.0, 0.0, a, 1.0),
            Vec4::new(0.0, 0.0, b, 0.0),
        )
    }

    /// Normalized depth the projection assigns to a view-space depth.
    pub fn normalized_depth(&self, view_depth: f32) -> f32 {
        let a = self.far / (self.far - self.near);
        let b = -(self.far * self.near) / (self.far - self.near);
        a + b / view_depth
    }

    pub fn update(&mut self, dt: f32, input: &CameraInput) {
        self.yaw += input.turn.x * self.turn_speed * dt;
        self.pitch = (self.pitch + input.turn.y * self.turn_speed * dt).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let forward = self.forward();
        let right = vec3(forward.z, 0.0, -forward.x).normalize_or_zero();
        let speed = if input.boost { self.move_speed * 2.0 } else { self.move_speed };
        let step = (forward * input.movement.z + right * input.movement.x + Vec3::Y * input.movement.y)
            * speed
            * dt;
        self.position += step;
    }
}

fn fov_scale(fov_degrees: f32) -> f32 {
    (fov_degrees.to_radians() * 0.5).tan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::{vec2, Vec2};

    #[test]
    fn view_looks_down_positive_z() {
        let cam = Camera::new(Vec3::ZERO, 90.0, 0.1, 100.0);
        let p = cam.view_matrix().transform_point3(vec3(1.0, 2.0, 5.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn projection_maps_near_and_far() {
        let cam = Camera::new(Vec3::ZERO, 45.0, 0.1, 100.0);
        let proj = cam.projection_matrix(4.0 / 3.0);
        let near = proj * Vec4::new(0.0, 0.0, 0.1, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, 100.0, 1.0);
        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
        assert_relative_eq!(far.w, 100.0);
        assert_relative_eq!(cam.normalized_depth(100.0), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn update_moves_forward_and_clamps_pitch() {
        let mut cam = Camera::new(Vec3::ZERO, 45.0, 0.1, 100.0);
        let input = CameraInput { movement: vec3(0.0, 0.0, 1.0), turn: Vec2::ZERO, boost: false };
        cam.update(1.0, &input);
        assert_relative_eq!(cam.position.z, 2.0, epsilon = 1e-5);

        let look_up = CameraInput { movement: Vec3::ZERO, turn: vec2(0.0, 1.0), boost: false };
        for _ in 0..10 {
            cam.update(1.0, &look_up);
        }
        assert_relative_eq!(cam.pitch, PITCH_LIMIT);
    }
}
