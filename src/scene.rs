use std::f32::consts::PI;

use glam::{vec3, Mat4, Vec3};
use log::info;

use crate::camera::Camera;
use crate::color::ColorRGB;
use crate::geometry::{make_cube, make_quad, make_ribbon, make_uv_sphere};
use crate::input::{Action, CameraInput};
use crate::materials::{stone_material, tiled_material};
use crate::mesh::{Mesh, PrimitiveTopology};

/// What the frame loop needs from whatever is being drawn.
pub trait Scene {
    /// Builds the geometry and camera for a surface of the given aspect ratio.
    fn initialize(&mut self, aspect_ratio: f32);

    /// Called when the output surface changes shape.
    fn resize(&mut self, _aspect_ratio: f32) {}

    fn update(&mut self, dt: f32, input: &CameraInput);

    /// Handles actions that belong to the scene. Returns false otherwise.
    fn handle_action(&mut self, action: Action) -> bool;

    fn meshes(&self) -> &[Mesh];

    fn camera(&self) -> &Camera;

    /// Direction the light travels in. Zero means unlit.
    fn light_direction(&self) -> Vec3;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SceneKind {
    /// Rotating textured cube and sphere in front of a strip ribbon.
    #[default]
    Showcase,
    /// Unlit white quad covering the whole viewport.
    Quad,
}

impl SceneKind {
    pub fn build(self, aspect_ratio: f32) -> Box<dyn Scene> {
        let mut scene: Box<dyn Scene> = match self {
            SceneKind::Showcase => Box::new(ShowcaseScene::default()),
            SceneKind::Quad => Box::new(QuadScene::default()),
        };
        scene.initialize(aspect_ratio);
        scene
    }
}

const ROTATION_SPEED: f32 = 0.25 * PI;
const CUBE: usize = 0;
const SPHERE: usize = 1;

pub struct ShowcaseScene {
    meshes: Vec<Mesh>,
    camera: Camera,
    light_dir: Vec3,
    rotate: bool,
}

impl Default for ShowcaseScene {
    fn default() -> Self {
        Self {
            meshes: Vec::new(),
            camera: Camera::new(vec3(0.0, 0.0, -5.0), 45.0, 0.1, 100.0),
            light_dir: vec3(0.577, -0.577, 0.577),
            rotate: true,
        }
    }
}

impl ShowcaseScene {
    pub fn is_rotating(&self) -> bool {
        self.rotate
    }
}

impl Scene for ShowcaseScene {
    fn initialize(&mut self, _aspect_ratio: f32) {
        let (v, i) = make_cube(1.2, ColorRGB::WHITE);
        let cube = Mesh::new(v, i, PrimitiveTopology::TriangleList)
            .with_textures(tiled_material(ColorRGB::new(0.85, 0.3, 0.2), ColorRGB::new(0.95, 0.9, 0.8)))
            .with_world(Mat4::from_translation(vec3(-1.0, 0.0, 0.0)) * Mat4::from_rotation_x(0.4));

        let (v, i) = make_uv_sphere(24, 32, 0.8, ColorRGB::WHITE);
        let sphere = Mesh::new(v, i, PrimitiveTopology::TriangleList)
            .with_textures(stone_material(ColorRGB::new(0.6, 0.7, 0.9)))
            .with_world(Mat4::from_translation(vec3(1.0, 0.0, 0.0)));

        let (v, i) = make_ribbon(5.0, 0.8, 32, 0.25, ColorRGB::new(0.3, 0.8, 0.5));
        let ribbon = Mesh::new(v, i, PrimitiveTopology::TriangleStrip)
            .with_world(Mat4::from_translation(vec3(0.0, -1.5, 2.0)));

        self.meshes = vec![cube, sphere, ribbon];
        info!("showcase scene ready: {} meshes", self.meshes.len());
    }

    fn update(&mut self, dt: f32, input: &CameraInput) {
        self.camera.update(dt, input);
        if self.rotate {
            let spin = Mat4::from_rotation_y(ROTATION_SPEED * dt);
            for idx in [CUBE, SPHERE] {
                if let Some(mesh) = self.meshes.get_mut(idx) {
                    mesh.apply_matrix(spin);
                }
            }
        }
    }

    fn handle_action(&mut self, action: Action) -> bool {
        if action != Action::ToggleRotation {
            return false;
        }
        self.rotate = !self.rotate;
        info!("rotation {}", if self.rotate { "ON" } else { "OFF" });
        true
    }

    fn meshes(&self) -> &[Mesh] { &self.meshes }
    fn camera(&self) -> &Camera { &self.camera }
    fn light_direction(&self) -> Vec3 { self.light_dir }
}

/// Depth the quad sits at in front of the camera.
pub const QUAD_DEPTH: f32 = 5.0;

/// A white quad filling 99.9% of the view, unlit, with the camera fixed at the
/// origin.
pub struct QuadScene {
    meshes: Vec<Mesh>,
    camera: Camera,
}

impl Default for QuadScene {
    fn default() -> Self {
        Self { meshes: Vec::new(), camera: Camera::new(Vec3::ZERO, 90.0, 0.1, 100.0) }
    }
}

impl Scene for QuadScene {
    fn initialize(&mut self, aspect_ratio: f32) {
        let half_height = 0.999 * QUAD_DEPTH * self.camera.fov_scale();
        let half_width = half_height * aspect_ratio;
        let (v, i) = make_quad(half_width, half_height, ColorRGB::WHITE);
        self.meshes = vec![Mesh::new(v, i, PrimitiveTopology::TriangleList)
            .with_world(Mat4::from_translation(vec3(0.0, 0.0, QUAD_DEPTH)))];
    }

    fn resize(&mut self, aspect_ratio: f32) {
        self.initialize(aspect_ratio);
    }

    fn update(&mut self, _dt: f32, _input: &CameraInput) {}

    fn handle_action(&mut self, _action: Action) -> bool { false }

    fn meshes(&self) -> &[Mesh] { &self.meshes }
    fn camera(&self) -> &Camera { &self.camera }
    fn light_direction(&self) -> Vec3 { Vec3::ZERO }
}
