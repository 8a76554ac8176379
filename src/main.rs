mod args;

use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use glam::{vec2, vec3};
use log::{error, info, warn};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use duorast::input::HELP;
use duorast::logging::init_logging;
use duorast::{
    Action, CameraInput, HardwareRenderer, PresentSurface, RenderConfig, RenderError, RenderPath, Renderer, Scene,
    Viewport,
};

use args::Args;

const WINDOW_TITLE: &str = "duorast";

const KEY_ACTIONS: [(Key, Action); 10] = [
    (Key::F1, Action::ToggleRenderPath),
    (Key::F2, Action::ToggleRotation),
    (Key::F5, Action::CycleLightingMode),
    (Key::F6, Action::ToggleNormalMap),
    (Key::F7, Action::ToggleDepthBuffer),
    (Key::F8, Action::ToggleBoundingBoxes),
    (Key::F9, Action::Screenshot),
    (Key::F10, Action::ToggleUniformClear),
    (Key::F11, Action::ToggleFps),
    (Key::F12, Action::ShowHelp),
];

fn camera_input(window: &Window) -> CameraInput {
    let axis = |pos: Key, neg: Key| window.is_key_down(pos) as i32 as f32 - window.is_key_down(neg) as i32 as f32;
    CameraInput {
        movement: vec3(axis(Key::D, Key::A), axis(Key::E, Key::Q), axis(Key::W, Key::S)),
        turn: vec2(axis(Key::Right, Key::Left), axis(Key::Up, Key::Down)),
        boost: window.is_key_down(Key::LeftShift) || window.is_key_down(Key::RightShift),
    }
}

fn screenshot_path() -> PathBuf {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
    PathBuf::from(format!("screenshot-{secs}.png"))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameOutcome {
    /// The software frame was copied to the surface.
    Presented,
    /// The hardware device drew and presented on its own.
    DeviceOwned,
    /// Nothing was drawn; the surface only needs its events pumped.
    Skipped,
}

struct FrameLoop {
    config: RenderConfig,
    renderer: Renderer,
    scene: Box<dyn Scene>,
    show_fps: bool,
    fps_ema: f32,
    /// Set once the selected path has been reported as down.
    halted: bool,
}

impl FrameLoop {
    fn new(config: RenderConfig, renderer: Renderer, scene: Box<dyn Scene>) -> Self {
        Self { config, renderer, scene, show_fps: false, fps_ema: 0.0, halted: false }
    }

    fn handle(&mut self, action: Action) {
        if self.scene.handle_action(action) || self.renderer.apply(&mut self.config, action) {
            return;
        }
        match action {
            Action::ToggleFps => self.show_fps = !self.show_fps,
            Action::ShowHelp => info!("key bindings:\n{HELP}"),
            Action::Screenshot if self.config.path == RenderPath::Software => {
                if let Err(e) = self.renderer.save_screenshot(&screenshot_path()) {
                    error!("screenshot failed: {e}");
                }
            }
            Action::Screenshot => warn!("screenshots are only taken on the software path"),
            _ => {}
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        if viewport.pixel_count() == 0 || viewport == self.renderer.viewport() {
            return;
        }
        self.renderer.resize(viewport);
        self.scene.resize(viewport.aspect_ratio());
    }

    /// Advances the scene and draws it on the selected path. A path that has
    /// shut itself down is reported once and then skipped, so the window
    /// stays responsive until the user closes it.
    fn step(&mut self, dt: f32, input: &CameraInput, surface: &mut dyn PresentSurface) -> Result<FrameOutcome, RenderError> {
        self.scene.update(dt, input);

        if !self.renderer.is_path_available(self.config.path) {
            if !self.halted {
                error!("{} render path is down; nothing will be drawn until another path is selected", self.config.path.name());
                self.halted = true;
            }
            return Ok(FrameOutcome::Skipped);
        }
        self.halted = false;

        if !self.renderer.render(self.scene.as_ref(), &self.config) {
            return Ok(FrameOutcome::Skipped);
        }
        match self.config.path {
            RenderPath::Software => {
                self.renderer.present(&self.config, surface)?;
                Ok(FrameOutcome::Presented)
            }
            RenderPath::Hardware => Ok(FrameOutcome::DeviceOwned),
        }
    }

    fn title(&self) -> String {
        let path = self.config.path.name();
        if self.show_fps {
            format!("{WINDOW_TITLE} | {path} | {:5.1} FPS", self.fps_ema)
        } else {
            format!("{WINDOW_TITLE} | {path}")
        }
    }

    fn record_frame_time(&mut self, dt: f32) {
        let inst_fps = 1.0 / dt.max(1e-6);
        self.fps_ema = if self.fps_ema == 0.0 { inst_fps } else { self.fps_ema * 0.9 + inst_fps * 0.1 };
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_filter.as_deref());

    let viewport = args.viewport();
    let mut window = Window::new(
        WINDOW_TITLE,
        viewport.width,
        viewport.height,
        WindowOptions { resize: true, ..WindowOptions::default() },
    )
    .context("unable to create window")?;
    window.set_target_fps(60);

    let config = RenderConfig {
        lighting_mode: args.lighting,
        use_normal_map: !args.no_normal_map,
        parallel: !args.serial,
        ..RenderConfig::default()
    };
    let renderer = Renderer::new(viewport, HardwareRenderer::unavailable("no GPU backend compiled in"));
    let mut app = FrameLoop::new(config, renderer, args.scene.build(viewport.aspect_ratio()));
    info!("{}x{} {:?} scene, parallel {}", viewport.width, viewport.height, args.scene, config.parallel);
    info!("press F12 for key bindings");

    let mut last_frame = Instant::now();
    let mut frames: u64 = 0;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32().min(0.05);
        last_frame = now;

        let (w, h) = window.get_size();
        app.resize(Viewport::new(w, h));

        for (key, action) in KEY_ACTIONS {
            if window.is_key_pressed(key, KeyRepeat::No) {
                app.handle(action);
            }
        }

        let input = camera_input(&window);
        match app.step(dt, &input, &mut window)? {
            FrameOutcome::Presented => {}
            FrameOutcome::DeviceOwned | FrameOutcome::Skipped => window.update(),
        }

        app.record_frame_time(dt);
        window.set_title(&app.title());

        frames += 1;
        if args.max_frames.is_some_and(|max| frames >= max) {
            info!("rendered {frames} frames, exiting");
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use duorast::camera::Camera;
    use duorast::geometry::make_quad;
    use duorast::{CaptureSurface, Mesh, PrimitiveTopology, SceneKind};
    use glam::{Mat4, Vec3};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Scene whose only mesh cannot be assembled.
    struct BrokenScene {
        meshes: Vec<Mesh>,
        camera: Camera,
        updates: Rc<Cell<usize>>,
    }

    impl BrokenScene {
        fn new(updates: Rc<Cell<usize>>) -> Self {
            let (v, i) = make_quad(1.0, 1.0, duorast::ColorRGB::WHITE);
            let mesh = Mesh::new(v, i, PrimitiveTopology::LineList).with_world(Mat4::from_translation(vec3(0.0, 0.0, 4.0)));
            Self { meshes: vec![mesh], camera: Camera::new(Vec3::ZERO, 90.0, 0.1, 100.0), updates }
        }
    }

    impl Scene for BrokenScene {
        fn initialize(&mut self, _aspect_ratio: f32) {}
        fn update(&mut self, _dt: f32, _input: &CameraInput) { self.updates.set(self.updates.get() + 1); }
        fn handle_action(&mut self, _action: Action) -> bool { false }
        fn meshes(&self) -> &[Mesh] { &self.meshes }
        fn camera(&self) -> &Camera { &self.camera }
        fn light_direction(&self) -> Vec3 { Vec3::ZERO }
    }

    fn renderer(viewport: Viewport) -> Renderer {
        Renderer::new(viewport, HardwareRenderer::unavailable("none"))
    }

    #[test]
    fn healthy_scene_is_presented() {
        let vp = Viewport::new(32, 24);
        let mut app = FrameLoop::new(RenderConfig::default(), renderer(vp), SceneKind::Quad.build(vp.aspect_ratio()));
        let mut surface = CaptureSurface::default();
        assert_eq!(app.step(0.016, &CameraInput::default(), &mut surface).unwrap(), FrameOutcome::Presented);
        assert_eq!(surface.frames, 1);
    }

    #[test]
    fn failed_path_keeps_the_loop_alive() {
        let updates = Rc::new(Cell::new(0));
        let scene = Box::new(BrokenScene::new(updates.clone()));
        let mut app = FrameLoop::new(RenderConfig::default(), renderer(Viewport::new(32, 24)), scene);
        let mut surface = CaptureSurface::default();
        for _ in 0..5 {
            assert_eq!(app.step(0.016, &CameraInput::default(), &mut surface).unwrap(), FrameOutcome::Skipped);
        }
        assert!(app.halted);
        assert_eq!(updates.get(), 5);
        assert_eq!(surface.frames, 0);
        assert!(!app.renderer.is_path_available(RenderPath::Software));

        // input is still handled after the failure
        app.handle(Action::ToggleFps);
        assert!(app.show_fps);
    }

    #[test]
    fn resize_reaches_renderer_and_scene() {
        let vp = Viewport::new(32, 24);
        let mut app = FrameLoop::new(RenderConfig::default(), renderer(vp), SceneKind::Quad.build(vp.aspect_ratio()));
        app.resize(Viewport::new(0, 24));
        assert_eq!(app.renderer.viewport(), vp);

        let wide = Viewport::new(64, 24);
        app.resize(wide);
        assert_eq!(app.renderer.viewport(), wide);
        let mut surface = CaptureSurface::default();
        app.step(0.016, &CameraInput::default(), &mut surface).unwrap();
        let bg = RenderConfig::default().software_background().to_argb();
        assert!(!surface.pixels.contains(&bg));
    }

    #[test]
    fn bounding_box_key_is_bound() {
        assert!(KEY_ACTIONS.iter().any(|&(k, a)| k == Key::F8 && a == Action::ToggleBoundingBoxes));
    }
}
