use std::path::Path;

use log::{info, warn};

use crate::color::ColorRGB;
use crate::error::RenderError;
use crate::hardware::HardwareRenderer;
use crate::input::Action;
use crate::present::PresentSurface;
use crate::scene::Scene;
use crate::shading::LightingMode;
use crate::software::{FrameState, SoftwareRenderer};
use crate::types::Viewport;

pub const SOFTWARE_BACKGROUND: ColorRGB = ColorRGB::grey(99.0 / 255.0);
pub const HARDWARE_BACKGROUND: ColorRGB = ColorRGB::new(0.39, 0.59, 0.93);
pub const UNIFORM_BACKGROUND: ColorRGB = ColorRGB::grey(0.1);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderPath {
    #[default]
    Software,
    Hardware,
}

impl RenderPath {
    pub fn toggled(self) -> Self {
        match self {
            RenderPath::Software => RenderPath::Hardware,
            RenderPath::Hardware => RenderPath::Software,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RenderPath::Software => "software",
            RenderPath::Hardware => "hardware",
        }
    }
}

/// Everything the user can flip at runtime, passed into each render call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    pub path: RenderPath,
    pub lighting_mode: LightingMode,
    pub use_normal_map: bool,
    pub show_depth_buffer: bool,
    pub show_bounding_boxes: bool,
    pub uniform_clear_color: bool,
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            path: RenderPath::Software,
            lighting_mode: LightingMode::Combined,
            use_normal_map: true,
            show_depth_buffer: false,
            show_bounding_boxes: false,
            uniform_clear_color: false,
            parallel: true,
        }
    }
}

fn on_off(v: bool) -> &'static str {
    if v { "ON" } else { "OFF" }
}

impl RenderConfig {
    pub fn software_background(&self) -> ColorRGB {
        if self.uniform_clear_color { UNIFORM_BACKGROUND } else { SOFTWARE_BACKGROUND }
    }

    pub fn hardware_background(&self) -> ColorRGB {
        if self.uniform_clear_color { UNIFORM_BACKGROUND } else { HARDWARE_BACKGROUND }
    }

    /// Applies a render toggle. Returns false for actions that are not
    /// render settings.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::ToggleRenderPath => {
                self.path = self.path.toggled();
                info!("render path: {}", self.path.name());
            }
            Action::CycleLightingMode => {
                self.lighting_mode = self.lighting_mode.next();
                info!("shading mode: {:?}", self.lighting_mode);
            }
            Action::ToggleNormalMap => {
                self.use_normal_map = !self.use_normal_map;
                info!("normal map {}", on_off(self.use_normal_map));
            }
            Action::ToggleDepthBuffer => {
                self.show_depth_buffer = !self.show_depth_buffer;
                info!("depth buffer visualization {}", on_off(self.show_depth_buffer));
            }
            Action::ToggleBoundingBoxes => {
                self.show_bounding_boxes = !self.show_bounding_boxes;
                info!("bounding box visualization {}", on_off(self.show_bounding_boxes));
            }
            Action::ToggleUniformClear => {
                self.uniform_clear_color = !self.uniform_clear_color;
                info!("uniform clear color {}", on_off(self.uniform_clear_color));
            }
            _ => return false,
        }
        true
    }
}

/// Both render paths behind one entry point.
///
/// Each path keeps its own failure state: when one is disabled the other
/// keeps working.
pub struct Renderer {
    software: SoftwareRenderer,
    hardware: HardwareRenderer,
}

impl Renderer {
    pub fn new(viewport: Viewport, hardware: HardwareRenderer) -> Self {
        Self { software: SoftwareRenderer::new(viewport), hardware }
    }

    pub fn software(&self) -> &SoftwareRenderer { &self.software }
    pub fn hardware(&self) -> &HardwareRenderer { &self.hardware }
    pub fn viewport(&self) -> Viewport { self.software.viewport() }

    pub fn is_path_available(&self, path: RenderPath) -> bool {
        match path {
            RenderPath::Software => !self.software.is_disabled(),
            RenderPath::Hardware => self.hardware.is_available(),
        }
    }

    /// Like [`RenderConfig::apply`], but refuses to switch to a path that is
    /// not available.
    pub fn apply(&self, config: &mut RenderConfig, action: Action) -> bool {
        if action == Action::ToggleRenderPath {
            let target = config.path.toggled();
            if !self.is_path_available(target) {
                warn!("{} render path is unavailable, staying on {}", target.name(), config.path.name());
                return true;
            }
        }
        config.apply(action)
    }

    /// Draws one frame on the configured path. Failures are logged and
    /// disable that path; the call then returns false.
    pub fn render(&mut self, scene: &dyn Scene, config: &RenderConfig) -> bool {
        match config.path {
            RenderPath::Software => {
                self.software.render(scene.meshes(), scene.camera(), scene.light_direction(), config)
            }
            RenderPath::Hardware => {
                self.hardware.render(scene.meshes(), scene.camera(), config.hardware_background())
            }
        }
    }

    pub fn try_render(&mut self, scene: &dyn Scene, config: &RenderConfig) -> Result<(), RenderError> {
        match config.path {
            RenderPath::Software => {
                self.software.try_render(scene.meshes(), scene.camera(), scene.light_direction(), config)
            }
            RenderPath::Hardware => {
                self.hardware.try_render(scene.meshes(), scene.camera(), config.hardware_background())
            }
        }
    }

    /// Shows the last software frame. The hardware path presents from inside
    /// its device, so this is a no-op for it.
    pub fn present(&mut self, config: &RenderConfig, surface: &mut dyn PresentSurface) -> Result<(), RenderError> {
        match config.path {
            RenderPath::Software => self.software.present(surface),
            RenderPath::Hardware => Ok(()),
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport() {
            return;
        }
        info!("resizing to {}x{}", viewport.width, viewport.height);
        self.software.resize(viewport);
        self.hardware.resize(viewport);
    }

    pub fn save_screenshot(&self, path: &Path) -> Result<(), RenderError> {
        match self.software.state() {
            FrameState::Shaded | FrameState::Presented => self.software.save_screenshot(path),
            state => Err(RenderError::Present(format!("no software frame to save (state {state:?})"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::tests::MockDevice;
    use crate::hardware::GraphicsDevice;
    use crate::present::CaptureSurface;
    use crate::scene::QuadScene;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const VP: Viewport = Viewport::new(40, 30);

    fn scene() -> QuadScene {
        let mut s = QuadScene::default();
        s.initialize(VP.aspect_ratio());
        s
    }

    fn mock_hardware(fail_after: Option<usize>) -> (HardwareRenderer, Arc<AtomicUsize>) {
        let frames = Arc::new(AtomicUsize::new(0));
        let f = frames.clone();
        let hw = HardwareRenderer::new(move || {
            Ok(Box::new(MockDevice { frames: f, drops: Arc::new(AtomicUsize::new(0)), fail_after }) as Box<dyn GraphicsDevice>)
        });
        (hw, frames)
    }

    #[test]
    fn toggles_flip_and_wrap() {
        let mut c = RenderConfig::default();
        assert!(c.apply(Action::ToggleNormalMap));
        assert!(!c.use_normal_map);
        assert!(c.apply(Action::ToggleBoundingBoxes));
        assert!(c.show_bounding_boxes);
        for _ in 0..4 {
            c.apply(Action::CycleLightingMode);
        }
        assert_eq!(c.lighting_mode, LightingMode::Combined);
        assert!(!c.apply(Action::Screenshot));
        assert!(!c.apply(Action::ToggleRotation));
    }

    #[test]
    fn uniform_clear_overrides_both_backgrounds() {
        let mut c = RenderConfig::default();
        assert_eq!(c.software_background(), SOFTWARE_BACKGROUND);
        assert_eq!(c.hardware_background(), HARDWARE_BACKGROUND);
        c.apply(Action::ToggleUniformClear);
        assert_eq!(c.software_background(), UNIFORM_BACKGROUND);
        assert_eq!(c.hardware_background(), UNIFORM_BACKGROUND);
    }

    #[test]
    fn cannot_switch_to_missing_hardware() {
        let r = Renderer::new(VP, HardwareRenderer::unavailable("none"));
        let mut c = RenderConfig::default();
        assert!(r.apply(&mut c, Action::ToggleRenderPath));
        assert_eq!(c.path, RenderPath::Software);
    }

    #[test]
    fn dispatches_on_the_selected_path() {
        let (hw, frames) = mock_hardware(None);
        let mut r = Renderer::new(VP, hw);
        let scene = scene();
        let mut c = RenderConfig::default();

        assert!(r.render(&scene, &c));
        assert_eq!(frames.load(Ordering::SeqCst), 0);
        assert_eq!(r.software().state(), FrameState::Shaded);

        r.apply(&mut c, Action::ToggleRenderPath);
        assert_eq!(c.path, RenderPath::Hardware);
        assert!(r.render(&scene, &c));
        assert_eq!(frames.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn hardware_failure_leaves_software_running() {
        let (hw, _) = mock_hardware(Some(0));
        let mut r = Renderer::new(VP, hw);
        let scene = scene();
        let hardware = RenderConfig { path: RenderPath::Hardware, ..RenderConfig::default() };
        assert!(!r.render(&scene, &hardware));
        assert!(!r.is_path_available(RenderPath::Hardware));

        let software = RenderConfig::default();
        assert!(r.render(&scene, &software));
        let mut surface = CaptureSurface::default();
        r.present(&software, &mut surface).unwrap();
        assert_eq!(surface.frames, 1);
    }

    #[test]
    fn resize_reaches_the_frame_buffer() {
        let mut r = Renderer::new(VP, HardwareRenderer::unavailable("none"));
        r.resize(Viewport::new(20, 10));
        assert_eq!(r.software().frame().color().len(), 200);
    }

    #[test]
    fn screenshot_needs_a_finished_frame() {
        let r = Renderer::new(VP, HardwareRenderer::unavailable("none"));
        let path = std::env::temp_dir().join("duorast-unrendered.png");
        assert!(matches!(r.save_screenshot(&path), Err(RenderError::Present(_))));
    }
}
