//! Seam to a GPU-backed render path.
//!
//! The device itself lives outside this crate. Implementations own their
//! device, swapchain and views and release them in `Drop`, so construction
//! failure, teardown and mid-frame errors all free the same way.

use log::{error, info, warn};

use crate::camera::Camera;
use crate::color::ColorRGB;
use crate::error::RenderError;
use crate::mesh::Mesh;
use crate::types::Viewport;

pub trait GraphicsDevice {
    fn name(&self) -> &str;

    fn resize(&mut self, viewport: Viewport) -> Result<(), RenderError>;

    /// Clears, draws every mesh and presents.
    fn draw_frame(&mut self, meshes: &[Mesh], camera: &Camera, clear: ColorRGB) -> Result<(), RenderError>;
}

/// Hardware path with its own failure domain.
///
/// Once initialisation or a frame fails the device is dropped and the path
/// stays disabled for the rest of the process.
pub struct HardwareRenderer {
    device: Option<Box<dyn GraphicsDevice>>,
}

impl HardwareRenderer {
    pub fn new<F>(init: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn GraphicsDevice>, RenderError>,
    {
        match init() {
            Ok(device) => {
                info!("hardware path ready on {}", device.name());
                Self { device: Some(device) }
            }
            Err(e) => {
                error!("hardware path disabled: {e}");
                Self { device: None }
            }
        }
    }

    /// A path with no device behind it.
    pub fn unavailable(reason: &str) -> Self {
        Self::new(|| Err(RenderError::DeviceInitFailure(reason.to_string())))
    }

    pub fn is_available(&self) -> bool {
        self.device.is_some()
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device.as_deref().map(|d| d.name())
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if let Some(device) = self.device.as_mut() {
            if let Err(e) = device.resize(viewport) {
                self.fail(e);
            }
        }
    }

    pub fn try_render(&mut self, meshes: &[Mesh], camera: &Camera, clear: ColorRGB) -> Result<(), RenderError> {
        let Some(device) = self.device.as_mut() else {
            return Err(RenderError::PathDisabled("hardware"));
        };
        if meshes.is_empty() {
            return Err(RenderError::EmptyScene);
        }
        device.draw_frame(meshes, camera, clear)
    }

    /// Renders one frame; on failure logs it and disables the path.
    pub fn render(&mut self, meshes: &[Mesh], camera: &Camera, clear: ColorRGB) -> bool {
        if self.device.is_none() {
            return false;
        }
        match self.try_render(meshes, camera, clear) {
            Ok(()) => true,
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    fn fail(&mut self, e: RenderError) {
        error!("hardware renderer has encountered an error: {e}");
        if let Some(device) = self.device.take() {
            warn!("shutting down hardware device {}", device.name());
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Device double counting frames and drops.
    pub struct MockDevice {
        pub frames: Arc<AtomicUsize>,
        pub drops: Arc<AtomicUsize>,
        pub fail_after: Option<usize>,
    }

    impl GraphicsDevice for MockDevice {
        fn name(&self) -> &str { "mock" }

        fn resize(&mut self, _viewport: Viewport) -> Result<(), RenderError> { Ok(()) }

        fn draw_frame(&mut self, _meshes: &[Mesh], _camera: &Camera, _clear: ColorRGB) -> Result<(), RenderError> {
            let n = self.frames.fetch_add(1, Ordering::SeqCst);
            match self.fail_after {
                Some(limit) if n >= limit => Err(RenderError::DeviceLost("mock removed".into())),
                _ => Ok(()),
            }
        }
    }

    impl Drop for MockDevice {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn quad() -> Vec<Mesh> {
        let (v, i) = crate::geometry::make_quad(1.0, 1.0, ColorRGB::WHITE);
        vec![Mesh::new(v, i, crate::mesh::PrimitiveTopology::TriangleList)]
    }

    fn camera() -> Camera {
        Camera::new(glam::Vec3::ZERO, 45.0, 0.1, 100.0)
    }

    #[test]
    fn init_failure_leaves_path_disabled() {
        let mut hw = HardwareRenderer::unavailable("no adapter");
        assert!(!hw.is_available());
        assert!(!hw.render(&quad(), &camera(), ColorRGB::BLACK));
    }

    #[test]
    fn frame_failure_releases_device_once_and_stays_disabled() {
        let frames = Arc::new(AtomicUsize::new(0));
        let drops = Arc::new(AtomicUsize::new(0));
        let (f, d) = (frames.clone(), drops.clone());
        let mut hw = HardwareRenderer::new(move || {
            Ok(Box::new(MockDevice { frames: f, drops: d, fail_after: Some(2) }) as Box<dyn GraphicsDevice>)
        });
        assert_eq!(hw.device_name(), Some("mock"));

        let meshes = quad();
        assert!(hw.render(&meshes, &camera(), ColorRGB::BLACK));
        assert!(hw.render(&meshes, &camera(), ColorRGB::BLACK));
        assert!(!hw.render(&meshes, &camera(), ColorRGB::BLACK));
        assert!(!hw.is_available());
        assert_eq!(drops.load(Ordering::SeqCst), 1);

        assert!(!hw.render(&meshes, &camera(), ColorRGB::BLACK));
        assert_eq!(frames.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn empty_scene_disables_the_hardware_path() {
        let frames = Arc::new(AtomicUsize::new(0));
        let drops = Arc::new(AtomicUsize::new(0));
        let (f, d) = (frames.clone(), drops.clone());
        let mut hw = HardwareRenderer::new(move || {
            Ok(Box::new(MockDevice { frames: f, drops: d, fail_after: None }) as Box<dyn GraphicsDevice>)
        });
        assert!(matches!(hw.try_render(&[], &camera(), ColorRGB::BLACK), Err(RenderError::EmptyScene)));
        assert!(!hw.render(&[], &camera(), ColorRGB::BLACK));
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }
}
