use crate::error::RenderError;
use crate::types::Viewport;

/// Anything that can show a finished `0xFFRRGGBB` pixel buffer.
pub trait PresentSurface {
    fn present(&mut self, pixels: &[u32], viewport: Viewport) -> Result<(), RenderError>;
}

impl PresentSurface for minifb::Window {
    fn present(&mut self, pixels: &[u32], viewport: Viewport) -> Result<(), RenderError> {
        self.update_with_buffer(pixels, viewport.width, viewport.height)
            .map_err(|e| RenderError::Present(e.to_string()))
    }
}

/// Keeps a copy of the last presented frame. Used headless and in tests.
#[derive(Default)]
pub struct CaptureSurface {
    pub pixels: Vec<u32>,
    pub viewport: Option<Viewport>,
    pub frames: u64,
}

impl PresentSurface for CaptureSurface {
    fn present(&mut self, pixels: &[u32], viewport: Viewport) -> Result<(), RenderError> {
        self.pixels.clear();
        self.pixels.extend_from_slice(pixels);
        self.viewport = Some(viewport);
        self.frames += 1;
        Ok(())
    }
}
