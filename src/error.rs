use thiserror::Error;

use crate::mesh::PrimitiveTopology;

/// Failures raised while preparing or drawing a frame.
///
/// Assembly errors are fatal to the render call that hit them; the owning
/// render path catches them, logs them and disables itself.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("topology {0:?} cannot be assembled into triangles")]
    MalformedTopology(PrimitiveTopology),

    #[error("triangle strip has {0} indices, more than 6 are required")]
    MalformedStrip(usize),

    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("{width}x{height} texture cannot be built from {bytes} bytes")]
    InvalidTexture { width: usize, height: usize, bytes: usize },

    #[error("{0} render path is disabled")]
    PathDisabled(&'static str),

    #[error("render invoked with no geometry")]
    EmptyScene,

    #[error("graphics device initialisation failed: {0}")]
    DeviceInitFailure(String),

    #[error("graphics device lost: {0}")]
    DeviceLost(String),

    #[error("failed to present frame: {0}")]
    Present(String),

    #[error("failed to write screenshot")]
    Screenshot(#[from] image::ImageError),
}
