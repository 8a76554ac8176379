//! Dual-path 3D renderer whose main path is a CPU triangle rasterizer.
//!
//! Per frame the software path projects every mesh's vertices, assembles
//! triangles from list or strip indices, culls whole triangles, rasterizes
//! them into depth and attribute buffers in parallel row bands, and finally
//! shades every covered pixel in one pass.

pub mod assembler;
pub mod camera;
pub mod color;
pub mod culling;
pub mod engine;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod hardware;
pub mod input;
pub mod logging;
pub mod materials;
pub mod mesh;
pub mod present;
pub mod projector;
pub mod rasterizer;
pub mod scene;
pub mod shading;
pub mod software;
pub mod texture;
pub mod types;

pub use camera::Camera;
pub use color::ColorRGB;
pub use engine::{RenderConfig, RenderPath, Renderer};
pub use error::RenderError;
pub use hardware::{GraphicsDevice, HardwareRenderer};
pub use input::{Action, CameraInput};
pub use mesh::{Mesh, MeshTextures, PrimitiveTopology};
pub use present::{CaptureSurface, PresentSurface};
pub use scene::{Scene, SceneKind};
pub use shading::LightingMode;
pub use software::{FrameState, SoftwareRenderer};
pub use types::{Vertex, Viewport};
