use std::sync::Arc;

use glam::Mat4;

use crate::texture::Texture;
use crate::types::Vertex;

/// How an index buffer is grouped into primitives.
///
/// Mirrors the primitive set a graphics device accepts; the software
/// rasterizer only assembles the two triangle variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
}

/// Texture set sampled by the pixel shader. Missing maps fall back to the
/// vertex color, the geometric normal, black specular and zero gloss.
#[derive(Clone, Debug, Default)]
pub struct MeshTextures {
    pub diffuse: Option<Arc<Texture>>,
    pub normal: Option<Arc<Texture>>,
    pub specular: Option<Arc<Texture>>,
    pub gloss: Option<Arc<Texture>>,
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub topology: PrimitiveTopology,
    pub world: Mat4,
    pub textures: MeshTextures,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, topology: PrimitiveTopology) -> Self {
        Self {
            vertices,
            indices,
            topology,
            world: Mat4::IDENTITY,
            textures: MeshTextures::default(),
        }
    }

    pub fn with_textures(mut self, textures: MeshTextures) -> Self {
        self.textures = textures;
        self
    }

    pub fn with_world(mut self, world: Mat4) -> Self {
        self.world = world;
        self
    }

    /// Applies `m` in model space, before the current world transform.
    pub fn apply_matrix(&mut self, m: Mat4) {
        self.world *= m;
    }
}
