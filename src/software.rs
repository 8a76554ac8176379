use std::path::Path;

use glam::Vec3;
use log::{debug, error, info, trace};
use rayon::prelude::*;

use crate::assembler::TriangleAssembler;
use crate::camera::Camera;
use crate::color::ColorRGB;
use crate::culling::is_cullable;
use crate::engine::RenderConfig;
use crate::error::RenderError;
use crate::framebuffer::FrameBuffer;
use crate::mesh::Mesh;
use crate::present::PresentSurface;
use crate::projector::{project, Transforms};
use crate::rasterizer::{draw_triangle_band, Band, Fragment, CHUNK_ROWS};
use crate::shading::{shade_pixel, ShadingParams, SurfaceSample};
use crate::types::{TriangleOut, VertexOut, Viewport};

const BOUNDING_BOX_COLOR: ColorRGB = ColorRGB::new(1.0, 0.0, 1.0);

/// Where the software path is inside the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameState {
    Ready,
    Cleared,
    Rasterized,
    Shaded,
    Presented,
    /// A render call failed; the path stays off for the rest of the process.
    Disabled,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles: usize,
    pub culled: usize,
    pub fragments: usize,
    pub shaded: usize,
}

/// CPU rasterization pipeline: project, assemble, cull, rasterize, shade.
pub struct SoftwareRenderer {
    frame: FrameBuffer,
    vertex_out: Vec<VertexOut>,
    triangles: Vec<(usize, TriangleOut)>,
    state: FrameState,
    stats: FrameStats,
}

impl SoftwareRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            frame: FrameBuffer::new(viewport),
            vertex_out: Vec::new(),
            triangles: Vec::new(),
            state: FrameState::Ready,
            stats: FrameStats::default(),
        }
    }

    pub fn state(&self) -> FrameState { self.state }
    pub fn stats(&self) -> FrameStats { self.stats }
    pub fn frame(&self) -> &FrameBuffer { &self.frame }
    pub fn viewport(&self) -> Viewport { self.frame.viewport() }
    pub fn is_disabled(&self) -> bool { self.state == FrameState::Disabled }

    pub fn resize(&mut self, viewport: Viewport) {
        self.frame.resize(viewport);
    }

    /// Renders one frame, turning any error into the disabled state.
    pub fn render(&mut self, meshes: &[Mesh], camera: &Camera, light_dir: Vec3, config: &RenderConfig) -> bool {
        if self.is_disabled() {
            return false;
        }
        match self.try_render(meshes, camera, light_dir, config) {
            Ok(()) => true,
            Err(e) => {
                error!("software renderer has encountered an error: {e}; shutting it down");
                self.state = FrameState::Disabled;
                false
            }
        }
    }

    /// Clears, rasterizes every mesh and shades the result. Leaves the frame
    /// in [`FrameState::Shaded`] on success.
    pub fn try_render(&mut self, meshes: &[Mesh], camera: &Camera, light_dir: Vec3, config: &RenderConfig) -> Result<(), RenderError> {
        if self.is_disabled() {
            return Err(RenderError::PathDisabled("software"));
        }
        if meshes.is_empty() {
            return Err(RenderError::EmptyScene);
        }

        self.clear(config.software_background());
        if self.frame.viewport().pixel_count() == 0 {
            debug!("zero-sized viewport, nothing to rasterize");
            self.state = FrameState::Shaded;
            return Ok(());
        }
        self.rasterize(meshes, camera, config)?;
        self.shade(meshes, camera, light_dir, config);
        trace!("software frame: {:?}", self.stats);
        Ok(())
    }

    pub fn clear(&mut self, background: ColorRGB) {
        self.frame.clear(background);
        self.stats = FrameStats::default();
        self.state = FrameState::Cleared;
    }

    /// Projects, assembles and culls every mesh, then rasterizes the
    /// survivors band by band. Requires a cleared frame.
    pub fn rasterize(&mut self, meshes: &[Mesh], camera: &Camera, config: &RenderConfig) -> Result<(), RenderError> {
        debug_assert_eq!(self.state, FrameState::Cleared);
        let viewport = self.frame.viewport();

        self.triangles.clear();
        for (mesh_idx, mesh) in meshes.iter().enumerate() {
            let transforms = Transforms::new(camera, mesh.world, viewport);
            project(&mesh.vertices, &transforms, &mut self.vertex_out, config.parallel);

            let assembler = TriangleAssembler::new(&mesh.indices, mesh.topology).inspect_err(|e| {
                debug!("mesh {mesh_idx} rejected by the assembler: {e}");
            })?;
            for [i0, i1, i2] in assembler {
                let tri = TriangleOut::new(
                    fetch(&self.vertex_out, i0)?,
                    fetch(&self.vertex_out, i1)?,
                    fetch(&self.vertex_out, i2)?,
                );
                self.stats.triangles += 1;
                if is_cullable(&tri, viewport) {
                    self.stats.culled += 1;
                    continue;
                }
                self.triangles.push((mesh_idx, tri));
            }
        }

        let bands = self.frame.bands(CHUNK_ROWS);
        let bins = bin_triangles(&self.triangles, bands.len(), viewport.height);
        let triangles = &self.triangles;
        let tasks: Vec<(Band, Vec<usize>)> = bands.into_iter().zip(bins).collect();

        self.stats.fragments = if config.parallel {
            tasks.into_par_iter().map(|(band, bin)| draw_band(band, &bin, triangles)).sum()
        } else {
            tasks.into_iter().map(|(band, bin)| draw_band(band, &bin, triangles)).sum()
        };
        self.state = FrameState::Rasterized;
        Ok(())
    }

    /// Full-screen pass over the winning fragments: Lambert + Phong, or the
    /// depth visualisation when it is switched on. Bounding boxes of the
    /// rasterized triangles are outlined on top when requested.
    pub fn shade(&mut self, meshes: &[Mesh], camera: &Camera, light_dir: Vec3, config: &RenderConfig) {
        debug_assert_eq!(self.state, FrameState::Rasterized);
        let params = ShadingParams {
            camera_pos: camera.position,
            light_dir,
            mode: config.lighting_mode,
            use_normal_map: config.use_normal_map,
        };
        let mode = if config.show_depth_buffer {
            PixelMode::Depth(depth_range(self.frame.depth(), self.frame.fragments()))
        } else {
            PixelMode::Shade(params)
        };

        let target = self.frame.shade_target();
        let w = target.width;
        self.stats.shaded = if config.parallel {
            target
                .color
                .par_chunks_mut(w)
                .zip(target.depth.par_chunks(w))
                .zip(target.fragments.par_chunks(w))
                .map(|((c, d), f)| shade_row(c, d, f, meshes, &mode))
                .sum()
        } else {
            target
                .color
                .chunks_mut(w)
                .zip(target.depth.chunks(w))
                .zip(target.fragments.chunks(w))
                .map(|((c, d), f)| shade_row(c, d, f, meshes, &mode))
                .sum()
        };

        if config.show_bounding_boxes {
            for (_, tri) in &self.triangles {
                self.frame.draw_rect(tri.bounds(), BOUNDING_BOX_COLOR);
            }
        }
        self.state = FrameState::Shaded;
    }

    /// Copies the finished frame to `surface`.
    pub fn present(&mut self, surface: &mut dyn PresentSurface) -> Result<(), RenderError> {
        if self.state != FrameState::Shaded && self.state != FrameState::Presented {
            return Err(RenderError::Present(format!("no finished frame (state {:?})", self.state)));
        }
        surface.present(self.frame.color(), self.frame.viewport())?;
        self.state = FrameState::Presented;
        Ok(())
    }

    pub fn save_screenshot(&self, path: &Path) -> Result<(), RenderError> {
        self.frame.save_png(path)?;
        info!("screenshot saved to {}", path.display());
        Ok(())
    }
}

fn fetch(buffer: &[VertexOut], index: u32) -> Result<VertexOut, RenderError> {
    buffer
        .get(index as usize)
        .copied()
        .ok_or(RenderError::IndexOutOfRange { index, vertex_count: buffer.len() })
}

/// Lists, per band, the triangles whose bounds touch its rows, in
/// submission order.
fn bin_triangles(triangles: &[(usize, TriangleOut)], band_count: usize, height: usize) -> Vec<Vec<usize>> {
    let mut bins: Vec<Vec<usize>> = vec![Vec::new(); band_count];
    for (ti, (_, tri)) in triangles.iter().enumerate() {
        let b = tri.bounds();
        let y_start = (b.top.floor().max(0.0) as usize).min(height);
        let y_end = (b.bottom.ceil().max(0.0) as usize).min(height);
        if y_start >= y_end {
            continue;
        }
        let first = y_start / CHUNK_ROWS;
        let last = (y_end - 1) / CHUNK_ROWS;
        for bin in bins.iter_mut().take(last + 1).skip(first) {
            bin.push(ti);
        }
    }
    bins
}

fn draw_band(mut band: Band<'_>, bin: &[usize], triangles: &[(usize, TriangleOut)]) -> usize {
    bin.iter()
        .map(|&ti| {
            let (mesh, tri) = &triangles[ti];
            draw_triangle_band(&mut band, tri, *mesh)
        })
        .sum()
}

enum PixelMode {
    Shade(ShadingParams),
    /// Nearest and farthest depth written this frame.
    Depth(Option<(f32, f32)>),
}

fn depth_range(depth: &[f32], fragments: &[Option<Fragment>]) -> Option<(f32, f32)> {
    depth
        .iter()
        .zip(fragments)
        .filter(|(_, f)| f.is_some())
        .fold(None, |acc, (&d, _)| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        })
}

fn shade_row(color: &mut [u32], depth: &[f32], fragments: &[Option<Fragment>], meshes: &[Mesh], mode: &PixelMode) -> usize {
    let mut shaded = 0;
    for ((px, &d), frag) in color.iter_mut().zip(depth).zip(fragments) {
        let Some(frag) = frag else { continue };
        let c = match mode {
            PixelMode::Shade(params) => {
                let surface = SurfaceSample::from_textures(&meshes[frag.mesh].textures, &frag.vertex);
                shade_pixel(&frag.vertex, &surface, params)
            }
            PixelMode::Depth(range) => {
                let t = match *range {
                    Some((lo, hi)) if hi > lo => (d - lo) / (hi - lo),
                    _ => 0.0,
                };
                ColorRGB::grey(1.0 - t)
            }
        };
        *px = c.to_argb();
        shaded += 1;
    }
    shaded
}
