use std::path::Path;

use crate::color::ColorRGB;
use crate::error::RenderError;
use crate::rasterizer::{Band, Fragment};
use crate::types::{Rect, Viewport};

/// Color, depth and pixel attribute buffers of the software path.
///
/// All three are `width * height` long and row-major. They are reallocated
/// only on resize.
pub struct FrameBuffer {
    viewport: Viewport,
    color: Vec<u32>,
    depth: Vec<f32>,
    fragments: Vec<Option<Fragment>>,
}

/// Split borrow used by the shading pass: writable colors, readable depth and
/// attributes.
pub struct ShadeTarget<'a> {
    pub color: &'a mut [u32],
    pub depth: &'a [f32],
    pub fragments: &'a [Option<Fragment>],
    pub width: usize,
}

impl FrameBuffer {
    pub fn new(viewport: Viewport) -> Self {
        let n = viewport.pixel_count();
        Self {
            viewport,
            color: vec![0; n],
            depth: vec![f32::INFINITY; n],
            fragments: vec![None; n],
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            *self = Self::new(viewport);
        }
    }

    pub fn viewport(&self) -> Viewport { self.viewport }
    pub fn color(&self) -> &[u32] { &self.color }
    pub fn depth(&self) -> &[f32] { &self.depth }
    pub fn fragments(&self) -> &[Option<Fragment>] { &self.fragments }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.viewport.width
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.color[self.index(x, y)]
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[self.index(x, y)]
    }

    pub fn fragment_at(&self, x: usize, y: usize) -> Option<&Fragment> {
        self.fragments[self.index(x, y)].as_ref()
    }

    /// Fills color with `background`, depth with +inf and drops every fragment.
    pub fn clear(&mut self, background: ColorRGB) {
        self.color.fill(background.to_argb());
        self.depth.fill(f32::INFINITY);
        self.fragments.fill(None);
    }

    /// Splits depth and attributes into disjoint bands of `rows` rows.
    pub fn bands(&mut self, rows: usize) -> Vec<Band<'_>> {
        let w = self.viewport.width;
        if w == 0 {
            return Vec::new();
        }
        let rows = rows.max(1);
        let mut bands = Vec::with_capacity(self.viewport.height.div_ceil(rows));
        let mut y0 = 0usize;
        for (d_chunk, f_chunk) in self
            .depth
            .chunks_mut(rows * w)
            .zip(self.fragments.chunks_mut(rows * w))
        {
            let n = d_chunk.len() / w;
            if n == 0 { continue; }
            bands.push(Band { depth: d_chunk, fragments: f_chunk, w, y0: y0 as i32, y1: (y0 + n) as i32 });
            y0 += n;
        }
        bands
    }

    pub fn shade_target(&mut self) -> ShadeTarget<'_> {
        ShadeTarget {
            color: &mut self.color,
            depth: &self.depth,
            fragments: &self.fragments,
            width: self.viewport.width,
        }
    }

    /// Outlines the pixels covered by `rect`, clamped to the buffer.
    pub fn draw_rect(&mut self, rect: Rect, color: ColorRGB) {
        let (w, h) = (self.viewport.width as i64, self.viewport.height as i64);
        if w == 0 || h == 0 {
            return;
        }
        let x0 = (rect.left.floor() as i64).clamp(0, w - 1);
        let x1 = (rect.right.ceil() as i64 - 1).clamp(x0, w - 1);
        let y0 = (rect.top.floor() as i64).clamp(0, h - 1);
        let y1 = (rect.bottom.ceil() as i64 - 1).clamp(y0, h - 1);

        let px = color.to_argb();
        let w = w as usize;
        let (x0, x1, y0, y1) = (x0 as usize, x1 as usize, y0 as usize, y1 as usize);
        for x in x0..=x1 {
            self.color[x + y0 * w] = px;
            self.color[x + y1 * w] = px;
        }
        for y in y0..=y1 {
            self.color[x0 + y * w] = px;
            self.color[x1 + y * w] = px;
        }
    }

    /// Writes the color buffer as an RGB PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        let img = image::RgbImage::from_fn(self.viewport.width as u32, self.viewport.height as u32, |x, y| {
            let px = self.pixel(x as usize, y as usize);
            image::Rgb([(px >> 16) as u8, (px >> 8) as u8, px as u8])
        });
        img.save(path)?;
        Ok(())
    }
}
