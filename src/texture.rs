use glam::Vec2;

use crate::color::ColorRGB;
use crate::error::RenderError;

/// CPU-side texture sampled with nearest-texel lookup. Never smaller than
/// 1x1.
#[derive(Clone, Debug)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<ColorRGB>,
}

impl Texture {
    /// Builds a texture from tightly packed RGBA8 bytes. Alpha is ignored.
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, RenderError> {
        if width == 0 || height == 0 || bytes.len() != width * height * 4 {
            return Err(RenderError::InvalidTexture { width, height, bytes: bytes.len() });
        }
        let texels = bytes
            .chunks_exact(4)
            .map(|px| ColorRGB::from_rgb8(px[0], px[1], px[2]))
            .collect();
        Ok(Self { width, height, texels })
    }

    /// Evaluates `f` at every texel center, passing UV in `[0, 1]`. A zero
    /// dimension is raised to 1.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(Vec2) -> ColorRGB) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let mut texels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let uv = Vec2::new((x as f32 + 0.5) / width as f32, (y as f32 + 0.5) / height as f32);
                texels.push(f(uv));
            }
        }
        Self { width, height, texels }
    }

    pub fn solid(color: ColorRGB) -> Self {
        Self { width: 1, height: 1, texels: vec![color] }
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    /// Nearest lookup at `round(uv * size)`. Coordinates past the last texel
    /// clamp to it.
    #[inline]
    pub fn sample(&self, uv: Vec2) -> ColorRGB {
        let x = ((uv.x * self.width as f32).round().max(0.0) as usize).min(self.width - 1);
        let y = ((uv.y * self.height as f32).round().max(0.0) as usize).min(self.height - 1);
        self.texels[x + y * self.width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn rgba_bytes_decode_in_order() {
        let bytes = [255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 255, 255, 255, 255];
        let tex = Texture::from_rgba8(2, 2, &bytes).unwrap();
        assert_eq!(tex.sample(vec2(0.0, 0.0)), ColorRGB::new(1.0, 0.0, 0.0));
        assert_eq!(tex.sample(vec2(0.5, 0.0)), ColorRGB::new(0.0, 1.0, 0.0));
        assert_eq!(tex.sample(vec2(0.0, 0.5)), ColorRGB::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn sampling_rounds_and_clamps_edges() {
        let tex = Texture::from_fn(4, 1, |uv| ColorRGB::grey(uv.x));
        // 0.3 * 4 = 1.2 rounds to texel 1, center u = 0.375
        assert_eq!(tex.sample(vec2(0.3, 0.0)).r, 0.375);
        assert_eq!(tex.sample(vec2(1.0, 1.0)).r, 0.875);
    }

    #[test]
    fn bad_dimensions_are_rejected() {
        let short = [0u8; 12];
        assert!(matches!(
            Texture::from_rgba8(2, 2, &short),
            Err(RenderError::InvalidTexture { width: 2, height: 2, bytes: 12 })
        ));
        assert!(Texture::from_rgba8(0, 0, &[]).is_err());

        let tiny = Texture::from_fn(0, 0, |_| ColorRGB::WHITE);
        assert_eq!((tiny.width(), tiny.height()), (1, 1));
        assert_eq!(tiny.sample(vec2(0.7, 0.2)), ColorRGB::WHITE);
    }
}
