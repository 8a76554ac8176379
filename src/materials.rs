//! Procedural texture sets, so scenes need no image assets.

use std::sync::Arc;

use glam::{vec2, vec3, Vec2};

use crate::color::ColorRGB;
use crate::mesh::MeshTextures;
use crate::texture::Texture;

#[inline]
fn hash2(p: Vec2) -> f32 {
    let h = (p.x * 127.1 + p.y * 311.7).sin() * 43_758.547;
    h.fract().abs()
}

#[inline]
fn value_noise(p: Vec2) -> f32 {
    let i = vec2(p.x.floor(), p.y.floor());
    let f = p - i;
    let u = vec2(f.x * f.x * (3.0 - 2.0 * f.x), f.y * f.y * (3.0 - 2.0 * f.y));
    let n00 = hash2(i);
    let n10 = hash2(i + vec2(1.0, 0.0));
    let n01 = hash2(i + vec2(0.0, 1.0));
    let n11 = hash2(i + vec2(1.0, 1.0));
    let nx0 = n00 + (n10 - n00) * u.x;
    let nx1 = n01 + (n11 - n01) * u.x;
    nx0 + (nx1 - nx0) * u.y
}

#[inline]
fn fbm(mut p: Vec2, octaves: i32) -> f32 {
    let mut a = 0.0;
    let mut amp = 0.5;
    for _ in 0..octaves {
        a += value_noise(p) * amp;
        p = p * 2.0 + vec2(3.1, 1.7);
        amp *= 0.5;
    }
    a
}

fn checker(uv: Vec2, tiles: f32, a: ColorRGB, b: ColorRGB) -> ColorRGB {
    let u = (uv.x * tiles).floor() as i32;
    let v = (uv.y * tiles).floor() as i32;
    if (u ^ v) & 1 == 0 { a } else { b }
}

/// Checkerboard diffuse map.
pub fn checker_diffuse(size: usize, tiles: f32, a: ColorRGB, b: ColorRGB) -> Texture {
    Texture::from_fn(size, size, |uv| checker(uv, tiles, a, b))
}

/// Tangent-space normal map of fbm bumps, encoded into `[0, 1]`.
pub fn bumpy_normal_map(size: usize, scale: f32, strength: f32) -> Texture {
    let height = |uv: Vec2| fbm(uv * scale, 4);
    let texel = 1.0 / size as f32;
    Texture::from_fn(size, size, |uv| {
        let dx = height(uv + vec2(texel, 0.0)) - height(uv - vec2(texel, 0.0));
        let dy = height(uv + vec2(0.0, texel)) - height(uv - vec2(0.0, texel));
        let n = vec3(-dx * strength, -dy * strength, 1.0).normalize();
        let e = n * 0.5 + 0.5;
        ColorRGB::new(e.x, e.y, e.z)
    })
}

/// Normal map that leaves the geometric normal untouched.
pub fn flat_normal_map() -> Texture {
    Texture::solid(ColorRGB::new(0.5, 0.5, 1.0))
}

/// Greyscale map: `low` on the dark checker tiles, `high` on the light ones.
pub fn checker_mask(size: usize, tiles: f32, low: f32, high: f32) -> Texture {
    Texture::from_fn(size, size, |uv| checker(uv, tiles, ColorRGB::grey(high), ColorRGB::grey(low)))
}

/// Greyscale fbm noise in `[low, high]`.
pub fn noise_mask(size: usize, scale: f32, low: f32, high: f32) -> Texture {
    Texture::from_fn(size, size, |uv| ColorRGB::grey(low + (high - low) * fbm(uv * scale, 3)))
}

/// Full four-map set: checker diffuse, fbm bumps, glossy light tiles.
pub fn tiled_material(a: ColorRGB, b: ColorRGB) -> MeshTextures {
    MeshTextures {
        diffuse: Some(Arc::new(checker_diffuse(128, 8.0, a, b))),
        normal: Some(Arc::new(bumpy_normal_map(128, 12.0, 6.0))),
        specular: Some(Arc::new(checker_mask(128, 8.0, 0.1, 0.6))),
        gloss: Some(Arc::new(checker_mask(128, 8.0, 0.2, 1.0))),
    }
}

/// Diffuse-only noise material with a flat normal map.
pub fn stone_material(tint: ColorRGB) -> MeshTextures {
    let diffuse = Texture::from_fn(128, 128, |uv| tint * (0.6 + 0.4 * fbm(uv * 10.0, 4)));
    MeshTextures {
        diffuse: Some(Arc::new(diffuse)),
        normal: Some(Arc::new(flat_normal_map())),
        specular: Some(Arc::new(noise_mask(64, 6.0, 0.0, 0.3))),
        gloss: Some(Arc::new(Texture::solid(ColorRGB::grey(0.4)))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn flat_normal_decodes_to_plus_z() {
        let c = flat_normal_map().sample(vec2(0.3, 0.7));
        let n = vec3(c.r, c.g, c.b) * 2.0 - 1.0;
        assert_relative_eq!(n.z, 1.0);
        assert_relative_eq!(n.x, 0.0);
    }

    #[test]
    fn bump_normals_stay_encoded_in_unit_range() {
        let tex = bumpy_normal_map(16, 4.0, 8.0);
        for y in 0..16 {
            for x in 0..16 {
                let c = tex.sample(vec2(x as f32 / 16.0, y as f32 / 16.0));
                for ch in [c.r, c.g, c.b] {
                    assert!((0.0..=1.0).contains(&ch));
                }
                assert!(c.b >= 0.5);
            }
        }
    }

    #[test]
    fn checker_alternates() {
        let tex = checker_diffuse(8, 2.0, ColorRGB::WHITE, ColorRGB::BLACK);
        assert_eq!(tex.sample(vec2(0.1, 0.1)), ColorRGB::WHITE);
        assert_eq!(tex.sample(vec2(0.6, 0.1)), ColorRGB::BLACK);
    }
}
