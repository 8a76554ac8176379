use std::f32::consts::PI;

use glam::{Mat3, Vec3};

use crate::color::ColorRGB;
use crate::mesh::MeshTextures;
use crate::types::VertexOut;

/// Stands in for the missing light intensity and attenuation.
pub const DIFFUSE_REFLECTANCE: f32 = 7.0;
pub const SHININESS: f32 = 25.0;
pub const AMBIENT: ColorRGB = ColorRGB::grey(0.03);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LightingMode {
    ObservedArea,
    Diffuse,
    Specular,
    #[default]
    Combined,
}

impl LightingMode {
    pub const ALL: [LightingMode; 4] = [
        LightingMode::ObservedArea,
        LightingMode::Diffuse,
        LightingMode::Specular,
        LightingMode::Combined,
    ];

    fn index(self) -> usize {
        match self {
            LightingMode::ObservedArea => 0,
            LightingMode::Diffuse => 1,
            LightingMode::Specular => 2,
            LightingMode::Combined => 3,
        }
    }

    /// The following mode, wrapping back to the first.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// Texture samples for one fragment.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceSample {
    pub diffuse: ColorRGB,
    pub normal: Option<ColorRGB>,
    pub specular: ColorRGB,
    pub gloss: f32,
}

impl SurfaceSample {
    /// Samples every map of `textures` at the fragment's UV. A missing
    /// diffuse map falls back to the interpolated vertex color.
    pub fn from_textures(textures: &MeshTextures, v: &VertexOut) -> Self {
        Self {
            diffuse: textures.diffuse.as_ref().map_or(v.color, |t| t.sample(v.uv)),
            normal: textures.normal.as_ref().map(|t| t.sample(v.uv)),
            specular: textures.specular.as_ref().map_or(ColorRGB::BLACK, |t| t.sample(v.uv)),
            // greyscale map, red is enough
            gloss: textures.gloss.as_ref().map_or(0.0, |t| t.sample(v.uv).r),
        }
    }
}

/// Per-frame shading inputs shared by every pixel.
#[derive(Clone, Copy, Debug)]
pub struct ShadingParams {
    pub camera_pos: Vec3,
    pub light_dir: Vec3,
    pub mode: LightingMode,
    pub use_normal_map: bool,
}

#[inline]
pub fn observed_area(light_dir: Vec3, normal: Vec3) -> f32 {
    normal.dot(-light_dir).max(0.0)
}

/// Phong lobe around the reflection of the incoming light.
#[inline]
pub fn phong(specular: ColorRGB, exponent: f32, light_dir: Vec3, to_camera: Vec3, normal: Vec3) -> ColorRGB {
    let reflected = reflect(-light_dir, normal);
    let closing = reflected.dot(-to_camera).max(0.0);
    specular * closing.powf(exponent)
}

#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Shading normal: the tangent-space normal map sample moved to world space,
/// or the interpolated normal when mapping is off or no map is bound.
pub fn shading_normal(v: &VertexOut, sample: Option<ColorRGB>, use_normal_map: bool) -> Vec3 {
    match sample {
        Some(c) if use_normal_map => {
            let bitangent = v.normal.cross(v.tangent).normalize_or_zero();
            let tbn = Mat3::from_cols(v.tangent, bitangent, v.normal);
            let local = Vec3::new(c.r, c.g, c.b) * 2.0 - Vec3::ONE;
            (tbn * local).normalize_or_zero()
        }
        _ => v.normal,
    }
}

/// Lambert + Phong color of one fragment, scaled so no channel exceeds 1.
/// A zero light direction returns the diffuse sample untouched.
pub fn shade_pixel(v: &VertexOut, surface: &SurfaceSample, params: &ShadingParams) -> ColorRGB {
    if params.light_dir == Vec3::ZERO {
        return surface.diffuse;
    }

    let normal = shading_normal(v, surface.normal, params.use_normal_map);
    let to_camera = (params.camera_pos - v.world_pos).normalize_or_zero();

    let observed = observed_area(params.light_dir, normal);
    let lambert = surface.diffuse * DIFFUSE_REFLECTANCE / PI;
    let specular = phong(surface.specular, surface.gloss * SHININESS, params.light_dir, to_camera, normal);

    let color = match params.mode {
        LightingMode::ObservedArea => ColorRGB::grey(observed),
        LightingMode::Diffuse => lambert,
        LightingMode::Specular => specular,
        LightingMode::Combined => (lambert + specular + AMBIENT) * observed,
    };
    color.max_to_one()
}
