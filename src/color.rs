use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// Linear RGB color with unbounded `f32` channels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorRGB {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ColorRGB {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(v: f32) -> Self {
        Self::new(v, v, v)
    }

    #[inline]
    pub fn max_channel(self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    /// Scales the color down so no channel exceeds 1, keeping channel ratios.
    #[inline]
    pub fn max_to_one(self) -> Self {
        let max = self.max_channel();
        if max > 1.0 {
            self / max
        } else {
            self
        }
    }

    /// Packs into the `0xFFRRGGBB` layout the display surface expects.
    /// Channels are clamped to `[0, 1]` first.
    #[inline]
    pub fn to_argb(self) -> u32 {
        let r = (self.r.clamp(0.0, 1.0) * 255.0) as u32;
        let g = (self.g.clamp(0.0, 1.0) * 255.0) as u32;
        let b = (self.b.clamp(0.0, 1.0) * 255.0) as u32;
        0xFF00_0000 | (r << 16) | (g << 8) | b
    }

    #[inline]
    pub fn from_argb(px: u32) -> Self {
        let r = ((px >> 16) & 0xFF) as f32 / 255.0;
        let g = ((px >> 8) & 0xFF) as f32 / 255.0;
        let b = (px & 0xFF) as f32 / 255.0;
        Self::new(r, g, b)
    }

    #[inline]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }
}

impl Add for ColorRGB {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for ColorRGB {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for ColorRGB {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl Mul for ColorRGB {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl Mul<f32> for ColorRGB {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl Mul<ColorRGB> for f32 {
    type Output = ColorRGB;
    fn mul(self, rhs: ColorRGB) -> ColorRGB {
        rhs * self
    }
}

impl Div<f32> for ColorRGB {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.r / rhs, self.g / rhs, self.b / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn max_to_one_keeps_ratios() {
        let c = ColorRGB::new(2.0, 1.0, 0.5).max_to_one();
        assert_relative_eq!(c.r, 1.0);
        assert_relative_eq!(c.g, 0.5);
        assert_relative_eq!(c.b, 0.25);
    }

    #[test]
    fn max_to_one_leaves_in_range_colors_alone() {
        let c = ColorRGB::new(0.2, 0.9, 1.0);
        assert_eq!(c.max_to_one(), c);
    }

    #[test]
    fn argb_packing() {
        assert_eq!(ColorRGB::WHITE.to_argb(), 0xFFFF_FFFF);
        assert_eq!(ColorRGB::BLACK.to_argb(), 0xFF00_0000);
        assert_eq!(ColorRGB::new(1.0, 0.0, 0.0).to_argb(), 0xFFFF_0000);
        let back = ColorRGB::from_argb(0xFF00_FF00);
        assert_relative_eq!(back.g, 1.0);
        assert_relative_eq!(back.r, 0.0);
    }
}
