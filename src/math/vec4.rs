use super::{Vec2, Vec3};

/// A four-component vector: homogeneous points, matrix columns and RGBA colors.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl_vec_ops!(Vec4 { x, y, z, w });

impl Vec4 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0, 0.0);
    pub const W: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self {
            x: v,
            y: v,
            z: v,
            w: v,
        }
    }

    #[inline]
    pub fn from_xyz(v: Vec3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    #[inline]
    pub fn from_xy(v: Vec2, z: f32, w: f32) -> Self {
        Self::new(v.x, v.y, z, w)
    }

    /// Drops `w`.
    #[inline]
    pub fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl From<[f32; 4]> for Vec4 {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Vec4> for [f32; 4] {
    fn from(v: Vec4) -> Self {
        v.to_array()
    }
}

impl From<glam::Vec4> for Vec4 {
    fn from(v: glam::Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vec4> for glam::Vec4 {
    fn from(v: Vec4) -> Self {
        glam::Vec4::new(v.x, v.y, v.z, v.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_yields_unit_length() {
        let v = Vec4::new(1.0, -2.0, 3.0, 0.5).normalize();
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn extend_and_truncate_round_trip_components() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(p.extend(1.0), Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(p.extend(0.0).truncate(), p);
        assert_eq!(Vec4::from_xy(Vec2::new(5.0, 6.0), 7.0, 8.0).to_array(), [5.0, 6.0, 7.0, 8.0]);
    }
}
