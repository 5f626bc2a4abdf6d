use super::{Vec2, Vec4};

/// A three-component vector for positions, directions, scales and Euler angles.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl_vec_ops!(Vec3 { x, y, z });

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);
    pub const NEG_X: Self = Self::new(-1.0, 0.0, 0.0);
    pub const NEG_Y: Self = Self::new(0.0, -1.0, 0.0);
    pub const NEG_Z: Self = Self::new(0.0, 0.0, -1.0);

    pub const UP: Self = Self::Y;
    pub const DOWN: Self = Self::NEG_Y;
    pub const RIGHT: Self = Self::X;
    pub const LEFT: Self = Self::NEG_X;
    /// The direction a default camera looks toward.
    pub const FORWARD: Self = Self::NEG_Z;
    pub const BACKWARD: Self = Self::Z;

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Builds a vector from a [`Vec2`] and a `z` component.
    #[inline]
    pub fn from_xy(v: Vec2, z: f32) -> Self {
        Self::new(v.x, v.y, z)
    }

    /// Builds a [`Vec4`] with the given `w` (1 for points, 0 for directions).
    #[inline]
    pub fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }

    #[inline]
    pub fn truncate(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Right-handed cross product: `X.cross(Y) == Z`.
    #[inline]
    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Reflects `self` about the plane whose normal is `normal`.
    ///
    /// `normal` is normalized first, so it only needs to be non-zero.
    pub fn reflect(self, normal: Self) -> Self {
        let n = normal.normalize();
        self - n * (2.0 * self.dot(n))
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl From<glam::Vec3> for Vec3 {
    fn from(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for glam::Vec3 {
    fn from(v: Vec3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_yields_unit_length() {
        let samples = [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-0.5, 0.0, 0.0),
            Vec3::new(100.0, -250.0, 3.5),
            Vec3::new(1e-3, 1e-3, -1e-3),
        ];
        for v in samples {
            let len = v.normalize().length();
            assert!((len - 1.0).abs() < 1e-6, "{v:?} normalized to length {len}");
        }
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
        assert_eq!(Vec3::Z.cross(Vec3::X), Vec3::Y);
        assert_eq!(Vec3::Y.cross(Vec3::X), Vec3::NEG_Z);
    }

    #[test]
    fn cross_is_orthogonal_to_inputs() {
        let a = Vec3::new(0.3, -1.2, 2.0);
        let b = Vec3::new(4.0, 0.5, -0.7);
        let c = a.cross(b);
        assert!(c.dot(a).abs() < 1e-5);
        assert!(c.dot(b).abs() < 1e-5);
    }

    #[test]
    fn dot_and_mul_inner_agree() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-4.0, 5.0, 0.5);
        assert_eq!(a.dot(b), 7.5);
        assert_eq!(a.mul_inner(b), a.dot(b));
    }

    #[test]
    fn reflect_flips_normal_component() {
        let d = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(d.reflect(Vec3::new(0.0, 2.0, 0.0)), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn arithmetic_matches_glam() {
        let a = Vec3::new(1.0, -2.0, 0.5);
        let b = Vec3::new(0.25, 4.0, -3.0);
        let ga = glam::Vec3::from(a);
        let gb = glam::Vec3::from(b);

        assert_eq!(Vec3::from(ga + gb), a + b);
        assert_eq!(Vec3::from(ga - gb), a - b);
        assert_eq!(Vec3::from(ga * 3.0), a * 3.0);
        assert_eq!(Vec3::from(ga.cross(gb)), a.cross(b));
        assert!((ga.length() - a.length()).abs() < 1e-6);
    }

    #[test]
    fn zero_length_guards() {
        assert!(Vec3::ZERO.try_normalize().is_none());
        assert_eq!(Vec3::ZERO.normalize_or_zero(), Vec3::ZERO);
        assert!(Vec3::ZERO.normalize().x.is_nan());
    }
}
