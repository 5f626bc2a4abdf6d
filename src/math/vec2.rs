/// A two-component vector, used for viewport sizes and texture coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl_vec_ops!(Vec2 { x, y });

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    /// Builds a [`Vec3`](super::Vec3) with the given `z`.
    #[inline]
    pub fn extend(self, z: f32) -> super::Vec3 {
        super::Vec3::new(self.x, self.y, z)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<Vec2> for [f32; 2] {
    fn from(v: Vec2) -> Self {
        v.to_array()
    }
}

impl From<glam::Vec2> for Vec2 {
    fn from(v: glam::Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vec2> for glam::Vec2 {
    fn from(v: Vec2) -> Self {
        glam::Vec2::new(v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_yields_unit_length() {
        for v in [Vec2::new(3.0, 4.0), Vec2::new(-0.001, 0.2), Vec2::new(1e3, -7.0)] {
            assert!((v.normalize().length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn mul_inner_matches_dot() {
        let a = Vec2::new(1.5, -2.0);
        let b = Vec2::new(4.0, 0.25);
        assert_eq!(a.dot(b), a.mul_inner(b));
        assert_eq!(a.dot(b), 5.5);
    }

    #[test]
    fn min_max_are_componentwise() {
        let a = Vec2::new(1.0, 5.0);
        let b = Vec2::new(3.0, -2.0);
        assert_eq!(a.min(b), Vec2::new(1.0, -2.0));
        assert_eq!(a.max(b), Vec2::new(3.0, 5.0));
    }

    #[test]
    fn zero_vector_has_no_direction() {
        assert!(Vec2::ZERO.try_normalize().is_none());
        assert_eq!(Vec2::ZERO.normalize_or_zero(), Vec2::ZERO);
        assert!(Vec2::ZERO.normalize().x.is_nan());
    }
}
