//! Scale, Euler rotation and translation composed into a model matrix.
//!
//! A [`Transform`] stores its three components separately and combines them on
//! demand. The composition order is fixed:
//!
//! 1. scale about the local origin
//! 2. rotate about X, then Y, then Z
//! 3. translate to `origin`
//!
//! which is `T * Rz * Ry * Rx * S` in column-vector notation. Angles are in
//! radians and follow the clockwise-positive sign of [`Mat4::rotation_x`] and
//! friends, so a quarter turn about Y sends local +Z to world −X:
//!
//! ```
//! use spinview::{Transform, Vec3};
//!
//! let mut t = Transform::identity();
//! t.angles.y = std::f32::consts::FRAC_PI_2;
//! let dir = t.model_matrix().transform_vector3(Vec3::Z);
//! assert!(dir.approx_eq(Vec3::NEG_X));
//! ```

use crate::math::{Mat4, Vec3};

/// Position, orientation and size of a model or camera.
///
/// Owned by the object it places; mutate the fields directly each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Per-axis scale factors.
    pub scale: Vec3,
    /// Translation.
    pub origin: Vec3,
    /// Euler angles in radians, applied X first, then Y, then Z.
    pub angles: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Unit scale, no rotation, placed at the origin.
    pub const fn identity() -> Self {
        Self {
            scale: Vec3::ONE,
            origin: Vec3::ZERO,
            angles: Vec3::ZERO,
        }
    }

    /// An identity transform placed at `origin`.
    pub fn from_origin(origin: Vec3) -> Self {
        Self {
            origin,
            ..Self::identity()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_angles(mut self, angles: Vec3) -> Self {
        self.angles = angles;
        self
    }

    /// The rotation part alone: `Rz * Ry * Rx`.
    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::rotation_z(self.angles.z)
            * Mat4::rotation_y(self.angles.y)
            * Mat4::rotation_x(self.angles.x)
    }

    /// Local → world matrix.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::translation(self.origin) * self.rotation_matrix() * Mat4::scale(self.scale)
    }

    /// Moves the origin by `offset` expressed in world axes.
    pub fn translated_world(&mut self, offset: Vec3) -> &mut Self {
        self.origin += offset;
        self
    }

    /// Moves the origin by `offset` expressed in the transform's own rotated
    /// axes. Scale does not affect the distance travelled.
    pub fn translated_local(&mut self, offset: Vec3) -> &mut Self {
        self.origin += self.rotation_matrix().transform_vector3(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn identity_produces_identity_matrix() {
        assert_eq!(Transform::identity().model_matrix(), Mat4::IDENTITY);
        assert_eq!(Transform::default(), Transform::identity());
    }

    #[test]
    fn quarter_turn_about_y_maps_forward_to_negative_x() {
        let t = Transform::from_origin(Vec3::new(0.0, 0.0, -10.0))
            .with_angles(Vec3::new(0.0, FRAC_PI_2, 0.0));
        let m = t.model_matrix();

        let dir = m.transform_vector3(Vec3::Z);
        assert!(dir.approx_eq(Vec3::NEG_X), "{dir:?}");

        let point = m.transform_point3(Vec3::Z);
        assert!(point.approx_eq(Vec3::new(-1.0, 0.0, -10.0)), "{point:?}");
    }

    #[test]
    fn scale_is_applied_before_rotation_and_translation() {
        let t = Transform::from_origin(Vec3::new(5.0, 0.0, 0.0))
            .with_scale(Vec3::new(2.0, 1.0, 1.0))
            .with_angles(Vec3::new(0.0, 0.0, FRAC_PI_2));

        // +X is stretched to length 2, turned onto −Y, then moved.
        let p = t.model_matrix().transform_point3(Vec3::X);
        assert!(p.approx_eq(Vec3::new(5.0, -2.0, 0.0)), "{p:?}");
    }

    #[test]
    fn rotation_order_is_x_then_y_then_z() {
        let t = Transform::identity().with_angles(Vec3::new(0.3, -0.8, 1.9));
        let expected = Mat4::rotation_z(1.9) * Mat4::rotation_y(-0.8) * Mat4::rotation_x(0.3);
        assert!(t.rotation_matrix().approx_eq_eps(&expected, 1e-6));
        assert!(t.model_matrix().approx_eq_eps(&expected, 1e-6));
    }

    #[test]
    fn world_translation_ignores_rotation() {
        let mut t = Transform::identity().with_angles(Vec3::new(0.0, PI, 0.0));
        t.translated_world(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.origin, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn local_translation_follows_rotation() {
        let mut t = Transform::from_origin(Vec3::new(0.0, 0.0, -10.0))
            .with_angles(Vec3::new(0.0, FRAC_PI_2, 0.0))
            .with_scale(Vec3::splat(3.0));
        t.translated_local(Vec3::Z);
        assert!(t.origin.approx_eq(Vec3::new(-1.0, 0.0, -10.0)), "{:?}", t.origin);

        // Chains like the builder methods.
        t.translated_local(Vec3::Z).translated_world(Vec3::Y);
        assert!(t.origin.approx_eq(Vec3::new(-2.0, 1.0, -10.0)), "{:?}", t.origin);
    }
}
