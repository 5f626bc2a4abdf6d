use super::{Vec3, Vec4};

/// A 4×4 matrix stored as four column vectors.
///
/// Element access reads `m.<column>.<row>`: `m.w_axis.x` is the X translation
/// of an affine transform. The memory layout is column-major, which is what
/// WGSL's `mat4x4<f32>` expects, so [`Mat4::to_cols_array_2d`] can be written
/// straight into a uniform buffer.
///
/// Multiplication follows the column-vector convention: in `a * b`, `b` is
/// applied first.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat4 {
    pub x_axis: Vec4,
    pub y_axis: Vec4,
    pub z_axis: Vec4,
    pub w_axis: Vec4,
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const ZERO: Self = Self::from_cols(Vec4::ZERO, Vec4::ZERO, Vec4::ZERO, Vec4::ZERO);
    pub const IDENTITY: Self = Self::from_cols(Vec4::X, Vec4::Y, Vec4::Z, Vec4::W);

    #[inline]
    pub const fn from_cols(x_axis: Vec4, y_axis: Vec4, z_axis: Vec4, w_axis: Vec4) -> Self {
        Self {
            x_axis,
            y_axis,
            z_axis,
            w_axis,
        }
    }

    pub fn from_cols_array(m: &[f32; 16]) -> Self {
        Self::from_cols(
            Vec4::new(m[0], m[1], m[2], m[3]),
            Vec4::new(m[4], m[5], m[6], m[7]),
            Vec4::new(m[8], m[9], m[10], m[11]),
            Vec4::new(m[12], m[13], m[14], m[15]),
        )
    }

    /// Flat column-major copy, ready for GPU upload.
    pub fn to_cols_array(&self) -> [f32; 16] {
        bytemuck::cast(*self)
    }

    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        [
            self.x_axis.to_array(),
            self.y_axis.to_array(),
            self.z_axis.to_array(),
            self.w_axis.to_array(),
        ]
    }

    /// Returns column `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > 3`.
    pub fn col(&self, index: usize) -> Vec4 {
        match index {
            0 => self.x_axis,
            1 => self.y_axis,
            2 => self.z_axis,
            3 => self.w_axis,
            _ => panic!("column index out of range: {index}"),
        }
    }

    /// Returns row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > 3`.
    pub fn row(&self, index: usize) -> Vec4 {
        let pick = |c: Vec4| match index {
            0 => c.x,
            1 => c.y,
            2 => c.z,
            3 => c.w,
            _ => panic!("row index out of range: {index}"),
        };
        Vec4::new(
            pick(self.x_axis),
            pick(self.y_axis),
            pick(self.z_axis),
            pick(self.w_axis),
        )
    }

    pub fn transpose(&self) -> Self {
        Self::from_cols(self.row(0), self.row(1), self.row(2), self.row(3))
    }

    /// Multiplies a column vector.
    #[inline]
    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        self.x_axis * v.x + self.y_axis * v.y + self.z_axis * v.z + self.w_axis * v.w
    }

    /// Standard matrix product `self * rhs`.
    pub fn mul_mat4(&self, rhs: &Self) -> Self {
        Self::from_cols(
            self.mul_vec4(rhs.x_axis),
            self.mul_vec4(rhs.y_axis),
            self.mul_vec4(rhs.z_axis),
            self.mul_vec4(rhs.w_axis),
        )
    }

    /// Transforms a point (`w = 1`), ignoring the resulting `w`.
    ///
    /// Use [`project_point3`](Self::project_point3) for projection matrices.
    pub fn transform_point3(&self, p: Vec3) -> Vec3 {
        self.mul_vec4(p.extend(1.0)).truncate()
    }

    /// Transforms a direction (`w = 0`): translation has no effect.
    pub fn transform_vector3(&self, v: Vec3) -> Vec3 {
        self.mul_vec4(v.extend(0.0)).truncate()
    }

    /// Transforms a point and performs the perspective divide.
    pub fn project_point3(&self, p: Vec3) -> Vec3 {
        let clip = self.mul_vec4(p.extend(1.0));
        clip.truncate() / clip.w
    }

    /// Non-uniform scale along the three axes.
    pub fn scale(s: Vec3) -> Self {
        Self::from_cols(
            Vec4::new(s.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, s.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, s.z, 0.0),
            Vec4::W,
        )
    }

    pub fn translation(t: Vec3) -> Self {
        Self::from_cols(Vec4::X, Vec4::Y, Vec4::Z, t.extend(1.0))
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// `axis` is normalized first. Positive angles turn clockwise when looking
    /// down the axis toward the origin, the same sign as
    /// [`rotation_x`](Self::rotation_x) and friends.
    pub fn rotation(axis: Vec3, angle: f32) -> Self {
        let u = axis.normalize();
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;

        Self::from_cols(
            Vec4::new(
                c + u.x * u.x * t,
                u.x * u.y * t - u.z * s,
                u.x * u.z * t + u.y * s,
                0.0,
            ),
            Vec4::new(
                u.x * u.y * t + u.z * s,
                c + u.y * u.y * t,
                u.y * u.z * t - u.x * s,
                0.0,
            ),
            Vec4::new(
                u.x * u.z * t - u.y * s,
                u.y * u.z * t + u.x * s,
                c + u.z * u.z * t,
                0.0,
            ),
            Vec4::W,
        )
    }

    /// Rotation about X. A quarter turn sends +Y to −Z.
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::X,
            Vec4::new(0.0, c, -s, 0.0),
            Vec4::new(0.0, s, c, 0.0),
            Vec4::W,
        )
    }

    /// Rotation about Y. A quarter turn sends +Z to −X.
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, 0.0, s, 0.0),
            Vec4::Y,
            Vec4::new(-s, 0.0, c, 0.0),
            Vec4::W,
        )
    }

    /// Rotation about Z. A quarter turn sends +X to −Y.
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, -s, 0.0, 0.0),
            Vec4::new(s, c, 0.0, 0.0),
            Vec4::Z,
            Vec4::W,
        )
    }

    /// Right-handed orthographic projection with a `[0, 1]` depth range.
    ///
    /// View-space `z = -near` maps to depth 0 and `z = -far` to depth 1.
    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let rcp_width = 1.0 / (right - left);
        let rcp_height = 1.0 / (top - bottom);
        let r = 1.0 / (near - far);

        Self::from_cols(
            Vec4::new(2.0 * rcp_width, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * rcp_height, 0.0, 0.0),
            Vec4::new(0.0, 0.0, r, 0.0),
            Vec4::new(
                -(left + right) * rcp_width,
                -(top + bottom) * rcp_height,
                r * near,
                1.0,
            ),
        )
    }

    /// Right-handed perspective projection with a `[0, 1]` depth range.
    ///
    /// `yfov` is the vertical field of view in radians.
    pub fn perspective(yfov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (0.5 * yfov).tan();
        let r = far / (near - far);

        Self::from_cols(
            Vec4::new(f / aspect, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, r, -1.0),
            Vec4::new(0.0, 0.0, r * near, 0.0),
        )
    }

    /// Right-handed view matrix for an eye at `eye` looking at `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let f = (target - eye).normalize();
        let s = f.cross(up).normalize();
        let u = s.cross(f);

        Self::from_cols(
            Vec4::new(s.x, u.x, -f.x, 0.0),
            Vec4::new(s.y, u.y, -f.y, 0.0),
            Vec4::new(s.z, u.z, -f.z, 0.0),
            Vec4::new(-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0),
        )
    }

    /// Elementwise comparison within `eps`.
    pub fn approx_eq_eps(&self, rhs: &Self, eps: f32) -> bool {
        self.to_cols_array()
            .iter()
            .zip(rhs.to_cols_array().iter())
            .all(|(a, b)| super::approx_eq_eps(*a, *b, eps))
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_mat4(&rhs)
    }
}

impl std::ops::Mul<Vec4> for Mat4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        self.mul_vec4(rhs)
    }
}

impl std::ops::Mul<f32> for Mat4 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::from_cols(
            self.x_axis * rhs,
            self.y_axis * rhs,
            self.z_axis * rhs,
            self.w_axis * rhs,
        )
    }
}

impl std::ops::Add for Mat4 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_cols(
            self.x_axis + rhs.x_axis,
            self.y_axis + rhs.y_axis,
            self.z_axis + rhs.z_axis,
            self.w_axis + rhs.w_axis,
        )
    }
}

impl std::ops::Sub for Mat4 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_cols(
            self.x_axis - rhs.x_axis,
            self.y_axis - rhs.y_axis,
            self.z_axis - rhs.z_axis,
            self.w_axis - rhs.w_axis,
        )
    }
}

impl From<glam::Mat4> for Mat4 {
    fn from(m: glam::Mat4) -> Self {
        Self::from_cols_array(&m.to_cols_array())
    }
}

impl From<Mat4> for glam::Mat4 {
    fn from(m: Mat4) -> Self {
        glam::Mat4::from_cols_array(&m.to_cols_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};

    fn sample() -> Mat4 {
        Mat4::from_cols_array(&[
            1.0, 2.0, 3.0, 4.0, //
            -5.0, 6.5, 7.0, 0.25, //
            9.0, -1.0, 0.5, 2.0, //
            3.0, 8.0, -2.0, 1.0,
        ])
    }

    fn assert_matches_glam(ours: Mat4, theirs: glam::Mat4) {
        assert!(
            ours.approx_eq_eps(&Mat4::from(theirs), 1e-5),
            "\nours:  {:?}\nglam:  {:?}",
            ours.to_cols_array(),
            theirs.to_cols_array()
        );
    }

    #[test]
    fn identity_is_neutral() {
        let a = sample();
        assert_eq!(a * Mat4::IDENTITY, a);
        assert_eq!(Mat4::IDENTITY * a, a);
    }

    #[test]
    fn transpose_is_an_involution() {
        let a = sample();
        assert_eq!(a.transpose().transpose(), a);
        assert_ne!(a.transpose(), a);
        assert_eq!(a.transpose().row(1), a.col(1));
    }

    #[test]
    fn multiplication_matches_glam_and_is_not_commutative() {
        let a = sample();
        let b = Mat4::rotation_x(0.3) * Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        assert_matches_glam(a * b, glam::Mat4::from(a) * glam::Mat4::from(b));
        assert_ne!(a * b, b * a);
    }

    #[test]
    fn add_sub_and_scale_are_elementwise() {
        let a = sample();
        assert_eq!((a + a) - a, a);
        assert_eq!(a * 2.0, a + a);
        assert_eq!(a - a, Mat4::ZERO);
    }

    #[test]
    fn zero_rotations_are_identity() {
        assert_eq!(Mat4::rotation_x(0.0), Mat4::IDENTITY);
        assert_eq!(Mat4::rotation_y(0.0), Mat4::IDENTITY);
        assert_eq!(Mat4::rotation_z(0.0), Mat4::IDENTITY);
        assert!(Mat4::rotation(Vec3::new(1.0, 1.0, 0.0), 0.0).approx_eq_eps(&Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn quarter_turns_rotate_clockwise() {
        let y = Mat4::rotation_y(FRAC_PI_2).transform_vector3(Vec3::Z);
        assert!(y.approx_eq(Vec3::NEG_X), "{y:?}");

        let x = Mat4::rotation_x(FRAC_PI_2).transform_vector3(Vec3::Y);
        assert!(x.approx_eq(Vec3::NEG_Z), "{x:?}");

        let z = Mat4::rotation_z(FRAC_PI_2).transform_vector3(Vec3::X);
        assert!(z.approx_eq(Vec3::NEG_Y), "{z:?}");
    }

    #[test]
    fn axis_rotations_match_glam_with_opposite_sign() {
        for angle in [FRAC_PI_4, FRAC_PI_3, -1.1, 2.5] {
            assert_matches_glam(Mat4::rotation_x(angle), glam::Mat4::from_rotation_x(-angle));
            assert_matches_glam(Mat4::rotation_y(angle), glam::Mat4::from_rotation_y(-angle));
            assert_matches_glam(Mat4::rotation_z(angle), glam::Mat4::from_rotation_z(-angle));
        }
    }

    #[test]
    fn axis_angle_rotation_agrees_with_single_axis_builders() {
        let angle = 0.7;
        assert!(Mat4::rotation(Vec3::X, angle).approx_eq_eps(&Mat4::rotation_x(angle), 1e-6));
        assert!(Mat4::rotation(Vec3::Y * 3.0, angle).approx_eq_eps(&Mat4::rotation_y(angle), 1e-6));
        assert!(Mat4::rotation(Vec3::Z, angle).approx_eq_eps(&Mat4::rotation_z(angle), 1e-6));

        let axis = Vec3::new(1.0, -2.0, 0.5);
        assert_matches_glam(
            Mat4::rotation(axis, angle),
            glam::Mat4::from_axis_angle(glam::Vec3::from(axis.normalize()), -angle),
        );
    }

    #[test]
    fn scale_and_translation_builders() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Mat4::scale(Vec3::new(2.0, 3.0, 4.0)).transform_point3(p), Vec3::new(2.0, 6.0, 12.0));
        assert_eq!(Mat4::translation(Vec3::new(1.0, 0.0, -1.0)).transform_point3(p), Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(Mat4::translation(Vec3::ONE).transform_vector3(p), p);
    }

    #[test]
    fn perspective_matches_glam() {
        assert_matches_glam(
            Mat4::perspective(45f32.to_radians(), 16.0 / 9.0, 0.1, 100.0),
            glam::Mat4::perspective_rh(45f32.to_radians(), 16.0 / 9.0, 0.1, 100.0),
        );
    }

    #[test]
    fn perspective_maps_near_and_far_to_depth_extremes() {
        let (near, far) = (0.1, 100.0);
        let proj = Mat4::perspective(FRAC_PI_4, 1.5, near, far);

        let at_near = proj.project_point3(Vec3::new(0.0, 0.0, -near)).z;
        let at_far = proj.project_point3(Vec3::new(0.0, 0.0, -far)).z;
        assert!(at_near.abs() < 1e-5, "near depth {at_near}");
        assert!((at_far - 1.0).abs() < 1e-5, "far depth {at_far}");

        let mut last = at_near;
        for z in [0.5, 1.0, 10.0, 50.0, 99.0] {
            let depth = proj.project_point3(Vec3::new(0.0, 0.0, -z)).z;
            assert!(depth > last, "depth must grow with distance");
            last = depth;
        }
    }

    #[test]
    fn orthographic_matches_glam_and_maps_depth_linearly() {
        let proj = Mat4::orthographic(0.0, 800.0, 0.0, 600.0, 0.1, 100.0);
        assert_matches_glam(proj, glam::Mat4::orthographic_rh(0.0, 800.0, 0.0, 600.0, 0.1, 100.0));

        let at_near = proj.project_point3(Vec3::new(0.0, 0.0, -0.1)).z;
        let at_mid = proj.project_point3(Vec3::new(0.0, 0.0, -50.05)).z;
        let at_far = proj.project_point3(Vec3::new(0.0, 0.0, -100.0)).z;
        assert!(at_near.abs() < 1e-5);
        assert!((at_mid - 0.5).abs() < 1e-5);
        assert!((at_far - 1.0).abs() < 1e-5);

        let corner = proj.project_point3(Vec3::new(800.0, 600.0, -1.0));
        assert!((corner.x - 1.0).abs() < 1e-5 && (corner.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn look_at_matches_glam() {
        let eye = Vec3::new(3.0, 4.0, 5.0);
        let target = Vec3::new(0.0, 1.0, 0.0);
        let view = Mat4::look_at(eye, target, Vec3::UP);
        assert_matches_glam(
            view,
            glam::Mat4::look_at_rh(eye.into(), target.into(), glam::Vec3::Y),
        );

        // The target ends up straight ahead of the viewer.
        let t = view.transform_point3(target);
        assert!(t.x.abs() < 1e-5 && t.y.abs() < 1e-5 && t.z < 0.0);
    }

    #[test]
    fn rows_and_columns() {
        let m = Mat4::translation(Vec3::new(7.0, 8.0, 9.0));
        assert_eq!(m.col(3), Vec4::new(7.0, 8.0, 9.0, 1.0));
        assert_eq!(m.row(0), Vec4::new(1.0, 0.0, 0.0, 7.0));
        assert_eq!(m.to_cols_array()[12..15], [7.0, 8.0, 9.0]);
    }

    #[test]
    #[should_panic(expected = "column index out of range")]
    fn col_out_of_range_panics() {
        Mat4::IDENTITY.col(4);
    }
}
