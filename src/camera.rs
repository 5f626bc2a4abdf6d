use crate::math::{Mat4, Vec2, Vec3};
use crate::transform::Transform;

/// How a [`Camera`] projects view space onto the screen. Fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    /// Maps `[0, width] × [0, height]` view-space units onto the viewport.
    Orthographic,
}

/// A viewpoint with a projection.
///
/// The camera's [`Transform`] is used directly as the world → view matrix, so
/// moving the camera's origin to `(0, 0, -10)` pushes the scene ten units in
/// front of it. `width`, `height` and `aspect` are refreshed once per frame by
/// [`Camera::update`]; the projection matrix is always derived, never cached.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub mode: Projection,
    pub transform: Transform,
    /// Vertical field of view in degrees. Only used in perspective mode.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub width: f32,
    pub height: f32,
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self::perspective(45.0, 0.1, 100.0);
        camera.transform.origin = Vec3::new(0.0, 0.0, -10.0);
        camera
    }
}

impl Camera {
    /// # Panics
    ///
    /// Panics unless `0 < fov < 180` and `near < far`.
    pub fn perspective(fov: f32, near: f32, far: f32) -> Self {
        assert!(
            fov > 0.0 && fov < 180.0,
            "perspective fov must be in (0, 180) degrees, got {fov}"
        );
        Self::with_mode(Projection::Perspective, fov, near, far)
    }

    /// # Panics
    ///
    /// Panics unless `near < far`.
    pub fn orthographic(near: f32, far: f32) -> Self {
        Self::with_mode(Projection::Orthographic, 0.0, near, far)
    }

    fn with_mode(mode: Projection, fov: f32, near: f32, far: f32) -> Self {
        assert!(near < far, "camera near plane ({near}) must be closer than far plane ({far})");
        Self {
            mode,
            transform: Transform::identity(),
            fov,
            near,
            far,
            width: 1.0,
            height: 1.0,
            aspect: 1.0,
        }
    }

    pub fn at(mut self, origin: Vec3) -> Self {
        self.transform.origin = origin;
        self
    }

    /// Refreshes the viewport-derived fields.
    ///
    /// A zero-area viewport (a minimized window) keeps the previous values so
    /// the aspect ratio never becomes infinite or NaN.
    pub fn update(&mut self, viewport: Vec2) {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }
        self.width = viewport.x;
        self.height = viewport.y;
        self.aspect = viewport.x / viewport.y;
    }

    pub fn projection_matrix(&self) -> Mat4 {
        match self.mode {
            Projection::Perspective => {
                Mat4::perspective(self.fov.to_radians(), self.aspect, self.near, self.far)
            }
            Projection::Orthographic => {
                Mat4::orthographic(0.0, self.width, 0.0, self.height, self.near, self.far)
            }
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.transform.model_matrix()
    }

    /// `projection * view`, the matrix a model matrix is multiplied into.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
