use std::path::Path;
use std::rc::Rc;

use crate::error::LoadError;
use crate::geometry::{RawGeometry, RawPrimitive};
use crate::gpu::GpuContext;
use crate::mesh::Primitive;
use crate::shader::Shader;
use crate::transform::Transform;

/// Post-processing applied to staged geometry before upload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Move the bounding box center to the origin.
    pub recenter: bool,
    /// Scale so the largest extent is 1.
    pub normalize: bool,
    /// Replace normals with smooth, recomputed ones.
    pub smooth_normals: bool,
}

impl LoadOptions {
    /// Recenters and normalizes, for viewing models of unknown scale.
    pub fn fit() -> Self {
        Self {
            recenter: true,
            normalize: true,
            smooth_normals: false,
        }
    }

    pub fn apply(&self, geometry: &mut RawGeometry) {
        if self.recenter {
            geometry.recenter();
        }
        if self.normalize {
            geometry.normalize();
        }
        if self.smooth_normals {
            geometry.recalculate_normals();
        }
    }
}

/// Drawable geometry plus the program that draws it and where it sits.
///
/// Owns its primitives; dropping the model releases every GPU buffer it
/// created. The shader is shared.
pub struct Model {
    primitives: Vec<Primitive>,
    shader: Rc<Shader>,
    pub transform: Transform,
}

impl Model {
    /// Loads a `.gltf`/`.glb` file and uploads every primitive.
    ///
    /// On error nothing is uploaded.
    pub fn load(gpu: &GpuContext, path: impl AsRef<Path>, shader: Rc<Shader>) -> Result<Self, LoadError> {
        Self::load_with(gpu, path, shader, LoadOptions::default())
    }

    pub fn load_with(
        gpu: &GpuContext,
        path: impl AsRef<Path>,
        shader: Rc<Shader>,
        options: LoadOptions,
    ) -> Result<Self, LoadError> {
        let mut geometry = RawGeometry::from_path(path)?;
        options.apply(&mut geometry);
        Ok(Self::from_geometry(gpu, &geometry, shader))
    }

    pub fn from_geometry(gpu: &GpuContext, geometry: &RawGeometry, shader: Rc<Shader>) -> Self {
        Self {
            primitives: geometry.upload(gpu),
            shader,
            transform: Transform::identity(),
        }
    }

    /// A procedural cube with edge length `dim`.
    pub fn cube(gpu: &GpuContext, dim: f32, shader: Rc<Shader>) -> Self {
        Self::from_geometry(gpu, &RawPrimitive::cube(dim).into(), shader)
    }

    /// A procedural `size × size` ground plane.
    pub fn plane(gpu: &GpuContext, size: f32, shader: Rc<Shader>) -> Self {
        Self::from_geometry(gpu, &RawPrimitive::plane(size).into(), shader)
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn shader(&self) -> &Shader {
        &self.shader
    }

    pub fn index_count(&self) -> u32 {
        self.primitives.iter().map(Primitive::index_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::mesh::Vertex;

    fn offset_geometry() -> RawGeometry {
        let mut tri = RawPrimitive::new(
            vec![
                Vertex::from_position([10.0, 0.0, 0.0]),
                Vertex::from_position([14.0, 0.0, 0.0]),
                Vertex::from_position([10.0, 2.0, 0.0]),
            ],
            vec![0, 1, 2],
        );
        tri.vertices[0].normal = [1.0, 0.0, 0.0];
        tri.into()
    }

    #[test]
    fn default_options_leave_geometry_untouched() {
        let original = offset_geometry();
        let mut geometry = original.clone();
        LoadOptions::default().apply(&mut geometry);
        assert_eq!(geometry, original);
    }

    #[test]
    fn fit_centers_and_scales_to_unit_size() {
        let mut geometry = offset_geometry();
        LoadOptions::fit().apply(&mut geometry);
        assert!(geometry.center().approx_eq(Vec3::ZERO));
        assert!((geometry.size().x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn smooth_normals_replace_source_normals() {
        let mut geometry = offset_geometry();
        LoadOptions {
            smooth_normals: true,
            ..Default::default()
        }
        .apply(&mut geometry);
        assert_eq!(geometry.primitives[0].vertices[0].normal, [0.0, 0.0, 1.0]);
    }
}
