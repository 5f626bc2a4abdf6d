//! Host-side geometry staging and glTF loading.
//!
//! Geometry is staged on the CPU before anything touches the GPU, so it can be
//! validated and post-processed first:
//!
//! ```no_run
//! use spinview::RawGeometry;
//!
//! let mut geometry = RawGeometry::from_path("assets/model.glb")?;
//! geometry.recenter();
//! geometry.normalize();
//! # Ok::<(), spinview::LoadError>(())
//! ```
//!
//! # Supported Input
//!
//! | Format | Extensions       | Notes                                      |
//! |--------|------------------|--------------------------------------------|
//! | glTF   | `.gltf`, `.glb`  | Embedded, external or GLB-chunk buffers    |
//!
//! Every primitive of every mesh becomes one [`RawPrimitive`]:
//!
//! - `POSITION` is required and must be `VEC3` of `FLOAT`
//! - indices are required and must be `SCALAR` of unsigned byte, short or int;
//!   they are widened to `u32`
//! - `NORMAL`, `TEXCOORD_0` and `COLOR_0` are attached when present; an
//!   unusable layout is skipped with a warning and absent attributes stay zero
//!
//! Any failure aborts the whole load.

use crate::error::LoadError;
use crate::gpu::GpuContext;
use crate::math::Vec3;
use crate::mesh::{AttributeSlot, Primitive, Vertex};
use gltf::accessor::{DataType, Dimensions};
use std::path::Path;

/// One primitive's vertices and `u32` indices, before GPU upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawPrimitive {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl RawPrimitive {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Axis-aligned bounding box as `(min, max)`.
    ///
    /// An empty primitive yields `(+inf, -inf)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for v in &self.vertices {
            let p = Vec3::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }

        (min, max)
    }

    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            v.position = (Vec3::from(v.position) + offset).into();
        }
    }

    /// Scales all positions uniformly around the origin.
    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.vertices {
            v.position = (Vec3::from(v.position) * factor).into();
        }
    }

    /// Recomputes smooth vertex normals by averaging the area-weighted normals
    /// of every triangle sharing a vertex.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range for `vertices`.
    pub fn recalculate_normals(&mut self) {
        for v in &mut self.vertices {
            v.normal = [0.0; 3];
        }

        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];

            let p0 = Vec3::from(self.vertices[i0].position);
            let p1 = Vec3::from(self.vertices[i1].position);
            let p2 = Vec3::from(self.vertices[i2].position);
            let face_normal = (p1 - p0).cross(p2 - p0);

            for i in [i0, i1, i2] {
                let n = Vec3::from(self.vertices[i].normal) + face_normal;
                self.vertices[i].normal = n.into();
            }
        }

        for v in &mut self.vertices {
            v.normal = Vec3::from(v.normal).normalize_or_zero().into();
        }
    }

    /// Uploads this primitive into a new vertex/index buffer pair.
    pub fn upload(&self, gpu: &GpuContext) -> Primitive {
        Primitive::new(gpu, &self.vertices, &self.indices)
    }
}

/// Every primitive of a model, staged on the host.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawGeometry {
    pub primitives: Vec<RawPrimitive>,
}

impl From<RawPrimitive> for RawGeometry {
    fn from(primitive: RawPrimitive) -> Self {
        Self {
            primitives: vec![primitive],
        }
    }
}

impl RawGeometry {
    /// Reads and stages a `.gltf` or `.glb` file.
    ///
    /// External buffer URIs are resolved relative to the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("read {} ({} bytes)", path.display(), bytes.len());
        Self::parse(&bytes, path.parent())
    }

    /// Stages a glTF document held in memory.
    ///
    /// Only embedded (`data:`) buffers and the GLB binary chunk can be
    /// resolved; external buffer files fail with [`LoadError::BufferLoad`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        Self::parse(bytes, None)
    }

    fn parse(bytes: &[u8], base: Option<&Path>) -> Result<Self, LoadError> {
        let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes).map_err(parse_error)?;

        let buffers = gltf::import_buffers(&document, base, blob)
            .map_err(|e| LoadError::BufferLoad(e.to_string()))?;

        let mut primitives = Vec::new();
        for mesh in document.meshes() {
            for primitive in mesh.primitives() {
                let raw = read_primitive(mesh.index(), &primitive, &buffers)?;
                primitives.try_reserve(1)?;
                primitives.push(raw);
            }
        }

        if primitives.is_empty() {
            return Err(LoadError::Empty);
        }

        log::info!(
            "staged {} primitive(s), {} vertices, {} indices",
            primitives.len(),
            primitives.iter().map(|p| p.vertices.len()).sum::<usize>(),
            primitives.iter().map(|p| p.indices.len()).sum::<usize>(),
        );

        Ok(Self { primitives })
    }

    /// Bounding box over every primitive.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.primitives.iter().map(RawPrimitive::bounds).fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), (pmin, pmax)| (min.min(pmin), max.max(pmax)),
        )
    }

    pub fn center(&self) -> Vec3 {
        let (min, max) = self.bounds();
        (min + max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        let (min, max) = self.bounds();
        max - min
    }

    /// Moves the whole model so its bounding box is centered on the origin.
    pub fn recenter(&mut self) {
        let offset = -self.center();
        for p in &mut self.primitives {
            p.translate(offset);
        }
    }

    /// Scales the whole model so its largest extent is 1.
    pub fn normalize(&mut self) {
        let size = self.size();
        let max_dim = size.x.max(size.y).max(size.z);
        if max_dim > 0.0 && max_dim.is_finite() {
            for p in &mut self.primitives {
                p.scale(1.0 / max_dim);
            }
        }
    }

    pub fn recalculate_normals(&mut self) {
        for p in &mut self.primitives {
            p.recalculate_normals();
        }
    }

    pub fn index_count(&self) -> usize {
        self.primitives.iter().map(|p| p.indices.len()).sum()
    }

    /// Uploads every primitive; the result has one entry per primitive.
    pub fn upload(&self, gpu: &GpuContext) -> Vec<Primitive> {
        self.primitives.iter().map(|p| p.upload(gpu)).collect()
    }
}

fn parse_error(err: gltf::Error) -> LoadError {
    match err {
        gltf::Error::Validation(errors) => LoadError::Validation(
            errors
                .iter()
                .map(|(path, e)| format!("{path}: {e}"))
                .collect::<Vec<_>>()
                .join("; "),
        ),
        other => LoadError::Parse(other.to_string()),
    }
}

fn read_primitive(
    mesh: usize,
    primitive: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
) -> Result<RawPrimitive, LoadError> {
    let index = primitive.index();

    if primitive.mode() != gltf::mesh::Mode::Triangles {
        log::warn!(
            "mesh {mesh} primitive {index} uses {:?} topology; drawing it as triangles",
            primitive.mode()
        );
    }

    let invalid = |attribute: AttributeSlot, reason: String| LoadError::InvalidAttribute {
        mesh,
        primitive: index,
        attribute,
        reason,
    };

    let position = primitive
        .get(&gltf::Semantic::Positions)
        .ok_or(LoadError::MissingPosition {
            mesh,
            primitive: index,
        })?;
    if position.dimensions() != Dimensions::Vec3 || position.data_type() != DataType::F32 {
        return Err(invalid(
            AttributeSlot::Position,
            format!(
                "must be Vec3 of F32, found {:?} of {:?}",
                position.dimensions(),
                position.data_type()
            ),
        ));
    }
    let vertex_count = position.count();

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let positions = reader.read_positions().ok_or_else(|| {
        invalid(
            AttributeSlot::Position,
            "data lies outside its buffer".to_string(),
        )
    })?;
    let mut vertices = Vec::new();
    vertices.try_reserve_exact(vertex_count)?;
    vertices.extend(positions.map(Vertex::from_position));

    let index_accessor = primitive.indices().ok_or(LoadError::MissingIndices {
        mesh,
        primitive: index,
    })?;
    let invalid_indices = |reason: String| LoadError::InvalidIndices {
        mesh,
        primitive: index,
        reason,
    };
    if index_accessor.dimensions() != Dimensions::Scalar
        || !matches!(
            index_accessor.data_type(),
            DataType::U8 | DataType::U16 | DataType::U32
        )
    {
        return Err(invalid_indices(format!(
            "must be Scalar of U8, U16 or U32, found {:?} of {:?}",
            index_accessor.dimensions(),
            index_accessor.data_type()
        )));
    }
    let read_indices = reader
        .read_indices()
        .ok_or_else(|| invalid_indices("data lies outside its buffer".to_string()))?;
    let mut indices = Vec::new();
    indices.try_reserve_exact(index_accessor.count())?;
    indices.extend(read_indices.into_u32());
    if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
        return Err(invalid_indices(format!(
            "reference vertex {bad} but only {} exist",
            vertices.len()
        )));
    }

    const FLOAT: &[DataType] = &[DataType::F32];
    const FLOAT_OR_NORM: &[DataType] = &[DataType::F32, DataType::U8, DataType::U16];

    if attribute_usable(
        primitive,
        mesh,
        vertex_count,
        gltf::Semantic::Normals,
        AttributeSlot::Normal,
        &[(Dimensions::Vec3, FLOAT)],
    ) {
        if let Some(normals) = reader.read_normals() {
            for (v, n) in vertices.iter_mut().zip(normals) {
                v.normal = n;
            }
        }
    }

    if attribute_usable(
        primitive,
        mesh,
        vertex_count,
        gltf::Semantic::TexCoords(0),
        AttributeSlot::TexCoord,
        &[(Dimensions::Vec2, FLOAT_OR_NORM)],
    ) {
        if let Some(uvs) = reader.read_tex_coords(0) {
            for (v, uv) in vertices.iter_mut().zip(uvs.into_f32()) {
                v.uv = uv;
            }
        }
    }

    if attribute_usable(
        primitive,
        mesh,
        vertex_count,
        gltf::Semantic::Colors(0),
        AttributeSlot::Color,
        &[(Dimensions::Vec3, FLOAT_OR_NORM), (Dimensions::Vec4, FLOAT_OR_NORM)],
    ) {
        if let Some(colors) = reader.read_colors(0) {
            for (v, c) in vertices.iter_mut().zip(colors.into_rgba_f32()) {
                v.color = c;
            }
        }
    }

    log::trace!(
        "mesh {mesh} primitive {index}: {} vertices, {} indices",
        vertices.len(),
        indices.len()
    );

    Ok(RawPrimitive::new(vertices, indices))
}

/// Whether an optional attribute is present with a layout and count we can read.
fn attribute_usable(
    primitive: &gltf::Primitive<'_>,
    mesh: usize,
    vertex_count: usize,
    semantic: gltf::Semantic,
    slot: AttributeSlot,
    accepted: &[(Dimensions, &[DataType])],
) -> bool {
    let Some(accessor) = primitive.get(&semantic) else {
        return false;
    };
    let index = primitive.index();

    let layout_ok = accepted
        .iter()
        .any(|(dims, types)| accessor.dimensions() == *dims && types.contains(&accessor.data_type()));
    if !layout_ok {
        log::warn!(
            "mesh {mesh} primitive {index}: skipping {slot}, unsupported layout {:?} of {:?}",
            accessor.dimensions(),
            accessor.data_type()
        );
        return false;
    }
    if accessor.count() != vertex_count {
        log::warn!(
            "mesh {mesh} primitive {index}: skipping {slot}, {} values for {vertex_count} vertices",
            accessor.count()
        );
        return false;
    }
    true
}
