//! Vertex format, GPU-resident sub-meshes and procedural shapes.
//!
//! - [`Vertex`]: the interleaved vertex every primitive is stored as
//! - [`AttributeSlot`]: the shader locations the vertex layout and the WGSL
//!   sources agree on
//! - [`Primitive`]: one vertex buffer plus one index buffer on the GPU
//!
//! # Vertex Layout
//!
//! Each vertex occupies 48 bytes:
//!
//! | Attribute | Format    | Offset | Shader Location            |
//! |-----------|-----------|--------|----------------------------|
//! | position  | Float32x3 | 0      | [`AttributeSlot::Position`] (0) |
//! | normal    | Float32x3 | 12     | [`AttributeSlot::Normal`] (1)   |
//! | uv        | Float32x2 | 24     | [`AttributeSlot::TexCoord`] (2) |
//! | color     | Float32x4 | 32     | [`AttributeSlot::Color`] (3)    |
//!
//! Attributes a source asset lacks are zero-filled, so shaders must treat a
//! zero normal or a zero color as "absent".

use crate::geometry::RawPrimitive;
use crate::gpu::GpuContext;
use crate::math::Vec3;

/// Shader input locations shared by [`Vertex::LAYOUT`] and the WGSL sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AttributeSlot {
    Position = 0,
    Normal = 1,
    TexCoord = 2,
    Color = 3,
}

impl AttributeSlot {
    pub const ALL: [AttributeSlot; 4] = [
        AttributeSlot::Position,
        AttributeSlot::Normal,
        AttributeSlot::TexCoord,
        AttributeSlot::Color,
    ];

    #[inline]
    pub const fn location(self) -> u32 {
        self as u32
    }

    /// The glTF attribute semantic this slot is filled from.
    pub const fn semantic_name(self) -> &'static str {
        match self {
            AttributeSlot::Position => "POSITION",
            AttributeSlot::Normal => "NORMAL",
            AttributeSlot::TexCoord => "TEXCOORD_0",
            AttributeSlot::Color => "COLOR_0",
        }
    }
}

impl std::fmt::Display for AttributeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.semantic_name())
    }
}

/// An interleaved vertex: position, normal, texture coordinate and RGBA color.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Vertex buffer layout built from [`AttributeSlot`] locations.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: AttributeSlot::Position.location(),
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: AttributeSlot::Normal.location(),
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: AttributeSlot::TexCoord.location(),
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: 32,
                shader_location: AttributeSlot::Color.location(),
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            position,
            normal,
            uv,
            color,
        }
    }

    /// A vertex with only a position; every other attribute is zero.
    pub fn from_position(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// One drawable sub-mesh living on the GPU.
///
/// Owns its vertex and index buffers; both are released when the primitive is
/// dropped. Indices are always `u32`.
#[derive(Debug)]
pub struct Primitive {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Primitive {
    /// Uploads `vertices` and `indices` into fresh GPU buffers.
    pub fn new(gpu: &GpuContext, vertices: &[Vertex], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Primitive Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Primitive Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Number of indices the draw call consumes.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

// Face colors for the procedural cube, in +Z, −Z, +Y, −Y, +X, −X order.
const CUBE_FACE_COLORS: [[f32; 4]; 6] = [
    [0.90, 0.30, 0.25, 1.0],
    [0.25, 0.60, 0.90, 1.0],
    [0.35, 0.85, 0.40, 1.0],
    [0.95, 0.80, 0.25, 1.0],
    [0.70, 0.40, 0.90, 1.0],
    [0.95, 0.55, 0.20, 1.0],
];

impl RawPrimitive {
    /// An axis-aligned cube centered at the origin with edge length `dim`.
    ///
    /// Every face has its own four vertices so normals stay flat, and its own
    /// color. Front faces wind counter-clockwise.
    pub fn cube(dim: f32) -> Self {
        let h = dim * 0.5;

        // (normal, tangent u, tangent v) per face; corners are n ± u ± v.
        let faces: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (face, (n, u, v)) in faces.into_iter().enumerate() {
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0f32, -1.0f32), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = (n + u * su + v * sv) * h;
                let uv = [(su + 1.0) * 0.5, (sv + 1.0) * 0.5];
                vertices.push(Vertex::new(
                    p.to_array(),
                    n.to_array(),
                    uv,
                    CUBE_FACE_COLORS[face],
                ));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self::new(vertices, indices)
    }

    /// A `size × size` square on the XZ plane facing +Y.
    pub fn plane(size: f32) -> Self {
        let half = size * 0.5;
        let up = [0.0, 1.0, 0.0];
        let white = [1.0; 4];
        let vertices = vec![
            Vertex::new([-half, 0.0, half], up, [0.0, 0.0], white),
            Vertex::new([half, 0.0, half], up, [1.0, 0.0], white),
            Vertex::new([half, 0.0, -half], up, [1.0, 1.0], white),
            Vertex::new([-half, 0.0, -half], up, [0.0, 1.0], white),
        ];

        Self::new(vertices, vec![0, 1, 2, 2, 3, 0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(raw: &RawPrimitive, tri: &[u32]) -> Vec3 {
        let p = |i: u32| Vec3::from(raw.vertices[i as usize].position);
        (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]))
    }

    #[test]
    fn vertex_is_48_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 48);
        assert_eq!(Vertex::LAYOUT.array_stride, 48);
    }

    #[test]
    fn layout_locations_follow_attribute_slots() {
        let locations: Vec<u32> = Vertex::LAYOUT
            .attributes
            .iter()
            .map(|a| a.shader_location)
            .collect();
        let expected: Vec<u32> = AttributeSlot::ALL.iter().map(|s| s.location()).collect();
        assert_eq!(locations, expected);
        assert_eq!(AttributeSlot::Color.to_string(), "COLOR_0");
    }

    #[test]
    fn cube_has_flat_faces_with_outward_winding() {
        let cube = RawPrimitive::cube(2.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);

        for tri in cube.indices.chunks(3) {
            let n = Vec3::from(cube.vertices[tri[0] as usize].normal);
            let geometric = face_normal(&cube, tri);
            assert!(geometric.dot(n) > 0.0, "triangle {tri:?} winds inward");
        }

        let (min, max) = cube.bounds();
        assert_eq!(min, Vec3::splat(-1.0));
        assert_eq!(max, Vec3::splat(1.0));
    }

    #[test]
    fn plane_faces_up() {
        let plane = RawPrimitive::plane(4.0);
        assert_eq!(plane.indices.len(), 6);
        for tri in plane.indices.chunks(3) {
            assert!(face_normal(&plane, tri).y > 0.0);
        }
        let (min, max) = plane.bounds();
        assert_eq!(min, Vec3::new(-2.0, 0.0, -2.0));
        assert_eq!(max, Vec3::new(2.0, 0.0, 2.0));
    }
}
