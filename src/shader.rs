//! Shader programs loaded from WGSL files.
//!
//! A [`Shader`] is a vertex module and a fragment module linked into one
//! render pipeline. The vertex stage must export `vs_main` and read its
//! inputs from the [`AttributeSlot`](crate::AttributeSlot) locations; the
//! fragment stage must export `fs_main`. Both stages see the renderer's bind
//! groups (camera at group 0, model at group 1).
//!
//! Compilation and linking problems are caught with wgpu validation error
//! scopes and reported as [`ShaderError::Compile`] and [`ShaderError::Link`]
//! instead of aborting the process.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ShaderError, ShaderStage};
use crate::gpu::GpuContext;
use crate::mesh::Vertex;
use crate::render::{DEPTH_FORMAT, Renderer};

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// WGSL source text together with the file it came from.
#[derive(Clone, Debug)]
pub struct ShaderSource {
    path: PathBuf,
    source: String,
}

impl ShaderSource {
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref().to_path_buf();
        let source = fs::read_to_string(&path).map_err(|source| ShaderError::LoadFile {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, source })
    }

    /// Wraps source text that did not come from disk; `name` stands in for
    /// the path in error messages.
    pub fn inline(name: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            path: name.into(),
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A linked vertex + fragment program.
///
/// Shared between models through `Rc`; the pipeline is released when the last
/// reference drops.
#[derive(Debug)]
pub struct Shader {
    pipeline: wgpu::RenderPipeline,
}

impl Shader {
    /// Reads, compiles and links the two stage files.
    pub fn load(
        gpu: &GpuContext,
        renderer: &Renderer,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let vertex = ShaderSource::read(vertex_path)?;
        let fragment = ShaderSource::read(fragment_path)?;
        Self::from_sources(gpu, renderer, &vertex, &fragment)
    }

    pub fn from_sources(
        gpu: &GpuContext,
        renderer: &Renderer,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> Result<Self, ShaderError> {
        let vs = compile(gpu, ShaderStage::Vertex, vertex)?;
        let fs = compile(gpu, ShaderStage::Fragment, fragment)?;
        let pipeline = link(gpu, renderer, &vs, &fs)?;

        log::info!(
            "linked shader program {} + {}",
            vertex.path().display(),
            fragment.path().display()
        );

        Ok(Self { pipeline })
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

fn compile(
    gpu: &GpuContext,
    stage: ShaderStage,
    source: &ShaderSource,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let label = source.path().display().to_string();

    gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = gpu
        .device
        .create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Wgsl(source.source().into()),
        });

    match pollster::block_on(gpu.device.pop_error_scope()) {
        Some(err) => Err(ShaderError::Compile {
            stage,
            path: source.path().to_path_buf(),
            message: err.to_string(),
        }),
        None => {
            log::debug!("compiled {stage} shader {label}");
            Ok(module)
        }
    }
}

fn link(
    gpu: &GpuContext,
    renderer: &Renderer,
    vs: &wgpu::ShaderModule,
    fs: &wgpu::ShaderModule,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    let device = &gpu.device;

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Shader Pipeline Layout"),
        bind_group_layouts: &renderer.bind_group_layouts(),
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Shader Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: vs,
            entry_point: Some(VERTEX_ENTRY),
            buffers: &[Vertex::LAYOUT],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: fs,
            entry_point: Some(FRAGMENT_ENTRY),
            targets: &[Some(wgpu::ColorTargetState {
                format: gpu.format(),
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // No culling: glTF assets do not agree on winding.
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(ShaderError::Link(err.to_string())),
        None => Ok(pipeline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatusCode;

    #[test]
    fn missing_file_reports_load_failure() {
        let err = ShaderSource::read("no/such/shader.wgsl").unwrap_err();
        assert!(matches!(err, ShaderError::LoadFile { .. }));
        assert_eq!(err.status(), StatusCode::CannotLoadFile);
        assert!(err.to_string().contains("no/such/shader.wgsl"));
    }

    #[test]
    fn bundled_shaders_declare_expected_entry_points() {
        let vs = ShaderSource::read(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/def_vs.wgsl")).unwrap();
        let fs = ShaderSource::read(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/def_fs.wgsl")).unwrap();
        assert!(vs.source().contains(&format!("fn {VERTEX_ENTRY}(")));
        assert!(fs.source().contains(&format!("fn {FRAGMENT_ENTRY}(")));
    }

    #[test]
    fn inline_source_keeps_its_name() {
        let src = ShaderSource::inline("builtin.wgsl", "@vertex fn vs_main() {}");
        assert_eq!(src.path(), Path::new("builtin.wgsl"));
        assert!(src.source().starts_with("@vertex"));
    }
}
