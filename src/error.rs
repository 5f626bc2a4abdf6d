//! Error types and the process exit status they map to.

use std::path::PathBuf;

use crate::mesh::AttributeSlot;

/// Process exit status. Every error in the crate reports one via `status()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StatusCode {
    Success = 0,
    CannotInitWindow = 1,
    CannotCreateWindow = 2,
    CannotInitGpu = 3,
    CannotLoadFile = 4,
    ShaderCompileError = 5,
    ShaderLinkError = 6,
    /// Reserved; nothing loads textures yet.
    CannotCreateTexture = 7,
    /// Reserved; nothing loads textures yet.
    CannotUploadTexture = 8,
    OutOfMemory = 9,
}

impl StatusCode {
    pub const fn exit_code(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StatusCode::Success => "success",
            StatusCode::CannotInitWindow => "cannot initialize windowing",
            StatusCode::CannotCreateWindow => "cannot create window",
            StatusCode::CannotInitGpu => "cannot initialize GPU",
            StatusCode::CannotLoadFile => "cannot load file",
            StatusCode::ShaderCompileError => "shader compile error",
            StatusCode::ShaderLinkError => "shader link error",
            StatusCode::CannotCreateTexture => "cannot create texture",
            StatusCode::CannotUploadTexture => "cannot upload texture",
            StatusCode::OutOfMemory => "out of memory",
        };
        f.write_str(name)
    }
}

/// Failures while bringing up the wgpu device and surface.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,
}

impl GpuError {
    pub fn status(&self) -> StatusCode {
        StatusCode::CannotInitGpu
    }
}

/// Pipeline stage a shader module belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader {}: {source}", path.display())]
    LoadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader {} failed to compile:\n{message}", path.display())]
    Compile {
        stage: ShaderStage,
        path: PathBuf,
        message: String,
    },

    #[error("failed to link shader program:\n{0}")]
    Link(String),
}

impl ShaderError {
    pub fn status(&self) -> StatusCode {
        match self {
            ShaderError::LoadFile { .. } => StatusCode::CannotLoadFile,
            ShaderError::Compile { .. } => StatusCode::ShaderCompileError,
            ShaderError::Link(_) => StatusCode::ShaderLinkError,
        }
    }
}

/// Failures while turning a glTF document into staged geometry.
///
/// A failed load never yields partial geometry.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse glTF document: {0}")]
    Parse(String),

    #[error("glTF document failed validation: {0}")]
    Validation(String),

    #[error("failed to load glTF buffers: {0}")]
    BufferLoad(String),

    #[error("mesh {mesh} primitive {primitive} has no POSITION attribute")]
    MissingPosition { mesh: usize, primitive: usize },

    #[error("mesh {mesh} primitive {primitive}: {attribute} {reason}")]
    InvalidAttribute {
        mesh: usize,
        primitive: usize,
        attribute: AttributeSlot,
        reason: String,
    },

    #[error("mesh {mesh} primitive {primitive} is not indexed")]
    MissingIndices { mesh: usize, primitive: usize },

    #[error("mesh {mesh} primitive {primitive}: indices {reason}")]
    InvalidIndices {
        mesh: usize,
        primitive: usize,
        reason: String,
    },

    #[error("out of memory while staging geometry")]
    OutOfMemory(#[from] std::collections::TryReserveError),

    #[error("glTF document contains no mesh primitives")]
    Empty,
}

impl LoadError {
    pub fn status(&self) -> StatusCode {
        match self {
            LoadError::OutOfMemory(_) => StatusCode::OutOfMemory,
            _ => StatusCode::CannotLoadFile,
        }
    }
}

/// Top-level failure of [`run`](crate::run).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to initialize event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("GPU ran out of memory while presenting a frame")]
    SurfaceOutOfMemory,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::EventLoop(_) => StatusCode::CannotInitWindow,
            AppError::Window(_) => StatusCode::CannotCreateWindow,
            AppError::Gpu(e) => e.status(),
            AppError::Shader(e) => e.status(),
            AppError::Load(e) => e.status(),
            AppError::SurfaceOutOfMemory => StatusCode::OutOfMemory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(StatusCode::Success.exit_code(), 0);
        assert_eq!(StatusCode::CannotLoadFile.exit_code(), 4);
        assert_eq!(StatusCode::ShaderLinkError.exit_code(), 6);
        assert_eq!(StatusCode::OutOfMemory.exit_code(), 9);
    }

    #[test]
    fn load_errors_map_to_statuses() {
        assert_eq!(LoadError::Empty.status(), StatusCode::CannotLoadFile);
        assert_eq!(
            LoadError::MissingPosition { mesh: 0, primitive: 1 }.status(),
            StatusCode::CannotLoadFile
        );

        let oom = Vec::<u8>::new().try_reserve_exact(usize::MAX).unwrap_err();
        let err = LoadError::from(oom);
        assert_eq!(err.status(), StatusCode::OutOfMemory);
        assert_eq!(AppError::from(err).status(), StatusCode::OutOfMemory);
    }

    #[test]
    fn shader_errors_map_to_statuses() {
        let compile = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            path: PathBuf::from("def_fs.wgsl"),
            message: "unknown identifier".into(),
        };
        assert_eq!(compile.status(), StatusCode::ShaderCompileError);
        assert!(compile.to_string().starts_with("fragment shader def_fs.wgsl"));
        assert_eq!(
            AppError::from(ShaderError::Link("x".into())).status(),
            StatusCode::ShaderLinkError
        );
        assert_eq!(AppError::SurfaceOutOfMemory.status(), StatusCode::OutOfMemory);
    }
}
