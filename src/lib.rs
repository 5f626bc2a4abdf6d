//! # Spinview
//!
//! **A tiny glTF viewer that spins a model in front of a camera.**
//!
//! Spinview opens a window, loads a model and a pair of WGSL shaders from
//! disk, uploads the geometry once and redraws it every frame with a slowly
//! increasing rotation. The math, transform and camera stack is small and
//! self-contained.
//!
//! ## Quick Start
//!
//! ```no_run
//! use spinview::{AppConfig, LoadOptions, run};
//!
//! fn main() -> Result<(), spinview::AppError> {
//!     run(AppConfig::new()
//!         .title("Damaged Helmet")
//!         .model("assets/helmet.glb")
//!         .load_options(LoadOptions::fit())
//!         .spin_speed(0.8))
//! }
//! ```
//!
//! ## Pieces
//!
//! | Module        | Role                                                      |
//! |---------------|-----------------------------------------------------------|
//! | [`math`]      | `Vec2`/`Vec3`/`Vec4`/`Mat4` with projection builders      |
//! | [`Transform`] | scale, Euler angles and origin composed into a matrix     |
//! | [`Camera`]    | perspective or orthographic view of the scene             |
//! | [`RawGeometry`] | glTF parsing and host-side staging                      |
//! | [`Model`]     | uploaded primitives, a shared [`Shader`] and a transform  |
//! | [`Renderer`]  | uniforms, depth buffer and one draw per primitive         |
//!
//! Every fallible step returns a typed error whose
//! [`status`](AppError::status) is the process exit code.

mod app;
mod camera;
mod error;
mod geometry;
mod gpu;
pub mod math;
mod mesh;
mod model;
mod render;
mod shader;
mod transform;

pub use app::{AppConfig, AppContext, FrameClock, ModelSource, run};
pub use camera::{Camera, Projection};
pub use error::{AppError, GpuError, LoadError, ShaderError, ShaderStage, StatusCode};
pub use geometry::{RawGeometry, RawPrimitive};
pub use gpu::GpuContext;
pub use mesh::{AttributeSlot, Primitive, Vertex};
pub use model::{LoadOptions, Model};
pub use render::{CLEAR_COLOR, CameraUniforms, DEPTH_FORMAT, ModelUniforms, Renderer};
pub use shader::{FRAGMENT_ENTRY, Shader, ShaderSource, VERTEX_ENTRY};
pub use transform::Transform;

pub use math::{Mat4, Vec2, Vec3, Vec4};

// Re-export the windowing and GPU crates so callers can name their types.
pub use wgpu;
pub use winit;
