//! objview core library - geometry ingestion and per-frame transforms
//!
//! This library turns OBJ text into welded, GPU-ready vertex and index
//! buffers and composes the per-frame matrices and uniform block that a
//! rendering backend uploads. It owns no GPU or window resources.

pub mod builder;
pub mod color;
pub mod composer;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod linalg;
pub mod obj;
pub mod projection;
pub mod transform;
pub mod uniforms;

// Re-export commonly used types
pub use color::Rgb;
pub use composer::{compose, FrameTransforms};
pub use config::ViewerConfig;
pub use error::{ConfigError, Error, ErrorKind, LinalgError, MeshError, Result};
pub use frame::{FrameLoop, FrameOutcome, RenderBackend};
pub use geometry::{BoundingBox, Mesh, MeshBounds, Vertex, VERTEX_STRIDE};
pub use input::OrbitController;
pub use linalg::Mat4;
pub use projection::{Projection, Viewport};
pub use transform::{LightParams, Material, TransformState};
pub use uniforms::{UniformBlock, UNIFORM_BLOCK_SIZE};
