/// Error types for the geometry and transform pipeline
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification used by callers to decide between aborting and
/// carrying on with the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed numeric or shape input. Never retried.
    Validation,
    /// Degenerate geometry: zero-length normals, empty meshes.
    Domain,
    /// Failed to read a mesh or config source.
    Io,
    /// Failure inside a single frame's composition or submission.
    Runtime,
}

/// Failures raised by the vector and matrix primitives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinalgError {
    #[error("{op}: {arg} must contain exactly {expected} elements, got {found}")]
    Shape {
        op: &'static str,
        arg: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{op}: {arg} element {index} must be finite, got {value}")]
    NonFinite {
        op: &'static str,
        arg: &'static str,
        index: usize,
        value: f32,
    },

    #[error("{op}: {arg} must be a finite number, got {value}")]
    Value {
        op: &'static str,
        arg: &'static str,
        value: f32,
    },

    #[error("{op}: {message}")]
    Range { op: &'static str, message: String },

    #[error("{op}: cannot normalize zero-length vector {vector:?}")]
    Domain { op: &'static str, vector: [f32; 3] },
}

impl LinalgError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LinalgError::Domain { .. } => ErrorKind::Domain,
            _ => ErrorKind::Validation,
        }
    }
}

/// Which per-corner attribute an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    Texcoord,
    Normal,
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Attribute::Position => "position",
            Attribute::Texcoord => "texcoord",
            Attribute::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Failures raised while parsing OBJ text or assembling the vertex buffer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: {attribute} index {index} is out of range for {len} entries")]
    IndexOutOfRange {
        line: usize,
        attribute: Attribute,
        index: i64,
        len: usize,
    },

    #[error("mesh is empty ({positions} positions, {triangles} triangles)")]
    Empty { positions: usize, triangles: usize },

    #[error("line {line}: degenerate face has no normal")]
    DegenerateFace {
        line: usize,
        #[source]
        source: LinalgError,
    },

    #[error("position {index} is not referenced by any face")]
    UnreferencedPosition { index: usize },

    #[error("normals around position {index} cancel out")]
    ZeroNormal {
        index: usize,
        #[source]
        source: LinalgError,
    },
}

impl MeshError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MeshError::Parse { .. } | MeshError::IndexOutOfRange { .. } => ErrorKind::Validation,
            MeshError::Empty { .. }
            | MeshError::DegenerateFace { .. }
            | MeshError::UnreferencedPosition { .. }
            | MeshError::ZeroNormal { .. } => ErrorKind::Domain,
        }
    }
}

/// Failures raised while loading a viewer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid color {value:?}: expected #rrggbb")]
    Color { value: String },
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Math(#[from] LinalgError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("render backend failed: {0}")]
    Backend(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io { .. } => ErrorKind::Io,
            Error::Mesh(e) => e.kind(),
            Error::Math(e) => e.kind(),
            Error::Config(ConfigError::Io { .. }) => ErrorKind::Io,
            Error::Config(_) => ErrorKind::Validation,
            Error::Backend(_) => ErrorKind::Runtime,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
