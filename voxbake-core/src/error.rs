//! Error types for voxelization

use thiserror::Error;

/// Everything that can go wrong between reading a mesh and writing a grid.
#[derive(Error, Debug)]
pub enum VoxelError {
    #[error("line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("mesh has no vertices or no faces")]
    EmptyMesh,

    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    VertexIndex {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("voxel ({x}, {y}, {z}) lies outside the {world_size}^3 world grid")]
    OutOfRangeWrite {
        x: i64,
        y: i64,
        z: i64,
        world_size: usize,
    },

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("voxelization cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VoxelError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        VoxelError::Format {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VoxelError>;
