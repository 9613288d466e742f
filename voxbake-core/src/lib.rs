//! voxbake core - mesh surface voxelization
//!
//! Turns an OBJ triangle mesh into a dense `0`/`1` occupancy grid placed
//! inside a larger world grid, using an exact triangle/box separating-axis
//! test on the voxels each triangle's bounding box covers.

pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod grid;
pub mod obj;
pub mod sat;
pub mod voxelize;

pub use nalgebra;

// Re-export commonly used types
pub use config::VoxelizeConfig;
pub use error::{Result, VoxelError};
pub use export::OutputFormat;
pub use geometry::{Aabb, Face, Mesh, Vertex};
pub use grid::OccupancyGrid;
pub use voxelize::{voxelize, voxelize_with, Observer, Silent};

#[cfg(feature = "parallel")]
pub use voxelize::voxelize_parallel;

/// Parse OBJ text and voxelize it in one step.
pub fn voxelize_obj(source: &str, config: &VoxelizeConfig) -> Result<OccupancyGrid> {
    let mesh = obj::parse_obj(source)?;
    voxelize(&mesh, config)
}
