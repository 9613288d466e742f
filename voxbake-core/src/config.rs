//! Conversion parameters and the local-to-world grid mapping
use nalgebra::Vector3;

use crate::error::{Result, VoxelError};

/// Parameters of one mesh-to-grid conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelizeConfig {
    /// Local grid resolution `N` along the longest mesh axis
    pub resolution: usize,
    /// World grid edge length `WN`
    pub world_size: usize,
    /// World-grid cell the object's local grid is centered on
    pub center: Vector3<i64>,
}

impl VoxelizeConfig {
    pub fn new(resolution: usize, world_size: usize, center: Vector3<i64>) -> Result<Self> {
        if resolution == 0 {
            return Err(VoxelError::InvalidGrid("resolution must be at least 1".into()));
        }
        cell_count(world_size)?;
        Ok(Self {
            resolution,
            world_size,
            center,
        })
    }

    /// World-grid cell that local voxel `(0, 0, 0)` lands on.
    pub fn origin(&self) -> Vector3<i64> {
        let half = (self.resolution / 2) as i64;
        self.center - Vector3::repeat(half)
    }

    /// Map a local voxel to its world-grid cell.
    pub fn to_world(&self, local: Vector3<usize>) -> Vector3<i64> {
        self.origin() + local.map(|c| c as i64)
    }
}

/// Number of cells in a `world_size`^3 grid.
pub fn cell_count(world_size: usize) -> Result<usize> {
    if world_size == 0 {
        return Err(VoxelError::InvalidGrid("world size must be at least 1".into()));
    }
    world_size
        .checked_mul(world_size)
        .and_then(|area| area.checked_mul(world_size))
        .filter(|&cells| cells <= isize::MAX as usize)
        .ok_or_else(|| VoxelError::InvalidGrid(format!("{world_size}^3 cells overflow")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_centers_local_grid() {
        let config = VoxelizeConfig::new(4, 16, Vector3::new(8, 5, 2)).unwrap();
        assert_eq!(config.origin(), Vector3::new(6, 3, 0));
        assert_eq!(config.to_world(Vector3::new(3, 0, 1)), Vector3::new(9, 3, 1));

        // Odd resolutions round the half size down
        let config = VoxelizeConfig::new(5, 16, Vector3::new(8, 8, 8)).unwrap();
        assert_eq!(config.origin(), Vector3::new(6, 6, 6));
    }

    #[test]
    fn test_rejects_empty_grids() {
        assert!(VoxelizeConfig::new(0, 4, Vector3::zeros()).is_err());
        assert!(VoxelizeConfig::new(4, 0, Vector3::zeros()).is_err());
        assert!(cell_count(usize::MAX).is_err());
        // 2^63 cells fit in usize but not in an allocation
        assert!(cell_count(1 << 21).is_err());
        assert_eq!(cell_count(3).unwrap(), 27);
    }
}
