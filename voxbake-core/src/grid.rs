//! Dense byte occupancy grid
use nalgebra::Vector3;

use crate::config::cell_count;
use crate::error::{Result, VoxelError};

pub const EMPTY: u8 = 0;
pub const OCCUPIED: u8 = 1;

/// A `world_size`^3 grid of `0`/`1` bytes in one allocation.
///
/// Cell `(x, y, z)` lives at `x + z * WN + y * WN * WN`, so `y` is the
/// slowest-varying axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    world_size: usize,
    cells: Vec<u8>,
}

impl OccupancyGrid {
    pub fn new(world_size: usize) -> Result<Self> {
        let count = cell_count(world_size)?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(count).map_err(|e| {
            VoxelError::InvalidGrid(format!("cannot allocate {world_size}^3 cells: {e}"))
        })?;
        cells.resize(count, EMPTY);
        Ok(Self { world_size, cells })
    }

    /// Load a grid from its raw byte layout.
    pub fn from_bytes(world_size: usize, bytes: Vec<u8>) -> Result<Self> {
        let expected = cell_count(world_size)?;
        if bytes.len() != expected {
            return Err(VoxelError::InvalidGrid(format!(
                "expected {expected} bytes for a {world_size}^3 grid, got {}",
                bytes.len()
            )));
        }
        if let Some(pos) = bytes.iter().position(|&b| b > OCCUPIED) {
            return Err(VoxelError::InvalidGrid(format!(
                "byte {pos} has value {}, expected 0 or 1",
                bytes[pos]
            )));
        }
        Ok(Self {
            world_size,
            cells: bytes,
        })
    }

    pub fn world_size(&self) -> usize {
        self.world_size
    }

    /// Linear address of a cell, or `None` when any axis leaves `[0, WN)`.
    pub fn address(&self, cell: Vector3<i64>) -> Option<usize> {
        let wn = self.world_size;
        let axis = |c: i64| usize::try_from(c).ok().filter(|&c| c < wn);
        let (x, y, z) = (axis(cell.x)?, axis(cell.y)?, axis(cell.z)?);
        Some(x + z * wn + y * wn * wn)
    }

    /// Mark a cell occupied. Setting an occupied cell again is a no-op.
    pub fn set(&mut self, cell: Vector3<i64>) -> Result<()> {
        let addr = self.address(cell).ok_or(VoxelError::OutOfRangeWrite {
            x: cell.x,
            y: cell.y,
            z: cell.z,
            world_size: self.world_size,
        })?;
        self.cells[addr] = OCCUPIED;
        Ok(())
    }

    /// Out-of-range cells read as empty.
    pub fn is_occupied(&self, cell: Vector3<i64>) -> bool {
        self.address(cell)
            .map_or(false, |addr| self.cells[addr] == OCCUPIED)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&b| b == OCCUPIED).count()
    }

    /// OR another grid of the same size into this one.
    pub fn merge(&mut self, other: &OccupancyGrid) {
        debug_assert_eq!(self.world_size, other.world_size);
        for (dst, src) in self.cells.iter_mut().zip(&other.cells) {
            *dst |= *src;
        }
    }

    /// Occupied cells in `x`-outer, `z`-middle, `y`-inner order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = Vector3<usize>> + '_ {
        let wn = self.world_size;
        (0..wn).flat_map(move |x| {
            (0..wn).flat_map(move |z| {
                (0..wn)
                    .filter(move |&y| self.cells[x + z * wn + y * wn * wn] == OCCUPIED)
                    .map(move |y| Vector3::new(x, y, z))
            })
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_layout() {
        let grid = OccupancyGrid::new(4).unwrap();
        assert_eq!(grid.address(Vector3::new(0, 0, 0)), Some(0));
        assert_eq!(grid.address(Vector3::new(1, 0, 0)), Some(1));
        assert_eq!(grid.address(Vector3::new(0, 0, 1)), Some(4));
        assert_eq!(grid.address(Vector3::new(0, 1, 0)), Some(16));
        assert_eq!(grid.address(Vector3::new(3, 3, 3)), Some(63));
        assert_eq!(grid.address(Vector3::new(4, 0, 0)), None);
        assert_eq!(grid.address(Vector3::new(0, -1, 0)), None);
    }

    #[test]
    fn test_new_rejects_huge_grids() {
        assert!(matches!(
            OccupancyGrid::new(1 << 21),
            Err(VoxelError::InvalidGrid(_))
        ));
        assert_eq!(OccupancyGrid::new(3).unwrap().as_bytes(), &[EMPTY; 27][..]);
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut grid = OccupancyGrid::new(3).unwrap();
        grid.set(Vector3::new(1, 2, 0)).unwrap();
        grid.set(Vector3::new(1, 2, 0)).unwrap();
        assert_eq!(grid.occupied_count(), 1);
        assert!(grid.is_occupied(Vector3::new(1, 2, 0)));
        assert_eq!(grid.as_bytes()[1 + 2 * 9], OCCUPIED);
    }

    #[test]
    fn test_set_out_of_range() {
        let mut grid = OccupancyGrid::new(3).unwrap();
        // x + z * WN would alias a valid address; the per-axis check catches it
        let err = grid.set(Vector3::new(3, 0, 0)).unwrap_err();
        assert!(matches!(
            err,
            VoxelError::OutOfRangeWrite { x: 3, y: 0, z: 0, world_size: 3 }
        ));
        assert!(grid.set(Vector3::new(0, 0, -1)).is_err());
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_merge_is_or() {
        let mut a = OccupancyGrid::new(2).unwrap();
        let mut b = OccupancyGrid::new(2).unwrap();
        a.set(Vector3::new(0, 0, 0)).unwrap();
        b.set(Vector3::new(0, 0, 0)).unwrap();
        b.set(Vector3::new(1, 1, 1)).unwrap();
        a.merge(&b);
        assert_eq!(a.occupied_count(), 2);
    }

    #[test]
    fn test_occupied_cells_order() {
        let mut grid = OccupancyGrid::new(2).unwrap();
        for cell in [[1, 0, 0], [0, 1, 0], [0, 0, 1], [0, 0, 0]] {
            grid.set(Vector3::from(cell)).unwrap();
        }
        let cells: Vec<_> = grid.occupied_cells().collect();
        assert_eq!(
            cells,
            vec![
                Vector3::new(0, 0, 0),
                Vector3::new(0, 1, 0),
                Vector3::new(0, 0, 1),
                Vector3::new(1, 0, 0),
            ]
        );
    }

    #[test]
    fn test_from_bytes_validates() {
        assert!(OccupancyGrid::from_bytes(2, vec![0; 7]).is_err());
        assert!(OccupancyGrid::from_bytes(2, vec![0, 0, 2, 0, 0, 0, 0, 0]).is_err());
        let grid = OccupancyGrid::from_bytes(2, vec![0, 1, 0, 0, 0, 0, 0, 1]).unwrap();
        assert!(grid.is_occupied(Vector3::new(1, 0, 0)));
        assert!(grid.is_occupied(Vector3::new(1, 1, 1)));
    }
}
