//! Surface voxelization of a mesh into a world occupancy grid
//!
//! Each face's leading triangle is tested only against the local voxels its
//! own bounding box covers; hits are OR-ed into the world grid at the
//! configured placement.

use nalgebra::{Point3, Vector3};

use crate::config::VoxelizeConfig;
use crate::error::{Result, VoxelError};
use crate::geometry::{Aabb, Mesh};
use crate::grid::OccupancyGrid;
use crate::sat::triangle_intersects_box;

/// Receives per-face progress and may stop a run between faces.
pub trait Observer {
    /// Called after each face, skipped faces included.
    fn face_done(&mut self, completed: usize, total: usize);

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Observer that ignores progress and never cancels
pub struct Silent;

impl Observer for Silent {
    fn face_done(&mut self, _completed: usize, _total: usize) {}
}

/// Local voxel lattice laid over the mesh bounding box
#[derive(Debug, Clone, Copy)]
pub struct Lattice {
    pub bounds: Aabb,
    pub voxel_size: f64,
    pub resolution: usize,
}

impl Lattice {
    pub fn new(mesh: &Mesh, resolution: usize) -> Result<Self> {
        let bounds = Aabb::from_points(&mesh.vertices)?;
        Ok(Self {
            bounds,
            voxel_size: bounds.voxel_size(resolution),
            resolution,
        })
    }

    /// Local voxel index containing `coord` on `axis`, clamped to the lattice.
    fn index_of(&self, coord: f64, axis: usize) -> usize {
        let cell = ((coord - self.bounds.mins[axis]) / self.voxel_size).floor();
        let max = (self.resolution - 1) as f64;
        cell.clamp(0.0, max) as usize
    }

    /// Inclusive local voxel range covered by a triangle's bounding box.
    pub fn candidate_range(&self, triangle: &[Point3<f64>; 3]) -> (Vector3<usize>, Vector3<usize>) {
        let tri_box = Aabb::new(
            triangle[0].inf(&triangle[1]).inf(&triangle[2]),
            triangle[0].sup(&triangle[1]).sup(&triangle[2]),
        );
        let lo = Vector3::from_fn(|axis, _| self.index_of(tri_box.mins[axis], axis));
        let hi = Vector3::from_fn(|axis, _| self.index_of(tri_box.maxs[axis], axis));
        (lo, hi)
    }

    /// Mesh-space box of local voxel `cell`.
    pub fn voxel_box(&self, cell: Vector3<usize>) -> Aabb {
        let mins = self.bounds.mins + cell.map(|c| c as f64) * self.voxel_size;
        Aabb::cube(mins, self.voxel_size)
    }
}

/// Voxelize `mesh` into a fresh world grid.
pub fn voxelize(mesh: &Mesh, config: &VoxelizeConfig) -> Result<OccupancyGrid> {
    voxelize_with(mesh, config, &mut Silent)
}

/// Voxelize `mesh`, reporting to `observer` after every face.
pub fn voxelize_with(
    mesh: &Mesh,
    config: &VoxelizeConfig,
    observer: &mut dyn Observer,
) -> Result<OccupancyGrid> {
    let lattice = prepare(mesh, config)?;
    let mut grid = OccupancyGrid::new(config.world_size)?;
    let total = mesh.faces.len();

    for face in 0..total {
        if observer.is_cancelled() {
            log::info!("Voxelization cancelled after {} of {} faces", face, total);
            return Err(VoxelError::Cancelled);
        }
        mark_face(mesh, face, &lattice, config, &mut grid)?;
        observer.face_done(face + 1, total);
    }

    log::info!(
        "Voxelized {} faces into {} occupied cells",
        total,
        grid.occupied_count()
    );
    Ok(grid)
}

/// Voxelize `mesh` with faces split across the rayon thread pool.
///
/// Every worker fills a private grid; the grids are OR-merged, so the result
/// is byte-identical to [`voxelize`].
#[cfg(feature = "parallel")]
pub fn voxelize_parallel(mesh: &Mesh, config: &VoxelizeConfig) -> Result<OccupancyGrid> {
    use rayon::prelude::*;

    let lattice = prepare(mesh, config)?;
    let empty = OccupancyGrid::new(config.world_size)?;

    let grid = (0..mesh.faces.len())
        .into_par_iter()
        .try_fold(
            || empty.clone(),
            |mut grid, face| {
                mark_face(mesh, face, &lattice, config, &mut grid)?;
                Ok::<_, VoxelError>(grid)
            },
        )
        .try_reduce(
            || empty.clone(),
            |mut a, b| {
                a.merge(&b);
                Ok(a)
            },
        )?;

    log::info!(
        "Voxelized {} faces into {} occupied cells (parallel)",
        mesh.faces.len(),
        grid.occupied_count()
    );
    Ok(grid)
}

fn prepare(mesh: &Mesh, config: &VoxelizeConfig) -> Result<Lattice> {
    if mesh.vertices.is_empty() || mesh.faces.is_empty() {
        return Err(VoxelError::EmptyMesh);
    }
    let lattice = Lattice::new(mesh, config.resolution)?;
    log::debug!(
        "Bounds {:?}..{:?}, voxel size {}, origin {:?}",
        lattice.bounds.mins,
        lattice.bounds.maxs,
        lattice.voxel_size,
        config.origin()
    );
    Ok(lattice)
}

fn mark_face(
    mesh: &Mesh,
    face: usize,
    lattice: &Lattice,
    config: &VoxelizeConfig,
    grid: &mut OccupancyGrid,
) -> Result<()> {
    let Some(triangle) = mesh.triangle(face)? else {
        log::warn!(
            "Skipping face {} with {} vertices",
            face,
            mesh.faces[face].indices.len()
        );
        return Ok(());
    };

    let (lo, hi) = lattice.candidate_range(&triangle);
    log::trace!("Face {}: candidate voxels {:?}..={:?}", face, lo, hi);

    for y in lo.y..=hi.y {
        for z in lo.z..=hi.z {
            for x in lo.x..=hi.x {
                let local = Vector3::new(x, y, z);
                if triangle_intersects_box(&triangle, &lattice.voxel_box(local)) {
                    grid.set(config.to_world(local))?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::parse_obj;

    fn config(n: usize, wn: usize, center: i64) -> VoxelizeConfig {
        VoxelizeConfig::new(n, wn, Vector3::repeat(center)).unwrap()
    }

    struct Counter {
        calls: Vec<(usize, usize)>,
        cancel_after: Option<usize>,
    }

    impl Observer for Counter {
        fn face_done(&mut self, completed: usize, total: usize) {
            self.calls.push((completed, total));
        }

        fn is_cancelled(&self) -> bool {
            self.cancel_after.map_or(false, |n| self.calls.len() >= n)
        }
    }

    #[test]
    fn test_candidate_range_clamps() {
        let mesh = Mesh::cube(2.0);
        let lattice = Lattice::new(&mesh, 4).unwrap();
        assert_eq!(lattice.voxel_size, 0.5);

        // The +x face sits on the upper bound and clamps to N - 1
        let right = mesh.triangle(10).unwrap().unwrap();
        let (lo, hi) = lattice.candidate_range(&right);
        assert_eq!(lo, Vector3::new(3, 0, 0));
        assert_eq!(hi, Vector3::new(3, 3, 3));
    }

    #[test]
    fn test_voxel_box() {
        let lattice = Lattice::new(&Mesh::cube(2.0), 4).unwrap();
        let b = lattice.voxel_box(Vector3::new(1, 0, 3));
        assert_eq!(b.mins, Point3::new(-0.5, -1.0, 0.5));
        assert_eq!(b.maxs, Point3::new(0.0, -0.5, 1.0));
    }

    #[test]
    fn test_observer_sees_every_face() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nf 1 2\nf 3 2 1\n").unwrap();
        let mut counter = Counter {
            calls: Vec::new(),
            cancel_after: None,
        };
        voxelize_with(&mesh, &config(2, 2, 1), &mut counter).unwrap();
        assert_eq!(counter.calls, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_cancellation_between_faces() {
        let mesh = Mesh::cube(2.0);
        let mut counter = Counter {
            calls: Vec::new(),
            cancel_after: Some(2),
        };
        let result = voxelize_with(&mesh, &config(4, 4, 2), &mut counter);
        assert!(matches!(result, Err(VoxelError::Cancelled)));
        assert_eq!(counter.calls.len(), 2);
    }

    #[test]
    fn test_empty_inputs() {
        let no_faces = parse_obj("v 0 0 0\nv 1 1 1\n").unwrap();
        assert!(matches!(
            voxelize(&no_faces, &config(2, 2, 1)),
            Err(VoxelError::EmptyMesh)
        ));
        assert!(matches!(
            voxelize(&Mesh::new(), &config(2, 2, 1)),
            Err(VoxelError::EmptyMesh)
        ));
    }

    #[test]
    fn test_missing_vertex() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n").unwrap();
        assert!(matches!(
            voxelize(&mesh, &config(2, 2, 1)),
            Err(VoxelError::VertexIndex { face: 0, index: 8, .. })
        ));
    }

    #[test]
    fn test_placement_outside_world() {
        // Origin lands at -2, so the first hit is off the grid
        let result = voxelize(&Mesh::cube(2.0), &config(4, 4, 0));
        assert!(matches!(result, Err(VoxelError::OutOfRangeWrite { .. })));
    }

    #[test]
    fn test_placement_shifts_cells() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let grid = voxelize(&mesh, &VoxelizeConfig::new(2, 8, Vector3::new(5, 3, 2)).unwrap())
            .unwrap();
        // origin (4, 2, 1); local (0, 0, 0) is hit
        assert!(grid.is_occupied(Vector3::new(4, 2, 1)));
        assert!(!grid.is_occupied(Vector3::new(0, 0, 0)));
    }

    #[test]
    fn test_quad_uses_leading_triangle_only() {
        // The quad covers the full square but only (v0, v1, v2) is tested
        let source = "\
v 0 0 0
v 4 0 0
v 4 4 0
v 0 4 0
v 0 0 4
f 1 2 4 3
f 5 5 5
";
        let mesh = parse_obj(source).unwrap();
        let grid = voxelize(&mesh, &config(4, 4, 2)).unwrap();
        // Triangle (0,0) (4,0) (0,4): cell (3, 3) in the z = 0 layer is untouched
        assert!(grid.is_occupied(Vector3::new(0, 0, 0)));
        assert!(!grid.is_occupied(Vector3::new(3, 3, 0)));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let mesh = Mesh::cube(2.0);
        let config = config(4, 6, 3);
        let sequential = voxelize(&mesh, &config).unwrap();
        let parallel = voxelize_parallel(&mesh, &config).unwrap();
        assert_eq!(sequential, parallel);
    }
}
