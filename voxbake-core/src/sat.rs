//! Separating-axis test between a triangle and an axis-aligned box
use nalgebra::{Point3, Vector3};

use crate::geometry::Aabb;

/// Axes shorter than this are treated as non-separating.
pub const DEGENERATE_AXIS_LENGTH: f64 = 1.0e-6;

/// Closed projection interval on a candidate axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// True when the intervals share no point. Touching is overlap.
    pub fn is_disjoint(&self, other: &Interval) -> bool {
        self.max < other.min || other.max < self.min
    }
}

/// The 13 candidate axes, in test order: the box face normals, the
/// triangle normal, then each triangle edge crossed with each box axis.
pub fn candidate_axes(triangle: &[Point3<f64>; 3]) -> [Vector3<f64>; 13] {
    let [v0, v1, v2] = *triangle;
    let box_axes = [Vector3::x(), Vector3::y(), Vector3::z()];
    let edges = [v1 - v0, v2 - v1, v0 - v2];

    let mut axes = [Vector3::zeros(); 13];
    axes[..3].copy_from_slice(&box_axes);
    axes[3] = (v1 - v0).cross(&(v2 - v0));
    for (i, edge) in edges.iter().enumerate() {
        for (j, axis) in box_axes.iter().enumerate() {
            axes[4 + i * 3 + j] = edge.cross(axis);
        }
    }
    axes
}

pub fn project_triangle(triangle: &[Point3<f64>; 3], axis: &Vector3<f64>) -> Interval {
    let mut interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };
    for vertex in triangle {
        let d = vertex.coords.dot(axis);
        interval.min = interval.min.min(d);
        interval.max = interval.max.max(d);
    }
    interval
}

/// Project a box through its support points in direction `axis`.
pub fn project_box(aabb: &Aabb, axis: &Vector3<f64>) -> Interval {
    let mut interval = Interval { min: 0.0, max: 0.0 };
    for i in 0..3 {
        if axis[i] > 0.0 {
            interval.min += aabb.mins[i] * axis[i];
            interval.max += aabb.maxs[i] * axis[i];
        } else {
            interval.min += aabb.maxs[i] * axis[i];
            interval.max += aabb.mins[i] * axis[i];
        }
    }
    interval
}

/// Tests if a triangle intersects or touches a closed box.
pub fn triangle_intersects_box(triangle: &[Point3<f64>; 3], aabb: &Aabb) -> bool {
    for axis in candidate_axes(triangle) {
        let length = axis.norm();
        if length < DEGENERATE_AXIS_LENGTH {
            continue;
        }
        let axis = axis / length;

        let t = project_triangle(triangle, &axis);
        let b = project_box(aabb, &axis);
        if t.is_disjoint(&b) {
            return false;
        }
    }
    true
}
