//! Lasso selection over projected points
//!
//! Every point is projected and tested against the polygon: O(N·V) with no
//! acceleration structure. A lasso is a user-paced event, not a per-frame
//! cost, so a linear scan over up to ~10^6 points is fine.

use glam::{Vec2, Vec3};

use super::polygon::point_in_polygon;
use super::projection::Projector;
use crate::codec::PackedMask;

/// Indices of points that project inside `polygon`, skipping clipped ones
fn selected<'a, P>(polygon: &'a [Vec2], points: &'a [[f32; 3]], projector: &'a P) -> impl Iterator<Item = usize> + 'a
where
    P: Projector + ?Sized,
{
    points.iter().enumerate().filter_map(move |(i, &p)| {
        let projected = projector.project(Vec3::from_array(p));
        if projected.is_clipped() {
            return None;
        }
        point_in_polygon(projected.ndc(), polygon).then_some(i)
    })
}

/// Packed mask of the points inside `polygon`.
///
/// A polygon with fewer than three vertices yields an empty, zero-length mask.
pub fn select_mask<P>(polygon: &[Vec2], points: &[[f32; 3]], projector: &P) -> PackedMask
where
    P: Projector + ?Sized,
{
    if polygon.len() < 3 {
        return PackedMask::empty();
    }

    PackedMask::from_indices(points.len(), selected(polygon, points, projector))
}

/// Ascending indices of the points inside `polygon`
pub fn select_indices<P>(polygon: &[Vec2], points: &[[f32; 3]], projector: &P) -> Vec<usize>
where
    P: Projector + ?Sized,
{
    if polygon.len() < 3 {
        return Vec::new();
    }
    selected(polygon, points, projector).collect()
}
