//! Point-in-polygon classification in NDC space

use glam::Vec2;

/// Ray-casting parity test.
///
/// Edges are taken in the given order with the last vertex closing back to the
/// first. Points exactly on an edge or vertex may land on either side; the
/// result there follows the half-open `y` comparison of the crossing test and
/// is not meant to be exact. Fewer than three vertices never contain anything.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut previous = polygon[polygon.len() - 1];

    for &current in polygon {
        // Short-circuit keeps horizontal edges (equal y) out of the division
        let crosses = (current.y > point.y) != (previous.y > point.y)
            && point.x
                < (previous.x - current.x) * (point.y - current.y) / (previous.y - current.y)
                    + current.x;
        if crosses {
            inside = !inside;
        }
        previous = current;
    }

    inside
}
