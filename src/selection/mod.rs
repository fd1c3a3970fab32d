//! Selection engine: which projected points fall inside a committed lasso
//!
//! # Submodules
//! - `polygon` - ray-casting point-in-polygon test
//! - `projection` - the projection provider seam and a glam camera projector
//! - `engine` - mask / index selection over a point cloud

mod engine;
mod polygon;
mod projection;

pub use engine::{select_indices, select_mask};
pub use polygon::point_in_polygon;
pub use projection::{CameraProjector, Projected, Projector};
