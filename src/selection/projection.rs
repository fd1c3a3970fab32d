//! Projection of 3D points into normalized device coordinates

use glam::{Mat4, Vec2, Vec3};

/// A projected point: NDC `x`, `y` and clip-space `depth`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl Projected {
    /// Outside the visible depth range [-1, 1] (NaN counts as clipped)
    pub fn is_clipped(&self) -> bool {
        !(-1.0..=1.0).contains(&self.depth)
    }

    pub fn ndc(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Anything that can project a world-space point with the current camera
pub trait Projector {
    fn project(&self, point: Vec3) -> Projected;
}

impl<F> Projector for F
where
    F: Fn(Vec3) -> Projected,
{
    fn project(&self, point: Vec3) -> Projected {
        self(point)
    }
}

/// Projector backed by a combined view-projection matrix with OpenGL depth
/// conventions (depth -1 at the near plane, 1 at the far plane).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraProjector {
    view_projection: Mat4,
}

impl CameraProjector {
    pub fn new(view_projection: Mat4) -> Self {
        Self { view_projection }
    }

    /// Perspective camera at `eye` looking at `target`, y up
    pub fn look_at(eye: Vec3, target: Vec3, fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let projection = Mat4::perspective_rh_gl(fov_y_radians, aspect, near, far);
        Self::new(projection * view)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }
}

impl Default for CameraProjector {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

impl Projector for CameraProjector {
    fn project(&self, point: Vec3) -> Projected {
        let ndc = self.view_projection.project_point3(point);
        Projected {
            x: ndc.x,
            y: ndc.y,
            depth: ndc.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_projection_passes_through() {
        let projector = CameraProjector::default();
        let p = projector.project(Vec3::new(0.25, -0.5, 0.0));
        assert_eq!(p.ndc(), Vec2::new(0.25, -0.5));
        assert!(!p.is_clipped());
        assert!(projector.project(Vec3::new(0.0, 0.0, 2.0)).is_clipped());
    }

    #[test]
    fn test_look_at_centers_target_and_clips_behind_camera() {
        let projector = CameraProjector::look_at(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::ZERO,
            45f32.to_radians(),
            1.0,
            0.1,
            100.0,
        );

        let center = projector.project(Vec3::ZERO);
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-6);
        assert!(!center.is_clipped());

        let right = projector.project(Vec3::new(1.0, 0.0, 0.0));
        assert!(right.x > 0.0);

        assert!(projector.project(Vec3::new(0.0, 0.0, 20.0)).is_clipped());
        assert!(projector.project(Vec3::new(0.0, 0.0, -200.0)).is_clipped());
    }

    #[test]
    fn test_nan_depth_is_clipped() {
        let p = Projected { x: 0.0, y: 0.0, depth: f32::NAN };
        assert!(p.is_clipped());
    }
}
