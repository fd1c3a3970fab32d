//! Value types for the lasso interaction

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Minimum pointer-pixel distance between recorded lasso points
pub const MIN_LASSO_DIST_PX: f32 = 2.0;

/// What a committed lasso does to the chosen label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Remove,
}

/// Pointer routing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InteractionMode {
    Rotate,
    Lasso { operation: Operation },
}

/// Pointer sample from the interactive surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInfo {
    /// Pointer position in surface pixels
    pub screen: Vec2,
    /// Same position in normalized device coordinates (-1..1, y up)
    pub ndc: Vec2,
    pub is_inside: bool,
}

impl PointerInfo {
    /// Build a sample from a pointer position relative to a surface of
    /// `width` x `height` pixels.
    pub fn from_surface(x: f32, y: f32, width: f32, height: f32) -> Self {
        let is_inside = x >= 0.0 && y >= 0.0 && x <= width && y <= height;

        let x01 = if width > 0.0 { x / width } else { 0.0 };
        let y01 = if height > 0.0 { y / height } else { 0.0 };

        Self {
            screen: Vec2::new(x, y),
            ndc: Vec2::new(x01 * 2.0 - 1.0, -(y01 * 2.0 - 1.0)),
            is_inside,
        }
    }
}

/// One recorded lasso vertex. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LassoPoint {
    pub ndc: Vec2,
    pub screen: Vec2,
}

impl From<&PointerInfo> for LassoPoint {
    fn from(p: &PointerInfo) -> Self {
        Self {
            ndc: p.ndc,
            screen: p.screen,
        }
    }
}

/// Lasso drawing progress
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LassoState {
    #[default]
    Idle,
    Drawing { points: Vec<LassoPoint> },
    Ready { points: Vec<LassoPoint> },
}

impl LassoState {
    pub fn points(&self) -> &[LassoPoint] {
        match self {
            LassoState::Idle => &[],
            LassoState::Drawing { points } | LassoState::Ready { points } => points,
        }
    }
}

/// Pixel ratio and backing-store size of the overlay surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pixel_ratio: f32,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            pixel_width: 1,
            pixel_height: 1,
        }
    }
}

/// Committed lasso outline in NDC, at least 3 vertices.
///
/// Only `InteractionState::commit` produces one.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl Polygon {
    pub(crate) fn from_lasso(points: &[LassoPoint]) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        Some(Self {
            vertices: points.iter().map(|p| p.ndc).collect(),
        })
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl AsRef<[Vec2]> for Polygon {
    fn as_ref(&self) -> &[Vec2] {
        &self.vertices
    }
}

/// Keys the lasso reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LassoKey {
    Escape,
    Enter,
}
