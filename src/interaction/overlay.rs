//! Lasso outline for the 2D overlay surface

use glam::Vec2;
use serde::Serialize;

use super::state::InteractionState;
use super::types::{InteractionMode, LassoState};

/// Outline in backing-store pixels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPath {
    pub points: Vec<Vec2>,
    /// Ready lassos are drawn closed
    pub closed: bool,
}

impl InteractionState {
    /// Outline to stroke this frame, if any. Needs lasso mode and at least two
    /// recorded points.
    pub fn overlay_path(&self) -> Option<OverlayPath> {
        if !matches!(self.mode(), InteractionMode::Lasso { .. }) {
            return None;
        }
        let (points, closed) = match self.lasso() {
            LassoState::Idle => return None,
            LassoState::Drawing { points } => (points, false),
            LassoState::Ready { points } => (points, true),
        };
        if points.len() < 2 {
            return None;
        }

        let ratio = self.viewport().pixel_ratio;
        Some(OverlayPath {
            points: points.iter().map(|p| p.screen * ratio).collect(),
            closed,
        })
    }
}
