//! Pointer-driven lasso state machine
//!
//! ```text
//! Rotate ──set_mode(Lasso)──▶ Lasso(Idle) ──pointer_down──▶ Lasso(Drawing)
//!                                 ▲                              │ pointer_up
//!                                 └──── cancel / commit ─── Lasso(Ready)
//! ```

use log::debug;
use serde::Serialize;

use super::types::{
    InteractionMode, LassoKey, LassoPoint, LassoState, PointerInfo, Polygon, Viewport,
    MIN_LASSO_DIST_PX,
};

/// Result of a key press routed to the lasso
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Cancelled,
    /// Enter on a ready lasso; `None` when it was too short to enclose an area
    Committed(Option<Polygon>),
}

/// Interaction state, one per viewer
#[derive(Debug, Clone, Serialize)]
pub struct InteractionState {
    mode: InteractionMode,
    lasso: LassoState,
    #[serde(skip)]
    last_pointer: Option<PointerInfo>,
    viewport: Viewport,
    #[serde(skip)]
    min_spacing_px: f32,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::with_min_spacing(MIN_LASSO_DIST_PX)
    }

    /// State machine with a custom decimation distance in pointer pixels
    pub fn with_min_spacing(min_spacing_px: f32) -> Self {
        Self {
            mode: InteractionMode::Rotate,
            lasso: LassoState::Idle,
            last_pointer: None,
            viewport: Viewport::default(),
            min_spacing_px,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn lasso(&self) -> &LassoState {
        &self.lasso
    }

    pub fn last_pointer(&self) -> Option<&PointerInfo> {
        self.last_pointer.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_mode(&mut self, next: InteractionMode) {
        debug!("interaction mode -> {:?}", next);
        self.mode = next;
        if self.mode == InteractionMode::Rotate {
            self.lasso = LassoState::Idle;
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn pointer_down(&mut self, p: &PointerInfo) {
        if !matches!(self.mode, InteractionMode::Lasso { .. }) || !p.is_inside {
            return;
        }
        self.lasso = LassoState::Drawing {
            points: vec![LassoPoint::from(p)],
        };
    }

    pub fn pointer_move(&mut self, p: &PointerInfo) {
        self.last_pointer = Some(*p);

        if !matches!(self.mode, InteractionMode::Lasso { .. }) {
            return;
        }
        let LassoState::Drawing { points } = &mut self.lasso else {
            return;
        };
        let Some(last) = points.last() else {
            return;
        };
        if last.screen.distance_squared(p.screen) < self.min_spacing_px * self.min_spacing_px {
            return;
        }
        points.push(LassoPoint::from(p));
    }

    pub fn pointer_leave(&mut self) {
        self.last_pointer = None;
    }

    pub fn pointer_up(&mut self) {
        if let LassoState::Drawing { points } = &mut self.lasso {
            let points = std::mem::take(points);
            debug!("lasso ready with {} points", points.len());
            self.lasso = LassoState::Ready { points };
        }
    }

    pub fn cancel(&mut self) {
        self.lasso = LassoState::Idle;
    }

    /// Turn a ready lasso into a polygon.
    ///
    /// Returns `None` when there is no ready lasso or when it has fewer than
    /// three points; the latter still resets the lasso to `Idle`.
    pub fn commit(&mut self) -> Option<Polygon> {
        if !matches!(self.lasso, LassoState::Ready { .. }) {
            return None;
        }
        let lasso = std::mem::take(&mut self.lasso);
        let polygon = Polygon::from_lasso(lasso.points());
        if polygon.is_none() {
            debug!("discarding lasso with {} points", lasso.points().len());
        }
        polygon
    }

    pub fn handle_key(&mut self, key: LassoKey) -> KeyOutcome {
        match key {
            LassoKey::Escape => {
                self.cancel();
                KeyOutcome::Cancelled
            }
            LassoKey::Enter => KeyOutcome::Committed(self.commit()),
        }
    }
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new()
    }
}
