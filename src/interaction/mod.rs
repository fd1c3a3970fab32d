//! Lasso interaction: pointer events in, committed polygons out
//!
//! # Submodules
//! - `types` - modes, lasso states, pointer samples and the `Polygon` value
//! - `state` - the state machine itself
//! - `overlay` - outline geometry for the 2D overlay

mod overlay;
mod state;
mod types;

pub use types::{
    InteractionMode,
    LassoKey,
    LassoPoint,
    LassoState,
    Operation,
    PointerInfo,
    Polygon,
    Viewport,
    MIN_LASSO_DIST_PX,
};

pub use state::{InteractionState, KeyOutcome};
pub use overlay::OverlayPath;
