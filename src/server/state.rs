//! Session state owned by the server loop

use std::cell::Cell;
use std::rc::Rc;

use crate::category::Category;
use crate::commit::{CommitProtocol, CommitResult};
use crate::config::ViewerConfig;
use crate::interaction::InteractionState;
use crate::palette::Rgb;
use crate::selection::CameraProjector;
use crate::store::{change_event, MemoryStore, ReactiveStore, StoreValue, SubscriptionId};

/// Colour used for unassigned points when none is loaded
pub const DEFAULT_MISSING_COLOR: Rgb = [0.6, 0.6, 0.6];

/// Everything one viewer session needs: interaction, data, store and both
/// sides of the commit protocol
pub struct SessionState {
    pub config: ViewerConfig,
    pub interaction: InteractionState,
    pub projector: CameraProjector,
    pub positions: Vec<[f32; 3]>,
    pub category: Option<Category>,
    pub palette: Vec<Rgb>,
    pub missing_color: Rgb,
    pub store: MemoryStore,
    pub protocol: CommitProtocol,
    /// CSS pixel size of the interactive surface
    pub surface_size: (f32, f32),
    pub last_result: Option<CommitResult>,
    result_ready: Rc<Cell<bool>>,
    result_subscription: SubscriptionId,
}

impl SessionState {
    pub fn new(config: ViewerConfig) -> Self {
        let mut store = MemoryStore::new();
        let result_ready = Rc::new(Cell::new(false));
        let flag = Rc::clone(&result_ready);
        let result_subscription = store.subscribe(
            &change_event(&config.keys.lasso_result),
            Box::new(move |_: &StoreValue| flag.set(true)),
        );

        Self {
            interaction: InteractionState::with_min_spacing(config.min_lasso_spacing_px),
            projector: CameraProjector::default(),
            positions: Vec::new(),
            category: None,
            palette: Vec::new(),
            missing_color: DEFAULT_MISSING_COLOR,
            store,
            protocol: CommitProtocol::new(&config),
            surface_size: (1.0, 1.0),
            last_result: None,
            result_ready,
            result_subscription,
            config,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.category.is_some()
    }

    /// Whether a new `lasso_result_t` arrived since the last call
    pub fn take_result_ready(&self) -> bool {
        self.result_ready.replace(false)
    }

    /// Drop all loaded data and start over with the same config
    pub fn reset(&mut self) {
        self.store.unsubscribe(self.result_subscription);
        *self = Self::new(self.config.clone());
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}
