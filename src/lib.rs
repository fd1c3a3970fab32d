//! Lasso labelling for interactive 3D scatter plots
//!
//! Pointer events drive a lasso state machine; a committed lasso is turned
//! into a packed selection mask by projecting every point with the current
//! camera, and the mask is published through a reactive key/value store where
//! the labelling side applies it to its categorical codes.
//!
//! # Modules
//! - `codec` - byte views, packed masks, base64 transport
//! - `interaction` - lasso state machine
//! - `selection` - projection and point-in-polygon selection
//! - `commit` - commit protocol and optimistic local mutation
//! - `store` - reactive store contract and an in-memory store
//! - `category` - store-side label table and codes
//! - `palette` - per-point colours
//! - `config` - TOML configuration
//! - `server` - JSON-lines session server

pub mod category;
pub mod codec;
pub mod commit;
pub mod config;
pub mod error;
pub mod interaction;
pub mod palette;
pub mod selection;
pub mod server;
pub mod store;

pub use category::{Category, MissingLabelPolicy};
pub use commit::{CommitProtocol, CommitReceipt, CommitRequest, CommitResult, CommitStatus, PreparedCommit};
pub use config::{MaskTransport, StoreKeys, ViewerConfig};
pub use error::{CategoryError, CodecError, CommitError, PaletteError};
pub use interaction::{InteractionMode, InteractionState, LassoState, Operation, PointerInfo, Polygon};
pub use selection::{select_indices, select_mask, CameraProjector, Projected, Projector};
pub use store::{InputMode, MemoryStore, ReactiveStore, StoreValue};
