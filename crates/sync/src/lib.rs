//! Reconciliation of local variants against the authoritative remote catalog.
//!
//! The engine fetches the remote variant set once, then walks local variants
//! sequentially, matching them by normalized code and writing price, stock
//! and remote id back through the [`LocalStore`]. Per-item failures are
//! recorded on the [`SyncResult`]; only whole-run preconditions fail the run.

pub mod cache;
pub mod code;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod remote;
pub mod store;

pub use cache::TemplateIdCache;
pub use code::normalize_code;
pub use config::SyncConfig;
pub use engine::{CancelFlag, VariantSync};
pub use error::SyncError;
pub use model::{LocalVariant, RemoteVariant, SyncResult, VariantUpdate};
pub use remote::{InMemoryRemoteCatalog, RemoteCatalogClient, RemoteError};
pub use store::{InMemoryLocalStore, LocalStore, StoreError};
