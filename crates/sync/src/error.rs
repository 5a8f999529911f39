use thiserror::Error;

use crate::remote::RemoteError;
use crate::store::StoreError;

/// Whole-run failures. Per-item write failures never surface here; they are
/// recorded on the [`SyncResult`](crate::SyncResult).
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote fetch failed: {0}")]
    RemoteFetch(#[from] RemoteError),

    #[error("local read failed: {0}")]
    LocalRead(#[from] StoreError),

    #[error("no remote template for code '{0}'")]
    TemplateNotFound(String),
}

impl SyncError {
    pub fn template_not_found(code: impl Into<String>) -> Self {
        Self::TemplateNotFound(code.into())
    }
}
