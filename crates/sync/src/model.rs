//! Variant projections exchanged with the remote catalog and the local store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use skuforge_core::{RemoteVariantId, VariantId};

/// Read-only projection of a variant in the authoritative remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteVariant {
    pub id: RemoteVariantId,
    pub default_code: String,
    pub list_price: f64,
    /// On-hand stock.
    pub qty_available: f64,
    /// Forecast stock (on hand plus incoming minus outgoing).
    pub virtual_available: f64,
}

/// A variant as held in the local store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalVariant {
    pub id: VariantId,
    pub default_code: String,
    pub price: f64,
    pub stock: f64,
    /// Id of the same variant in the remote catalog, once known.
    #[serde(default)]
    pub remote_id: Option<RemoteVariantId>,
}

/// Fields to overwrite on a local variant. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantUpdate {
    pub price: Option<f64>,
    pub stock: Option<f64>,
    pub remote_id: Option<RemoteVariantId>,
}

impl VariantUpdate {
    /// Only the canonical fields where `local` has drifted from `remote`.
    pub fn between(local: &LocalVariant, remote: &RemoteVariant) -> Self {
        Self {
            price: (local.price != remote.list_price).then_some(remote.list_price),
            stock: (local.stock != remote.qty_available).then_some(remote.qty_available),
            remote_id: (local.remote_id != Some(remote.id)).then_some(remote.id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.stock.is_none() && self.remote_id.is_none()
    }

    pub fn apply_to(&self, variant: &mut LocalVariant) {
        if let Some(price) = self.price {
            variant.price = price;
        }
        if let Some(stock) = self.stock {
            variant.stock = stock;
        }
        if let Some(remote_id) = self.remote_id {
            variant.remote_id = Some(remote_id);
        }
    }
}

/// Summary of one reconciliation run. Reported, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub run_id: Uuid,
    /// Local variants whose fields were written.
    pub updated: usize,
    /// Matched local variants already equal to the remote record.
    pub unchanged: usize,
    /// Failed writes, or `1` for a run with nothing to process.
    pub skipped: usize,
    pub errors: Vec<String>,
    /// Remote codes with no local counterpart (not yet imported).
    pub missing_in_local: Vec<String>,
    /// Local codes with no remote counterpart (not yet published upstream).
    #[serde(rename = "missingInTPOS")]
    pub missing_in_tpos: Vec<String>,
    /// The run stopped between items because it was cancelled.
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncResult {
    pub fn new(run_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            run_id,
            updated: 0,
            unchanged: 0,
            skipped: 0,
            errors: Vec::new(),
            missing_in_local: Vec::new(),
            missing_in_tpos: Vec::new(),
            cancelled: false,
            started_at: now,
            finished_at: now,
        }
    }

    /// Terminal result for a run with no local variants: `skipped = 1`, no
    /// errors.
    pub fn nothing_to_do(run_id: Uuid) -> Self {
        Self {
            skipped: 1,
            ..Self::new(run_id)
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }
}
