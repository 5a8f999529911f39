//! Contract of the local variant store, plus an in-memory implementation.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use skuforge_core::VariantId;

use crate::code::normalize_code;
use crate::model::{LocalVariant, VariantUpdate};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("variant {0} not found")]
    NotFound(VariantId),

    #[error("update rejected: {0}")]
    Rejected(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Local persistence boundary. Each call stands alone; transactional
/// behaviour, if any, is the store's business.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Every variant whose code starts with `base_code` (normalized).
    async fn read_variants_by_base_code(&self, base_code: &str) -> Result<Vec<LocalVariant>, StoreError>;

    async fn update_variant(&self, id: VariantId, update: &VariantUpdate) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> LocalStore for Arc<S>
where
    S: LocalStore + ?Sized,
{
    async fn read_variants_by_base_code(&self, base_code: &str) -> Result<Vec<LocalVariant>, StoreError> {
        (**self).read_variants_by_base_code(base_code).await
    }

    async fn update_variant(&self, id: VariantId, update: &VariantUpdate) -> Result<(), StoreError> {
        (**self).update_variant(id, update).await
    }
}

/// In-memory local store for tests/dev.
///
/// Variants are returned in id order. Updates for ids registered through
/// [`fail_updates_for`](Self::fail_updates_for) are rejected.
///
/// Reads match on a raw normalized prefix, so a base code that is itself a
/// prefix of another (`N49` and `N497`) also returns the longer product's
/// variants. A sync of `N49` would then list them as missing upstream;
/// callers with overlapping base codes need a store that records the owning
/// template.
#[derive(Debug, Default)]
pub struct InMemoryLocalStore {
    variants: RwLock<BTreeMap<VariantId, LocalVariant>>,
    failing: RwLock<HashSet<VariantId>>,
    writes: AtomicUsize,
}

impl InMemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variants(variants: impl IntoIterator<Item = LocalVariant>) -> Self {
        let store = Self::new();
        for v in variants {
            store.insert(v);
        }
        store
    }

    pub fn insert(&self, variant: LocalVariant) {
        if let Ok(mut map) = self.variants.write() {
            map.insert(variant.id, variant);
        }
    }

    pub fn get(&self, id: VariantId) -> Option<LocalVariant> {
        let map = self.variants.read().ok()?;
        map.get(&id).cloned()
    }

    pub fn fail_updates_for(&self, id: VariantId) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(id);
        }
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocalStore for InMemoryLocalStore {
    async fn read_variants_by_base_code(&self, base_code: &str) -> Result<Vec<LocalVariant>, StoreError> {
        let prefix = normalize_code(base_code);
        let map = self
            .variants
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(map
            .values()
            .filter(|v| normalize_code(&v.default_code).starts_with(&prefix))
            .cloned()
            .collect())
    }

    async fn update_variant(&self, id: VariantId, update: &VariantUpdate) -> Result<(), StoreError> {
        let rejected = self
            .failing
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?
            .contains(&id);
        if rejected {
            return Err(StoreError::Rejected(format!("variant {id} is locked")));
        }

        let mut map = self
            .variants
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        let variant = map.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        update.apply_to(variant);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
