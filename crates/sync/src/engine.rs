//! Sync-by-code engine.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::Instrument;
use uuid::Uuid;

use skuforge_core::TemplateId;

use crate::cache::TemplateIdCache;
use crate::code::normalize_code;
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::model::{LocalVariant, RemoteVariant, SyncResult, VariantUpdate};
use crate::remote::RemoteCatalogClient;
use crate::store::LocalStore;

/// Cooperative cancellation token, observed between items only.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Pulls price, stock and remote id from the remote catalog into local
/// variants matched by normalized code.
///
/// Writes are issued one at a time, in local order.
pub struct VariantSync<R, S> {
    remote: R,
    store: S,
    template_ids: Arc<TemplateIdCache>,
    cancel: Option<CancelFlag>,
}

impl<R, S> VariantSync<R, S>
where
    R: RemoteCatalogClient,
    S: LocalStore,
{
    pub fn new(remote: R, store: S, config: &SyncConfig) -> Self {
        Self {
            remote,
            store,
            template_ids: Arc::new(TemplateIdCache::new(config.template_cache_ttl)),
            cancel: None,
        }
    }

    /// Share a template-id cache with other engines.
    pub fn with_template_cache(mut self, cache: Arc<TemplateIdCache>) -> Self {
        self.template_ids = cache;
        self
    }

    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn template_cache(&self) -> &Arc<TemplateIdCache> {
        &self.template_ids
    }

    /// Reconcile every local variant of `base_code` against its remote
    /// template.
    ///
    /// Fails only when a whole-run precondition fails (local read, template
    /// resolution, remote fetch); nothing is written in that case.
    pub async fn sync_product(&self, base_code: &str) -> Result<SyncResult, SyncError> {
        let run_id = Uuid::now_v7();
        let span = tracing::info_span!("variant_sync", %run_id, base_code);
        self.run_product(run_id, base_code).instrument(span).await
    }

    async fn run_product(&self, run_id: Uuid, base_code: &str) -> Result<SyncResult, SyncError> {
        let local = self.store.read_variants_by_base_code(base_code).await?;
        if local.is_empty() {
            tracing::info!("no local variants, nothing to do");
            return Ok(SyncResult::nothing_to_do(run_id).finish());
        }

        let template_id = self.resolve_template(base_code).await?;
        let remote = self
            .remote
            .fetch_variants_by_template_id(template_id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "remote fetch failed"))?;

        Ok(self.reconcile(run_id, &local, &remote).await)
    }

    /// Reconcile `local` against an already fetched `remote` set.
    pub async fn sync_by_code(&self, local: &[LocalVariant], remote: &[RemoteVariant]) -> SyncResult {
        let run_id = Uuid::now_v7();
        let span = tracing::info_span!("variant_sync", %run_id, base_code = tracing::field::Empty);
        if local.is_empty() {
            return SyncResult::nothing_to_do(run_id).finish();
        }
        self.reconcile(run_id, local, remote).instrument(span).await
    }

    async fn resolve_template(&self, base_code: &str) -> Result<TemplateId, SyncError> {
        if let Some(id) = self.template_ids.get(base_code) {
            tracing::debug!(template_id = %id, "template id cache hit");
            return Ok(id);
        }

        let id = self
            .remote
            .fetch_template_id_by_code(base_code)
            .await?
            .ok_or_else(|| SyncError::template_not_found(base_code))?;
        self.template_ids.insert(base_code, id);
        Ok(id)
    }

    async fn reconcile(&self, run_id: Uuid, local: &[LocalVariant], remote: &[RemoteVariant]) -> SyncResult {
        let mut result = SyncResult::new(run_id);
        tracing::info!(local = local.len(), remote = remote.len(), "sync started");

        // First remote record wins on duplicate codes.
        let mut by_code: HashMap<String, &RemoteVariant> = HashMap::with_capacity(remote.len());
        for r in remote {
            by_code.entry(normalize_code(&r.default_code)).or_insert(r);
        }
        let local_codes: HashSet<String> = local.iter().map(|v| normalize_code(&v.default_code)).collect();

        for r in remote {
            if !local_codes.contains(&normalize_code(&r.default_code)) {
                tracing::debug!(code = %r.default_code, "missing in local");
                result.missing_in_local.push(r.default_code.clone());
            }
        }

        let mut matched = Vec::new();
        for l in local {
            match by_code.get(&normalize_code(&l.default_code)) {
                Some(r) => matched.push((l, *r)),
                None => {
                    tracing::debug!(code = %l.default_code, "missing upstream");
                    result.missing_in_tpos.push(l.default_code.clone());
                }
            }
        }

        for (l, r) in matched {
            if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
                tracing::info!("sync cancelled");
                result.cancelled = true;
                break;
            }

            let update = VariantUpdate::between(l, r);
            if update.is_empty() {
                result.unchanged += 1;
                continue;
            }

            match self.store.update_variant(l.id, &update).await {
                Ok(()) => result.updated += 1,
                Err(e) => {
                    tracing::error!(variant_id = %l.id, code = %l.default_code, error = %e, "variant update failed");
                    result.errors.push(format!("{}: {e}", l.default_code));
                    result.skipped += 1;
                }
            }
        }

        tracing::info!(
            updated = result.updated,
            unchanged = result.unchanged,
            skipped = result.skipped,
            missing_in_local = result.missing_in_local.len(),
            missing_upstream = result.missing_in_tpos.len(),
            cancelled = result.cancelled,
            "sync finished"
        );
        result.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{InMemoryRemoteCatalog, RemoteError};
    use crate::store::InMemoryLocalStore;
    use skuforge_core::{RemoteVariantId, VariantId};

    fn local(id: i64, code: &str) -> LocalVariant {
        LocalVariant {
            id: VariantId::new(id),
            default_code: code.to_string(),
            price: 0.0,
            stock: 0.0,
            remote_id: None,
        }
    }

    fn remote(id: i64, code: &str) -> RemoteVariant {
        RemoteVariant {
            id: RemoteVariantId::new(id),
            default_code: code.to_string(),
            list_price: 199_000.0,
            qty_available: 4.0,
            virtual_available: 6.0,
        }
    }

    fn engine() -> VariantSync<Arc<InMemoryRemoteCatalog>, Arc<InMemoryLocalStore>> {
        VariantSync::new(
            Arc::new(InMemoryRemoteCatalog::new()),
            Arc::new(InMemoryLocalStore::new()),
            &SyncConfig::default(),
        )
    }

    #[tokio::test]
    async fn empty_local_set_is_nothing_to_do() {
        let result = engine().sync_by_code(&[], &[remote(1, "X")]).await;
        assert_eq!(result.skipped, 1);
        assert!(result.errors.is_empty());
        assert!(result.missing_in_local.is_empty());
    }

    #[tokio::test]
    async fn codes_match_after_normalization() {
        let store = Arc::new(InMemoryLocalStore::with_variants([local(1, "[n497d28] ")]));
        let sync = VariantSync::new(Arc::new(InMemoryRemoteCatalog::new()), store.clone(), &SyncConfig::default());

        let locals = [local(1, "[n497d28] ")];
        let result = sync.sync_by_code(&locals, &[remote(10, "N497D28")]).await;

        assert_eq!(result.updated, 1);
        assert!(result.missing_in_local.is_empty());
        assert!(result.missing_in_tpos.is_empty());
        let stored = store.get(VariantId::new(1)).unwrap();
        assert_eq!(stored.price, 199_000.0);
        assert_eq!(stored.stock, 4.0);
        assert_eq!(stored.remote_id, Some(RemoteVariantId::new(10)));
    }

    #[tokio::test]
    async fn missing_codes_keep_original_spelling() {
        let result = engine()
            .sync_by_code(&[local(1, "[abc]")], &[remote(10, "xyz ")])
            .await;
        assert_eq!(result.missing_in_tpos, vec!["[abc]".to_string()]);
        assert_eq!(result.missing_in_local, vec!["xyz ".to_string()]);
        assert_eq!(result.updated, 0);
    }

    #[tokio::test]
    async fn unknown_template_fails_the_run() {
        let store = Arc::new(InMemoryLocalStore::with_variants([local(1, "N497D28")]));
        let sync = VariantSync::new(Arc::new(InMemoryRemoteCatalog::new()), store.clone(), &SyncConfig::default());

        let err = sync.sync_product("N497").await.unwrap_err();
        assert!(matches!(err, SyncError::TemplateNotFound(code) if code == "N497"));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn remote_error_converts_to_remote_fetch() {
        let remote = Arc::new(InMemoryRemoteCatalog::new());
        remote.fail_with(Some(RemoteError::Network("timeout".into())));
        let store = Arc::new(InMemoryLocalStore::with_variants([local(1, "N497D28")]));
        let sync = VariantSync::new(remote, store, &SyncConfig::default());

        let err = sync.sync_product("N497").await.unwrap_err();
        assert!(matches!(err, SyncError::RemoteFetch(RemoteError::Network(_))));
    }

    #[tokio::test]
    async fn pre_cancelled_run_writes_nothing() {
        let store = Arc::new(InMemoryLocalStore::with_variants([local(1, "A"), local(2, "B")]));
        let flag = CancelFlag::new();
        flag.cancel();
        let sync = VariantSync::new(Arc::new(InMemoryRemoteCatalog::new()), store.clone(), &SyncConfig::default())
            .with_cancel_flag(flag);

        let result = sync
            .sync_by_code(&[local(1, "A"), local(2, "B")], &[remote(10, "A"), remote(11, "B")])
            .await;

        assert!(result.cancelled);
        assert_eq!(result.updated, 0);
        assert_eq!(store.write_count(), 0);
    }
}
