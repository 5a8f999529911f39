//! Contract of the authoritative remote catalog, plus an in-memory stand-in.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use skuforge_core::TemplateId;

use crate::code::normalize_code;
use crate::model::RemoteVariant;

/// Remote catalog failure. Opaque to the engine; transport, auth and backoff
/// belong to the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait RemoteCatalogClient: Send + Sync {
    async fn fetch_variants_by_template_id(
        &self,
        template_id: TemplateId,
    ) -> Result<Vec<RemoteVariant>, RemoteError>;

    /// `None` when no template carries `code`.
    async fn fetch_template_id_by_code(&self, code: &str) -> Result<Option<TemplateId>, RemoteError>;
}

#[async_trait]
impl<C> RemoteCatalogClient for Arc<C>
where
    C: RemoteCatalogClient + ?Sized,
{
    async fn fetch_variants_by_template_id(
        &self,
        template_id: TemplateId,
    ) -> Result<Vec<RemoteVariant>, RemoteError> {
        (**self).fetch_variants_by_template_id(template_id).await
    }

    async fn fetch_template_id_by_code(&self, code: &str) -> Result<Option<TemplateId>, RemoteError> {
        (**self).fetch_template_id_by_code(code).await
    }
}

/// In-memory remote catalog.
///
/// Intended for tests/dev. Counts calls so callers can assert on caching and
/// can be switched into a failing mode.
#[derive(Debug, Default)]
pub struct InMemoryRemoteCatalog {
    templates: RwLock<HashMap<String, TemplateId>>,
    variants: RwLock<HashMap<TemplateId, Vec<RemoteVariant>>>,
    failure: RwLock<Option<RemoteError>>,
    template_lookups: AtomicUsize,
    variant_fetches: AtomicUsize,
}

impl InMemoryRemoteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under `code` together with its variants.
    pub fn insert_template(&self, code: &str, template_id: TemplateId, variants: Vec<RemoteVariant>) {
        if let Ok(mut templates) = self.templates.write() {
            templates.insert(normalize_code(code), template_id);
        }
        self.set_variants(template_id, variants);
    }

    pub fn set_variants(&self, template_id: TemplateId, variants: Vec<RemoteVariant>) {
        if let Ok(mut map) = self.variants.write() {
            map.insert(template_id, variants);
        }
    }

    /// Make every subsequent call fail with `error` (`None` restores service).
    pub fn fail_with(&self, error: Option<RemoteError>) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = error;
        }
    }

    pub fn template_lookups(&self) -> usize {
        self.template_lookups.load(Ordering::SeqCst)
    }

    pub fn variant_fetches(&self) -> usize {
        self.variant_fetches.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), RemoteError> {
        let failure = self
            .failure
            .read()
            .map_err(|_| RemoteError::Other("lock poisoned".to_string()))?;
        match failure.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteCatalogClient for InMemoryRemoteCatalog {
    async fn fetch_variants_by_template_id(
        &self,
        template_id: TemplateId,
    ) -> Result<Vec<RemoteVariant>, RemoteError> {
        self.variant_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let map = self
            .variants
            .read()
            .map_err(|_| RemoteError::Other("lock poisoned".to_string()))?;
        Ok(map.get(&template_id).cloned().unwrap_or_default())
    }

    async fn fetch_template_id_by_code(&self, code: &str) -> Result<Option<TemplateId>, RemoteError> {
        self.template_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let templates = self
            .templates
            .read()
            .map_err(|_| RemoteError::Other("lock poisoned".to_string()))?;
        Ok(templates.get(&normalize_code(code)).copied())
    }
}
