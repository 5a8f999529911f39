//! Time-bounded memo of template-code to template-id lookups.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use skuforge_core::TemplateId;

use crate::code::normalize_code;

#[derive(Debug, Clone, Copy)]
struct Entry {
    template_id: TemplateId,
    inserted_at: Instant,
}

/// Template-id cache keyed by normalized code. Entries expire after `ttl`.
///
/// Shared between sync runs through an `Arc`; a poisoned lock is recovered
/// since entries are plain values.
#[derive(Debug)]
pub struct TemplateIdCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl TemplateIdCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached id for `code`, if present and not expired. Expired entries are
    /// evicted on access.
    pub fn get(&self, code: &str) -> Option<TemplateId> {
        let key = normalize_code(code);
        let mut entries = self.lock();
        match entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.template_id),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, code: &str, template_id: TemplateId) {
        self.lock().insert(
            normalize_code(code),
            Entry {
                template_id,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, code: &str) {
        self.lock().remove(&normalize_code(code));
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
