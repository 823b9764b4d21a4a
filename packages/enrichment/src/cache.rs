//! Process-wide memo of enriched descriptions keyed by listing id.
//!
//! Each id owns a [`OnceCell`] slot. Concurrent callers for the same id
//! wait on the single in-flight generation. A failed generation stores
//! nothing: the slot is dropped once no caller is waiting on it, and the
//! next caller retries.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;

use crate::EnrichmentError;
use crate::generator::DescriptionGenerator;

type Slot = Arc<OnceCell<String>>;

/// Memoizes enriched descriptions for the lifetime of the process.
#[derive(Debug, Default)]
pub struct DescriptionEnrichmentCache {
    slots: Mutex<BTreeMap<String, Slot>>,
}

impl DescriptionEnrichmentCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the enriched text for `id`, generating it from `raw` on
    /// first use.
    ///
    /// Once an id is enriched the stored text is returned as-is, even if
    /// `raw` differs from the text it was generated from.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichmentError::EmptyInput`] if the id is not yet
    /// enriched and `raw` is blank, or whatever error the generator
    /// reports. Nothing is stored on failure.
    pub async fn ensure_enriched(
        &self,
        id: &str,
        raw: &str,
        generator: &dyn DescriptionGenerator,
    ) -> Result<String, EnrichmentError> {
        let slot = self.slot(id);

        if let Some(text) = slot.get() {
            log::trace!("Enrichment cache hit for {id}");
            return Ok(text.clone());
        }

        let result = slot
            .get_or_try_init(|| async {
                if raw.trim().is_empty() {
                    return Err(EnrichmentError::EmptyInput);
                }
                log::debug!("Enriching description for {id}");
                generator.generate(raw).await
            })
            .await
            .cloned();

        if let Err(e) = &result {
            log::warn!("Enrichment failed for {id}: {e}");
            self.evict_if_empty(id, &slot);
        }

        result
    }

    /// Returns the stored text for `id`, if it has been enriched.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<String> {
        self.lock().get(id).and_then(|slot| slot.get().cloned())
    }

    /// Stores text that was enriched elsewhere.
    ///
    /// Returns `false` and keeps the existing text if `id` is already
    /// enriched.
    pub fn preload(&self, id: &str, text: impl Into<String>) -> bool {
        self.slot(id).set(text.into()).is_ok()
    }

    /// Number of enriched ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Whether no id has been enriched yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, id: &str) -> Slot {
        self.lock()
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Drops the slot for `id` if it is still empty and nobody else is
    /// waiting on it.
    fn evict_if_empty(&self, id: &str, slot: &Slot) {
        let mut slots = self.lock();
        // Clones are only taken under the lock: one for the map, one for us.
        let unused = slots.get(id).is_some_and(|current| {
            Arc::ptr_eq(current, slot) && !current.initialized() && Arc::strong_count(slot) == 2
        });
        if unused {
            slots.remove(id);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Slot>> {
        // No map operation can panic halfway, so a poisoned guard still
        // holds a consistent map.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
