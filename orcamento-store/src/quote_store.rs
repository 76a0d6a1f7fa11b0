//! Quote document collection.
//!
//! All quotes live in one JSON array under a fixed key. Every mutation loads
//! the array, changes it and writes it back while holding the store's lock.

use orcamento_core::{Clock, QuoteDocument, QuoteDraft, QuoteId, QuoteStatus};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::{KeyValueBackend, read_json, write_json};
use crate::config::{CorruptRecordPolicy, QUOTES_KEY};
use crate::error::StoreError;

/// Persistent collection of quote documents.
pub struct QuoteStore {
    backend: Arc<dyn KeyValueBackend>,
    clock: Arc<dyn Clock>,
    key: String,
    corrupt_records: CorruptRecordPolicy,
    write_lock: Mutex<()>,
}

impl QuoteStore {
    /// Creates a store over `backend` under the default key.
    pub fn new(backend: Arc<dyn KeyValueBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            key: QUOTES_KEY.to_string(),
            corrupt_records: CorruptRecordPolicy::default(),
            write_lock: Mutex::new(()),
        }
    }

    /// Uses a different storage key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Sets the handling of an unparsable collection.
    #[must_use]
    pub fn with_corrupt_policy(mut self, policy: CorruptRecordPolicy) -> Self {
        self.corrupt_records = policy;
        self
    }

    fn load_all(&self) -> Result<Vec<QuoteDocument>, StoreError> {
        match read_json(self.backend.as_ref(), &self.key) {
            Ok(docs) => Ok(docs.unwrap_or_default()),
            Err(err)
                if err.is_corrupt_data()
                    && self.corrupt_records == CorruptRecordPolicy::FailOpen =>
            {
                warn!(key = %self.key, error = %err, "Ignoring corrupt quote collection");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    fn save_all(&self, docs: &[QuoteDocument]) -> Result<(), StoreError> {
        write_json(self.backend.as_ref(), &self.key, &docs)?;
        debug!(key = %self.key, count = docs.len(), "Quote collection saved");
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All quotes, newest first.
    pub fn list(&self) -> Result<Vec<QuoteDocument>, StoreError> {
        let mut docs = self.load_all()?;
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.number.cmp(&a.number)));
        Ok(docs)
    }

    /// One quote by id.
    pub fn get(&self, id: QuoteId) -> Result<Option<QuoteDocument>, StoreError> {
        Ok(self.load_all()?.into_iter().find(|doc| doc.id == id))
    }

    /// One quote by id, or [`StoreError::QuoteNotFound`].
    pub fn require(&self, id: QuoteId) -> Result<QuoteDocument, StoreError> {
        self.get(id)?.ok_or(StoreError::QuoteNotFound(id))
    }

    /// Number of stored quotes.
    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.load_all()?.len())
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Creates an `Open` quote with the next display number and persists it.
    pub fn create(&self, draft: QuoteDraft) -> Result<QuoteDocument, StoreError> {
        let _guard = self.write_lock.lock();
        let mut docs = self.load_all()?;
        let number = docs.iter().map(|d| d.number).max().unwrap_or(0) + 1;

        let doc = QuoteDocument::from_draft(draft, number, self.clock.now());
        docs.push(doc.clone());
        self.save_all(&docs)?;

        info!(id = %doc.id, number, total = %doc.total, "Quote created");
        Ok(doc)
    }

    /// Inserts or replaces `doc` by id, with totals recomputed.
    pub fn save(&self, mut doc: QuoteDocument) -> Result<QuoteDocument, StoreError> {
        let _guard = self.write_lock.lock();
        doc.recompute_totals();

        let mut docs = self.load_all()?;
        match docs.iter_mut().find(|d| d.id == doc.id) {
            Some(slot) => *slot = doc.clone(),
            None => docs.push(doc.clone()),
        }
        self.save_all(&docs)?;

        debug!(id = %doc.id, "Quote saved");
        Ok(doc)
    }

    /// Changes the status of a stored quote and persists it.
    ///
    /// Any status may replace any other.
    pub fn set_status(&self, id: QuoteId, status: QuoteStatus) -> Result<QuoteDocument, StoreError> {
        let _guard = self.write_lock.lock();
        let mut docs = self.load_all()?;
        let slot = docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(StoreError::QuoteNotFound(id))?;

        let previous = slot.status;
        *slot = slot.with_status(status, self.clock.now());
        let updated = slot.clone();
        self.save_all(&docs)?;

        info!(id = %id, from = %previous, to = %status, "Quote status changed");
        Ok(updated)
    }

    /// Removes a quote. Returns true if it existed.
    pub fn delete(&self, id: QuoteId) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let mut docs = self.load_all()?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Ok(false);
        }
        self.save_all(&docs)?;
        info!(id = %id, "Quote deleted");
        Ok(true)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use chrono::{Duration, NaiveDate};
    use orcamento_core::{Client, FixedClock, LineItem};
    use rust_decimal::Decimal;

    fn fixture() -> (QuoteStore, Arc<FixedClock>) {
        let backend = Arc::new(MemoryBackend::new());
        let clock = Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()));
        (QuoteStore::new(backend, clock.clone()), clock)
    }

    fn draft(title: &str) -> QuoteDraft {
        QuoteDraft::new(title, Client::new("João"))
            .with_item(LineItem::new("Consultoria", Decimal::from(4), "h", Decimal::new(12050, 2)))
    }

    #[test]
    fn test_create_assigns_sequential_numbers() {
        let (store, clock) = fixture();
        let first = store.create(draft("A")).unwrap();
        clock.advance(Duration::minutes(1));
        let second = store.create(draft("B")).unwrap();

        assert_eq!(first.number, 1);
        assert_eq!(second.number, 2);
        assert_eq!(first.status, QuoteStatus::Open);
        assert_eq!(first.total, Decimal::new(48200, 2));
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_list_is_newest_first() {
        let (store, clock) = fixture();
        store.create(draft("old")).unwrap();
        clock.advance(Duration::hours(1));
        store.create(draft("new")).unwrap();

        let titles: Vec<_> = store.list().unwrap().into_iter().map(|d| d.title).collect();
        assert_eq!(titles, ["new", "old"]);
    }

    #[test]
    fn test_set_status_persists_and_refreshes_timestamp() {
        let (store, clock) = fixture();
        let doc = store.create(draft("A")).unwrap();

        for status in [
            QuoteStatus::InReview,
            QuoteStatus::Approved,
            QuoteStatus::Cancelled,
            QuoteStatus::Approved,
            QuoteStatus::Declined,
            QuoteStatus::Open,
        ] {
            let before = store.require(doc.id).unwrap();
            clock.advance(Duration::seconds(30));
            let updated = store.set_status(doc.id, status).unwrap();

            assert_eq!(updated.status, status);
            assert!(updated.updated_at > before.updated_at);
            assert_eq!(store.require(doc.id).unwrap(), updated);
        }
    }

    #[test]
    fn test_set_status_unknown_id() {
        let (store, _) = fixture();
        let missing = QuoteId::new();
        assert!(matches!(
            store.set_status(missing, QuoteStatus::Approved),
            Err(StoreError::QuoteNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_save_recomputes_totals() {
        let (store, _) = fixture();
        let mut doc = store.create(draft("A")).unwrap();
        doc.items.push(LineItem::new("Deslocamento", Decimal::ONE, "un", Decimal::from(50)));
        doc.total = Decimal::ZERO;

        let saved = store.save(doc).unwrap();
        assert_eq!(saved.total, Decimal::new(53200, 2));
        assert_eq!(store.require(saved.id).unwrap().total, saved.total);
    }

    #[test]
    fn test_delete() {
        let (store, _) = fixture();
        let doc = store.create(draft("A")).unwrap();
        assert!(store.delete(doc.id).unwrap());
        assert!(!store.delete(doc.id).unwrap());
        assert!(store.get(doc.id).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_collection_policies() {
        let clock = Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()));
        let backend = Arc::new(MemoryBackend::with_entry(QUOTES_KEY, r#"{"not":"an array"}"#));

        let strict = QuoteStore::new(backend.clone(), clock.clone());
        assert!(matches!(strict.list(), Err(StoreError::CorruptRecord { .. })));

        let lenient = QuoteStore::new(backend, clock).with_corrupt_policy(CorruptRecordPolicy::FailOpen);
        assert!(lenient.list().unwrap().is_empty());
    }
}
