//! Quota-gated quote creation.
//!
//! Creating a quote first takes one unit of today's quota in a single locked
//! step, so concurrent callers sharing the stores cannot exceed the limit. A
//! denied request creates nothing and returns the numbers the upsell prompt
//! shows. If the quote then fails to save, the unit is given back.

use orcamento_core::{Admission, QuoteDocument, QuoteDraft, RemainingQuota};
use tracing::{info, warn};

use crate::entitlement_store::EntitlementStore;
use crate::error::StoreError;
use crate::quote_store::QuoteStore;

/// Result of a creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationOutcome {
    /// The quote was created and counted.
    Created(QuoteDocument),
    /// Daily limit reached; nothing was created.
    UpsellRequired {
        /// Quotes already created today.
        used: u32,
        /// Daily limit in force.
        limit: u32,
    },
}

impl CreationOutcome {
    /// Returns the created document, if any.
    pub fn document(&self) -> Option<&QuoteDocument> {
        match self {
            Self::Created(doc) => Some(doc),
            Self::UpsellRequired { .. } => None,
        }
    }
}

/// Ties the entitlement check to the quote collection.
pub struct QuoteCreator<'a> {
    entitlements: &'a EntitlementStore,
    quotes: &'a QuoteStore,
}

impl<'a> QuoteCreator<'a> {
    /// Creates a gate over the two stores.
    pub fn new(entitlements: &'a EntitlementStore, quotes: &'a QuoteStore) -> Self {
        Self {
            entitlements,
            quotes,
        }
    }

    /// Creates a quote if today's quota allows it.
    ///
    /// A failed quota write creates nothing. A failed quote write releases
    /// the unit taken for it before the error is returned.
    pub fn create(&self, draft: QuoteDraft) -> Result<CreationOutcome, StoreError> {
        let counted = match self.entitlements.try_consume()? {
            Admission::Denied { used, limit } => {
                info!(used, limit, "Creation denied, upsell required");
                return Ok(CreationOutcome::UpsellRequired { used, limit });
            }
            Admission::Granted { remaining } => !matches!(remaining, RemainingQuota::Unlimited),
        };

        match self.quotes.create(draft) {
            Ok(doc) => Ok(CreationOutcome::Created(doc)),
            Err(err) => {
                let released = if counted {
                    self.entitlements.release_usage()
                } else {
                    Ok(())
                };
                if let Err(release_err) = released {
                    warn!(error = %release_err, "Could not release quota after failed save");
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{KeyValueBackend, MemoryBackend};
    use crate::config::{QUOTA_KEY, QUOTES_KEY};
    use chrono::NaiveDate;
    use orcamento_core::{Client, DAILY_QUOTA_LIMIT, FixedClock};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Memory backend with slow reads and an optional key whose writes fail.
    #[derive(Default)]
    struct FlakyBackend {
        inner: MemoryBackend,
        read_delay: Option<Duration>,
        failing_key: Option<&'static str>,
    }

    impl KeyValueBackend for FlakyBackend {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            if let Some(delay) = self.read_delay {
                std::thread::sleep(delay);
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.failing_key == Some(key) {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<bool, StoreError> {
            self.inner.remove(key)
        }
    }

    fn stores_over(backend: FlakyBackend) -> (EntitlementStore, QuoteStore) {
        let backend = Arc::new(backend);
        let clock = Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()));
        (
            EntitlementStore::with_defaults(backend.clone(), clock.clone()),
            QuoteStore::new(backend, clock),
        )
    }

    fn stores() -> (EntitlementStore, QuoteStore) {
        stores_over(FlakyBackend::default())
    }

    #[test]
    fn test_denied_creation_creates_nothing() {
        let (entitlements, quotes) = stores();
        let creator = QuoteCreator::new(&entitlements, &quotes);

        for i in 0..DAILY_QUOTA_LIMIT {
            let outcome = creator.create(QuoteDraft::new(format!("Q{i}"), Client::new("C"))).unwrap();
            assert!(outcome.document().is_some());
        }

        let outcome = creator.create(QuoteDraft::new("extra", Client::new("C"))).unwrap();
        assert_eq!(
            outcome,
            CreationOutcome::UpsellRequired {
                used: DAILY_QUOTA_LIMIT,
                limit: DAILY_QUOTA_LIMIT
            }
        );
        assert_eq!(quotes.count().unwrap(), DAILY_QUOTA_LIMIT as usize);
    }

    #[test]
    fn test_premium_creation_is_not_counted() {
        let (entitlements, quotes) = stores();
        entitlements.activate_premium().unwrap();
        let creator = QuoteCreator::new(&entitlements, &quotes);

        for _ in 0..5 {
            assert!(creator.create(QuoteDraft::default()).unwrap().document().is_some());
        }
        assert_eq!(entitlements.used_quota().unwrap(), 0);
        assert_eq!(quotes.count().unwrap(), 5);
    }

    #[test]
    fn test_concurrent_creation_respects_limit() {
        let (entitlements, quotes) = stores_over(FlakyBackend {
            read_delay: Some(Duration::from_millis(5)),
            ..FlakyBackend::default()
        });
        let creator = QuoteCreator::new(&entitlements, &quotes);
        let created = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for i in 0..16 {
                let creator = &creator;
                let created = &created;
                scope.spawn(move || {
                    let draft = QuoteDraft::new(format!("Q{i}"), Client::new("C"));
                    if creator.create(draft).unwrap().document().is_some() {
                        created.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(created.load(Ordering::SeqCst), DAILY_QUOTA_LIMIT as usize);
        assert_eq!(quotes.count().unwrap(), DAILY_QUOTA_LIMIT as usize);
        assert_eq!(entitlements.used_quota().unwrap(), DAILY_QUOTA_LIMIT);
    }

    #[test]
    fn test_failed_quota_write_creates_nothing() {
        let (entitlements, quotes) = stores_over(FlakyBackend {
            failing_key: Some(QUOTA_KEY),
            ..FlakyBackend::default()
        });
        let creator = QuoteCreator::new(&entitlements, &quotes);

        for _ in 0..5 {
            assert!(creator.create(QuoteDraft::new("Q", Client::new("C"))).is_err());
        }
        assert_eq!(quotes.count().unwrap(), 0);
        assert_eq!(entitlements.used_quota().unwrap(), 0);
    }

    #[test]
    fn test_failed_quote_write_releases_quota() {
        let (entitlements, quotes) = stores_over(FlakyBackend {
            failing_key: Some(QUOTES_KEY),
            ..FlakyBackend::default()
        });
        let creator = QuoteCreator::new(&entitlements, &quotes);

        let err = creator.create(QuoteDraft::new("Q", Client::new("C"))).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(entitlements.used_quota().unwrap(), 0);
        assert_eq!(quotes.count().unwrap(), 0);
    }
}
