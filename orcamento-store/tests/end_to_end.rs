//! End-to-end quota scenario across a day boundary.

use chrono::{Duration, NaiveDate};
use orcamento_core::{Client, EntitlementRecord, FixedClock, QuoteDraft, QuoteStatus, RemainingQuota};
use orcamento_store::{CreationOutcome, EntitlementStore, MemoryBackend, QuoteCreator, QuoteStore};
use std::sync::Arc;

#[test]
fn test_fresh_install_to_premium() {
    let today = NaiveDate::from_ymd_opt(2024, 11, 20).unwrap();
    let backend = Arc::new(MemoryBackend::new());
    let clock = Arc::new(FixedClock::at_date(today));
    let store = EntitlementStore::with_defaults(backend.clone(), clock.clone());

    assert_eq!(store.read_record().unwrap(), EntitlementRecord::fresh(today));
    assert!(backend.is_empty());

    for _ in 0..3 {
        store.increment_usage().unwrap();
    }
    assert_eq!(store.used_quota().unwrap(), 3);
    assert!(!store.can_create().unwrap());

    store.activate_premium().unwrap();
    assert!(store.can_create().unwrap());
    assert_eq!(store.remaining_quota().unwrap(), RemainingQuota::Unlimited);
    assert_eq!(store.remaining_quota().unwrap().as_sentinel(), -1);
}

#[test]
fn test_upsell_then_next_day() {
    let backend = Arc::new(MemoryBackend::new());
    let clock = Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 11, 20).unwrap()));
    let entitlements = EntitlementStore::with_defaults(backend.clone(), clock.clone());
    let quotes = QuoteStore::new(backend, clock.clone());
    let creator = QuoteCreator::new(&entitlements, &quotes);

    let mut created = Vec::new();
    loop {
        match creator.create(QuoteDraft::new("Orçamento", Client::new("Cliente"))).unwrap() {
            CreationOutcome::Created(doc) => created.push(doc),
            CreationOutcome::UpsellRequired { used, limit } => {
                assert_eq!((used, limit), (3, 3));
                break;
            }
        }
    }
    assert_eq!(created.len(), 3);

    // Viewing and editing never touch the quota.
    quotes.set_status(created[0].id, QuoteStatus::Approved).unwrap();
    quotes.set_status(created[0].id, QuoteStatus::Cancelled).unwrap();
    assert_eq!(entitlements.used_quota().unwrap(), 3);

    clock.advance(Duration::days(1));
    assert!(entitlements.can_create().unwrap());
    assert_eq!(entitlements.remaining_quota().unwrap(), RemainingQuota::Limited(3));
    assert!(creator.create(QuoteDraft::default()).unwrap().document().is_some());
    assert_eq!(quotes.count().unwrap(), 4);
}
