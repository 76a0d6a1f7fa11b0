//! Integration tests for core quota and quote types.

use chrono::{Duration, NaiveDate};
use orcamento_core::{
    Clock, DAILY_QUOTA_LIMIT, EntitlementRecord, FixedClock, QuoteDocument, QuoteDraft,
    QuoteStatus, RemainingQuota,
};

#[test]
fn test_record_across_midnight() {
    let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let mut record = EntitlementRecord::fresh(clock.today());
    record.count = DAILY_QUOTA_LIMIT;
    assert!(!record.can_create(DAILY_QUOTA_LIMIT));

    clock.advance(Duration::days(1));
    let view = record.rolled_over(clock.today());
    assert!(view.can_create(DAILY_QUOTA_LIMIT));
    assert_eq!(view.remaining(DAILY_QUOTA_LIMIT), RemainingQuota::Limited(DAILY_QUOTA_LIMIT));
}

#[test]
fn test_status_change_with_clock() {
    let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let doc = QuoteDocument::from_draft(QuoteDraft::default(), 1, clock.now());

    clock.advance(Duration::minutes(3));
    let declined = doc.with_status(QuoteStatus::Declined, clock.now());
    clock.advance(Duration::minutes(3));
    let reopened = declined.with_status(QuoteStatus::Open, clock.now());

    assert_eq!(reopened.status, QuoteStatus::Open);
    assert!(reopened.updated_at > declined.updated_at);
    assert_eq!(reopened.created_at, doc.created_at);
}
