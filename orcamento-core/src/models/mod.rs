//! Domain models for Orçamento.
//!
//! ## Submodules
//!
//! - [`entitlement`] - Daily quota record and derived values
//! - [`quote`] - Quote documents, line items, clients
//! - [`status`] - Quote status labels

mod entitlement;
mod quote;
mod status;

pub use entitlement::{
    Admission, DAILY_QUOTA_LIMIT, EntitlementRecord, QuotaStatus, RemainingQuota,
    UNLIMITED_SENTINEL,
};
pub use quote::{Client, LineItem, PriceDisplay, QuoteDocument, QuoteDraft, QuoteId};
pub use status::QuoteStatus;
