// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Orçamento Core
//!
//! Core types, models, and traits shared by the Orçamento crates.
//!
//! ## Key Types
//!
//! ### Entitlement
//! - [`EntitlementRecord`] - Persisted `{date, count, isPremium}` tuple
//! - [`RemainingQuota`] - Remaining creations, or unlimited
//! - [`QuotaStatus`] - Used/limit/remaining summary
//! - [`Admission`] - Outcome of asking for one creation
//!
//! ### Quotes
//! - [`QuoteDocument`] - A persisted quote
//! - [`QuoteDraft`] - Input for creating a quote
//! - [`QuoteStatus`] - Flat status label, any-to-any transitions
//!
//! ### Time
//! - [`Clock`] - Injectable time source

pub mod error;
pub mod models;
pub mod traits;

pub use error::CoreError;

pub use models::{
    // Entitlement
    Admission,
    DAILY_QUOTA_LIMIT,
    EntitlementRecord,
    QuotaStatus,
    RemainingQuota,
    UNLIMITED_SENTINEL,
    // Quotes
    Client,
    LineItem,
    PriceDisplay,
    QuoteDocument,
    QuoteDraft,
    QuoteId,
    QuoteStatus,
};

pub use traits::{Clock, FixedClock, SystemClock};
