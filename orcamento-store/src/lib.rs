// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

//! # Orçamento Store
//!
//! Persistence for the Orçamento application.
//!
//! This crate provides:
//!
//! - **EntitlementStore**: Daily quota counter with premium demo controls
//! - **QuoteStore**: The persisted quote collection and its status changes
//! - **QuoteCreator**: Quota-gated quote creation
//! - **Backends**: In-memory and file-backed key-value storage
//! - **Config**: JSON configuration file
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use orcamento_core::{Client, QuoteDraft, SystemClock};
//! use orcamento_store::{CreationOutcome, EntitlementStore, FileBackend, QuoteCreator, QuoteStore};
//!
//! let backend = Arc::new(FileBackend::open("/tmp/orcamento")?);
//! let clock = Arc::new(SystemClock);
//! let entitlements = EntitlementStore::with_defaults(backend.clone(), clock.clone());
//! let quotes = QuoteStore::new(backend, clock);
//!
//! match QuoteCreator::new(&entitlements, &quotes).create(QuoteDraft::new("Site", Client::new("ACME")))? {
//!     CreationOutcome::Created(doc) => println!("created {}", doc.id),
//!     CreationOutcome::UpsellRequired { used, limit } => println!("{used}/{limit}, go premium"),
//! }
//! ```

pub mod backend;
pub mod config;
pub mod creator;
pub mod entitlement_store;
pub mod error;
pub mod persistence;
pub mod quote_store;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend, read_json, write_json};
pub use config::{
    CompanyProfile, Config, CorruptRecordPolicy, EntitlementConfig, QUOTA_KEY, QUOTES_KEY,
};
pub use creator::{CreationOutcome, QuoteCreator};
pub use entitlement_store::EntitlementStore;
pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_config_path, default_data_dir, ensure_dir, load_json, save_json,
};
pub use quote_store::QuoteStore;
