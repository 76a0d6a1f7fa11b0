//! Daily quota and premium entitlement.
//!
//! The store keeps one [`EntitlementRecord`] under a fixed key. The daily
//! rollover is applied when the record is read: a record stamped with an
//! earlier day is seen as `count = 0` with the premium flag kept. Reads never
//! write that view back; the next mutating call persists it as part of its
//! own write.
//!
//! Read-modify-write calls hold the store's lock, so threads sharing one
//! store cannot lose increments. Separate processes sharing one backend are
//! not coordinated.

use orcamento_core::{Admission, Clock, EntitlementRecord, QuotaStatus, RemainingQuota};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::{KeyValueBackend, read_json, write_json};
use crate::config::{CorruptRecordPolicy, EntitlementConfig};
use crate::error::StoreError;

/// Persistent quota tracker with premium demo controls.
pub struct EntitlementStore {
    backend: Arc<dyn KeyValueBackend>,
    clock: Arc<dyn Clock>,
    config: EntitlementConfig,
    write_lock: Mutex<()>,
}

impl EntitlementStore {
    /// Creates a store over `backend` using `clock` for "today".
    pub fn new(
        backend: Arc<dyn KeyValueBackend>,
        clock: Arc<dyn Clock>,
        config: EntitlementConfig,
    ) -> Self {
        Self {
            backend,
            clock,
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Creates a store with the default key, limit and policy.
    pub fn with_defaults(backend: Arc<dyn KeyValueBackend>, clock: Arc<dyn Clock>) -> Self {
        Self::new(backend, clock, EntitlementConfig::default())
    }

    /// The settings this store runs with.
    pub fn config(&self) -> &EntitlementConfig {
        &self.config
    }

    /// Free-tier creations per day.
    pub fn daily_limit(&self) -> u32 {
        self.config.daily_limit
    }

    // ========================================================================
    // Record Access
    // ========================================================================

    /// Loads the stored record as-is, without rollover.
    fn load_stored(&self) -> Result<Option<EntitlementRecord>, StoreError> {
        let key = self.config.storage_key.as_str();
        match read_json(self.backend.as_ref(), key) {
            Ok(record) => Ok(record),
            Err(err) if err.is_corrupt_data()
                && self.config.corrupt_records == CorruptRecordPolicy::FailOpen =>
            {
                warn!(key = %key, error = %err, "Ignoring corrupt entitlement record");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Returns the record as seen today.
    ///
    /// Absent record: `{today, 0, false}`. Record from another day:
    /// `{today, 0, stored premium flag}`. Nothing is written.
    pub fn read_record(&self) -> Result<EntitlementRecord, StoreError> {
        let today = self.clock.today();
        let record = match self.load_stored()? {
            None => {
                debug!(%today, "No entitlement record, using defaults");
                EntitlementRecord::fresh(today)
            }
            Some(stored) if stored.is_stale(today) => {
                debug!(stored_date = %stored.date, %today, "Entitlement record rolled over");
                stored.rolled_over(today)
            }
            Some(stored) => stored,
        };
        Ok(record)
    }

    /// Persists `record` verbatim, replacing the stored one.
    pub fn write_record(&self, record: &EntitlementRecord) -> Result<(), StoreError> {
        write_json(self.backend.as_ref(), &self.config.storage_key, record)?;
        debug!(
            date = %record.date,
            count = record.count,
            premium = record.is_premium,
            "Entitlement record saved"
        );
        Ok(())
    }

    // ========================================================================
    // Usage
    // ========================================================================

    /// Counts one created quote. Premium users are not counted and nothing is
    /// written for them.
    pub fn increment_usage(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let record = self.read_record()?;
        if record.is_premium {
            debug!("Premium user, usage not counted");
            return Ok(());
        }
        self.record_one(record)?;
        Ok(())
    }

    /// Checks the quota and counts one creation in a single locked step.
    ///
    /// Premium users are always granted and nothing is written.
    pub fn try_consume(&self) -> Result<Admission, StoreError> {
        let _guard = self.write_lock.lock();
        let record = self.read_record()?;
        let limit = self.config.daily_limit;

        if record.is_premium {
            return Ok(Admission::Granted {
                remaining: RemainingQuota::Unlimited,
            });
        }
        if !record.can_create(limit) {
            info!(used = record.count, limit, "Daily quota exhausted");
            return Ok(Admission::Denied {
                used: record.count,
                limit,
            });
        }

        let updated = self.record_one(record)?;
        Ok(Admission::Granted {
            remaining: updated.remaining(limit),
        })
    }

    /// Gives back one creation counted by [`try_consume`](Self::try_consume)
    /// whose quote could not be saved.
    ///
    /// Does nothing for premium users or when nothing is counted today.
    pub fn release_usage(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut record = self.read_record()?;
        if record.is_premium || record.count == 0 {
            return Ok(());
        }
        record.count -= 1;
        self.write_record(&record)?;
        info!(count = record.count, "Quote usage released");
        Ok(())
    }

    /// Adds one to `record.count`, stamps today and persists. Caller holds the lock.
    fn record_one(&self, mut record: EntitlementRecord) -> Result<EntitlementRecord, StoreError> {
        record.count = record.count.saturating_add(1);
        record.date = self.clock.today();
        self.write_record(&record)?;
        info!(count = record.count, limit = self.config.daily_limit, "Quote usage recorded");
        Ok(record)
    }

    /// Returns true if a quote may be created now.
    pub fn can_create(&self) -> Result<bool, StoreError> {
        Ok(self.read_record()?.can_create(self.config.daily_limit))
    }

    /// Remaining creations today; unlimited for premium.
    pub fn remaining_quota(&self) -> Result<RemainingQuota, StoreError> {
        Ok(self.read_record()?.remaining(self.config.daily_limit))
    }

    /// Quotes counted today.
    pub fn used_quota(&self) -> Result<u32, StoreError> {
        Ok(self.read_record()?.count)
    }

    /// Premium flag.
    pub fn is_premium(&self) -> Result<bool, StoreError> {
        Ok(self.read_record()?.is_premium)
    }

    /// Used/limit/remaining summary from a single read.
    pub fn status(&self) -> Result<QuotaStatus, StoreError> {
        Ok(self.read_record()?.status(self.config.daily_limit))
    }

    // ========================================================================
    // Demo Controls
    // ========================================================================

    /// Turns premium on. Count and date are kept.
    pub fn activate_premium(&self) -> Result<(), StoreError> {
        self.set_premium(true)
    }

    /// Turns premium off. Count and date are kept.
    pub fn deactivate_premium(&self) -> Result<(), StoreError> {
        self.set_premium(false)
    }

    fn set_premium(&self, premium: bool) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut record = self.read_record()?;
        record.is_premium = premium;
        self.write_record(&record)?;
        info!(premium, "Premium status changed");
        Ok(())
    }

    /// Zeroes today's count. The premium flag is kept.
    pub fn reset_usage_demo(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut record = self.read_record()?;
        record.count = 0;
        record.date = self.clock.today();
        self.write_record(&record)?;
        info!("Daily usage reset");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
