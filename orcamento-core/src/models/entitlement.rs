//! Entitlement and daily quota types.
//!
//! This module contains the persisted quota record and the values derived
//! from it:
//! - [`EntitlementRecord`] - The `{date, count, isPremium}` tuple
//! - [`RemainingQuota`] - Remaining creations, or unlimited for premium
//! - [`QuotaStatus`] - Everything a badge or settings screen needs in one read
//! - [`Admission`] - Outcome of asking for one quote creation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

/// Number of quotes a free user may create per calendar day.
pub const DAILY_QUOTA_LIMIT: u32 = 3;

/// Sentinel used on the wire for "unlimited" remaining quota.
pub const UNLIMITED_SENTINEL: i64 = -1;

// ============================================================================
// Entitlement Record
// ============================================================================

/// The persisted quota record. One per installation.
///
/// Serialized as `{ "date": "YYYY-MM-DD", "count": n, "isPremium": bool }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementRecord {
    /// The day `count` applies to.
    pub date: NaiveDate,
    /// Quotes created on `date` while not premium.
    pub count: u32,
    /// Premium flag. Survives day rollovers.
    pub is_premium: bool,
}

impl EntitlementRecord {
    /// A fresh free-tier record for `today`.
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            date: today,
            count: 0,
            is_premium: false,
        }
    }

    /// Returns the view of this record as seen on `today`.
    ///
    /// A record from another day has its count zeroed and its date moved to
    /// `today`; the premium flag is kept.
    pub fn rolled_over(self, today: NaiveDate) -> Self {
        if self.date == today {
            self
        } else {
            Self {
                date: today,
                count: 0,
                is_premium: self.is_premium,
            }
        }
    }

    /// Returns true if the record's count belongs to another day.
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.date != today
    }

    /// Returns true if one more quote may be created under `limit`.
    pub fn can_create(&self, limit: u32) -> bool {
        self.is_premium || self.count < limit
    }

    /// Remaining creations under `limit`.
    pub fn remaining(&self, limit: u32) -> RemainingQuota {
        if self.is_premium {
            RemainingQuota::Unlimited
        } else {
            RemainingQuota::Limited(limit.saturating_sub(self.count))
        }
    }

    /// Returns the summary shown by badges and settings screens.
    pub fn status(&self, limit: u32) -> QuotaStatus {
        QuotaStatus {
            used: self.count,
            limit,
            remaining: self.remaining(limit),
            premium: self.is_premium,
            limit_reached: !self.is_premium && self.count >= limit,
        }
    }
}

// ============================================================================
// Remaining Quota
// ============================================================================

/// Remaining quote creations for today.
///
/// Serializes as a plain integer, with `-1` meaning unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemainingQuota {
    /// Premium: no cap.
    Unlimited,
    /// Free tier: this many left today.
    Limited(u32),
}

impl RemainingQuota {
    /// Returns the integer form, `-1` for unlimited.
    pub fn as_sentinel(&self) -> i64 {
        match self {
            Self::Unlimited => UNLIMITED_SENTINEL,
            Self::Limited(n) => i64::from(*n),
        }
    }

    /// Returns true for the premium variant.
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }
}

impl Serialize for RemainingQuota {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_sentinel())
    }
}

impl std::fmt::Display for RemainingQuota {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unlimited => write!(f, "unlimited"),
            Self::Limited(n) => write!(f, "{n}"),
        }
    }
}

// ============================================================================
// Quota Status
// ============================================================================

/// Snapshot of the quota for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    /// Quotes created today.
    pub used: u32,
    /// Daily limit in force.
    pub limit: u32,
    /// Remaining creations.
    pub remaining: RemainingQuota,
    /// Premium flag.
    pub premium: bool,
    /// Free tier and `used >= limit`.
    pub limit_reached: bool,
}

// ============================================================================
// Admission
// ============================================================================

/// Outcome of asking to create one quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Creation allowed; `remaining` is what is left after this one.
    Granted {
        /// Remaining creations after this grant.
        remaining: RemainingQuota,
    },
    /// Daily limit reached; show the upsell prompt.
    Denied {
        /// Quotes already created today.
        used: u32,
        /// Daily limit in force.
        limit: u32,
    },
}

impl Admission {
    /// Returns true if creation was allowed.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
