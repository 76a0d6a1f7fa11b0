//! Quote status.
//!
//! [`QuoteStatus`] is a flat label, not a guarded workflow: every status can
//! be replaced by every other status in one step, and none of them is final.
//! `Open` is the status every new quote starts with.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// Approval-tracking status of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    /// Sent to the client, no answer yet.
    #[default]
    Open,
    /// Client accepted.
    Approved,
    /// Client refused.
    Declined,
    /// Client is evaluating.
    InReview,
    /// Withdrawn.
    Cancelled,
}

impl QuoteStatus {
    /// Returns the wire name (`open`, `in_review`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Approved => "approved",
            Self::Declined => "declined",
            Self::InReview => "in_review",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the label shown on the status badge.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Em aberto",
            Self::Approved => "Aprovado",
            Self::Declined => "Recusado",
            Self::InReview => "Em análise",
            Self::Cancelled => "Cancelado",
        }
    }

    /// Returns all statuses in menu order.
    pub fn all() -> &'static [QuoteStatus] {
        &[
            Self::Open,
            Self::Approved,
            Self::Declined,
            Self::InReview,
            Self::Cancelled,
        ]
    }
}

impl FromStr for QuoteStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| CoreError::InvalidStatus(s.to_string()))
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_open() {
        assert_eq!(QuoteStatus::default(), QuoteStatus::Open);
    }

    #[test]
    fn test_parse_accepts_wire_names() {
        for status in QuoteStatus::all() {
            assert_eq!(status.as_str().parse::<QuoteStatus>().unwrap(), *status);
        }
        assert_eq!("In-Review".parse::<QuoteStatus>().unwrap(), QuoteStatus::InReview);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "archived".parse::<QuoteStatus>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidStatus(ref s) if s == "archived"));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&QuoteStatus::InReview).unwrap(), r#""in_review""#);
        let parsed: QuoteStatus = serde_json::from_str(r#""cancelled""#).unwrap();
        assert_eq!(parsed, QuoteStatus::Cancelled);
        assert!(serde_json::from_str::<QuoteStatus>(r#""pending""#).is_err());
    }
}
