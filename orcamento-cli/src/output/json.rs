//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use orcamento_core::{QuotaStatus, QuoteDocument, QuoteId, QuoteStatus};
use rust_decimal::Decimal;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// `quota` output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaOutput {
    #[serde(flatten)]
    pub status: QuotaStatus,
    pub can_create: bool,
}

/// Output when the daily limit blocks creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsellOutput {
    pub upsell_required: bool,
    pub used: u32,
    pub limit: u32,
}

/// One row of `quote list`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryOutput {
    pub id: QuoteId,
    pub number: u32,
    pub title: String,
    pub client: String,
    pub total: Decimal,
    pub status: QuoteStatus,
    pub updated_at: DateTime<Utc>,
}

impl From<&QuoteDocument> for QuoteSummaryOutput {
    fn from(doc: &QuoteDocument) -> Self {
        Self {
            id: doc.id,
            number: doc.number,
            title: doc.title.clone(),
            client: doc.client.name.clone(),
            total: doc.grand_total(),
            status: doc.status,
            updated_at: doc.updated_at,
        }
    }
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats the quota summary.
    pub fn format_quota(&self, status: QuotaStatus) -> Result<String> {
        self.format(&QuotaOutput {
            status,
            can_create: !status.limit_reached,
        })
    }

    /// Formats the upsell prompt.
    pub fn format_upsell(&self, used: u32, limit: u32) -> Result<String> {
        self.format(&UpsellOutput {
            upsell_required: true,
            used,
            limit,
        })
    }

    /// Formats the quote list.
    pub fn format_list(&self, docs: &[QuoteDocument]) -> Result<String> {
        let rows: Vec<QuoteSummaryOutput> = docs.iter().map(QuoteSummaryOutput::from).collect();
        self.format(&rows)
    }
}
