//! Quote document types.
//!
//! This module contains the persisted quote record and its parts:
//! - [`QuoteDocument`] - A quote with client, line items and status
//! - [`QuoteDraft`] - Caller input for creating a quote
//! - [`LineItem`] - One priced row
//! - [`Client`] - Who the quote is addressed to
//! - [`PriceDisplay`] - Which price columns the viewer shows
//!
//! Line totals and the grand total are derived values. They are stored with
//! the document for convenience but always recomputed from quantity and unit
//! price before a document is persisted or rendered.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::status::QuoteStatus;

// ============================================================================
// Quote ID
// ============================================================================

/// Unique identifier of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(Uuid);

impl QuoteId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for QuoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for QuoteId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for QuoteId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| CoreError::InvalidData(format!("quote id '{s}': {e}")))
    }
}

impl std::fmt::Display for QuoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Client
// ============================================================================

/// The client a quote is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Client name.
    pub name: String,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Client {
    /// Creates a client with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
        }
    }

    /// Sets the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the phone.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

// ============================================================================
// Line Item
// ============================================================================

/// One priced row of a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Row id.
    pub id: Uuid,
    /// Product or service name.
    pub name: String,
    /// Quantity, possibly fractional (hours, meters).
    pub quantity: Decimal,
    /// Unit label ("un", "h", "m²").
    pub unit: String,
    /// Price per unit.
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub total: Decimal,
}

impl LineItem {
    /// Creates a row with its total computed.
    pub fn new(
        name: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            total: quantity * unit_price,
        }
    }

    /// Computes `quantity * unit_price`.
    pub fn line_total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

// ============================================================================
// Price Display
// ============================================================================

/// Which price columns the document shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct PriceDisplay {
    /// Quantity and unit column.
    pub show_quantity: bool,
    /// Unit price column.
    pub show_unit_price: bool,
    /// Per-row total column.
    pub show_subtotal: bool,
    /// Grand total row.
    pub show_total: bool,
}

impl Default for PriceDisplay {
    fn default() -> Self {
        Self {
            show_quantity: true,
            show_unit_price: true,
            show_subtotal: true,
            show_total: true,
        }
    }
}

// ============================================================================
// Draft
// ============================================================================

/// Caller input for a new quote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteDraft {
    /// Document title.
    pub title: String,
    /// Hide the display number on the rendered document.
    pub hide_number: bool,
    /// Addressee.
    pub client: Client,
    /// Priced rows.
    pub items: Vec<LineItem>,
    /// Column toggles.
    pub price_display: PriceDisplay,
}

impl QuoteDraft {
    /// Starts a draft with a title and client.
    pub fn new(title: impl Into<String>, client: Client) -> Self {
        Self {
            title: title.into(),
            client,
            ..Self::default()
        }
    }

    /// Appends a line item.
    #[must_use]
    pub fn with_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }
}

// ============================================================================
// Quote Document
// ============================================================================

/// A persisted quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDocument {
    /// Unique id.
    pub id: QuoteId,
    /// Document title.
    pub title: String,
    /// Sequential display number.
    pub number: u32,
    /// Hide `number` when rendering.
    #[serde(default)]
    pub hide_number: bool,
    /// Addressee.
    pub client: Client,
    /// Priced rows.
    pub items: Vec<LineItem>,
    /// Column toggles.
    #[serde(default)]
    pub price_display: PriceDisplay,
    /// Sum of line totals.
    pub total: Decimal,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Approval status.
    #[serde(default)]
    pub status: QuoteStatus,
}

impl QuoteDocument {
    /// Builds a new `Open` document from a draft.
    pub fn from_draft(draft: QuoteDraft, number: u32, now: DateTime<Utc>) -> Self {
        let mut doc = Self {
            id: QuoteId::new(),
            title: draft.title,
            number,
            hide_number: draft.hide_number,
            client: draft.client,
            items: draft.items,
            price_display: draft.price_display,
            total: Decimal::ZERO,
            created_at: now,
            updated_at: now,
            status: QuoteStatus::Open,
        };
        doc.recompute_totals();
        doc
    }

    /// Computes the sum of all line totals.
    pub fn grand_total(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Refreshes stored line totals and the grand total.
    pub fn recompute_totals(&mut self) {
        for item in &mut self.items {
            item.total = item.line_total();
        }
        self.total = self.grand_total();
    }

    /// Returns a copy with `status` replaced and `updated_at` refreshed.
    ///
    /// Every status may follow every other status. `updated_at` never moves
    /// backwards, even if `now` is earlier than the stored value.
    #[must_use]
    pub fn with_status(&self, status: QuoteStatus, now: DateTime<Utc>) -> Self {
        let mut updated = self.clone();
        updated.status = status;
        updated.touch(now);
        updated
    }

    /// Marks the document as modified at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = self.updated_at.max(now);
    }

    /// Returns `[number]`, or `None` if the number is hidden.
    pub fn display_number(&self) -> Option<String> {
        (!self.hide_number).then(|| format!("[{}]", self.number))
    }
}

// ============================================================================
// Tests
// ============================================================================
