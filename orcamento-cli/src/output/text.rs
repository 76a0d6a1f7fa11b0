//! Text output: quota badges, upsell prompt, and the quote document viewer.

use chrono::{DateTime, Utc};
use orcamento_core::{QuotaStatus, QuoteDocument, QuoteStatus};
use orcamento_store::CompanyProfile;
use rust_decimal::{Decimal, RoundingStrategy};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

// Quota meter characters
const SLOT_USED: char = '●';
const SLOT_FREE: char = '○';
// Above this limit the meter is left out and only numbers are shown.
const METER_MAX_SLOTS: u32 = 20;

const RULE_WIDTH: usize = 56;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    company: CompanyProfile,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            company: CompanyProfile::default(),
        }
    }

    /// Sets the issuer printed on documents.
    pub fn with_company(mut self, company: CompanyProfile) -> Self {
        self.company = company;
        self
    }

    // ========================================================================
    // Quota
    // ========================================================================

    /// One-line plan badge: premium crown or `used/limit` free counter.
    pub fn format_badge(&self, status: &QuotaStatus) -> String {
        if status.premium {
            return self.yellow("👑 Premium");
        }
        let text = format!("✨ {}/{} Grátis", status.used, status.limit);
        if status.limit_reached {
            self.red(&text)
        } else {
            text
        }
    }

    /// Plan summary for the `quota` command.
    pub fn format_quota(&self, status: &QuotaStatus) -> String {
        let mut lines = vec![self.format_badge(status)];
        if status.premium {
            lines.push("Unlimited quotes per day.".to_string());
        } else {
            let summary = format!(
                "{} of {} quotes used today, {} remaining",
                status.used, status.limit, status.remaining
            );
            let meter = self.quota_meter(status.used, status.limit);
            if meter.is_empty() {
                lines.push(summary);
            } else {
                lines.push(format!("{meter}  {summary}"));
            }
            if status.limit_reached {
                lines.push(self.dim("Run `orcamento premium activate` for unlimited quotes."));
            }
        }
        lines.join("\n")
    }

    /// Slot meter, e.g. `●●○` for 2 of 3. Empty when the limit is too large
    /// to draw.
    pub fn quota_meter(&self, used: u32, limit: u32) -> String {
        if limit > METER_MAX_SLOTS {
            return String::new();
        }
        let filled = used.min(limit) as usize;
        let empty = limit.saturating_sub(used) as usize;
        let meter: String = std::iter::repeat_n(SLOT_USED, filled)
            .chain(std::iter::repeat_n(SLOT_FREE, empty))
            .collect();
        if used >= limit {
            self.red(&meter)
        } else {
            self.green(&meter)
        }
    }

    /// Prompt shown when the daily limit blocks a new quote.
    pub fn format_upsell(&self, used: u32, limit: u32) -> String {
        [
            self.bold("👑 Limite de Orçamentos Atingido"),
            format!("You created {used} of {limit} free quotes today."),
            "Upgrade to Premium for unlimited quotes:".to_string(),
            "  • Orçamentos ilimitados por dia".to_string(),
            "  • Exportação de PDF profissional".to_string(),
            "  • Modelos de orçamento personalizados".to_string(),
            "  • Suporte prioritário".to_string(),
            self.dim("Demo: `orcamento premium activate`, or come back tomorrow."),
        ]
        .join("\n")
    }

    // ========================================================================
    // Quotes
    // ========================================================================

    /// Column header for `quote list`.
    pub fn format_list_header(&self) -> String {
        self.bold(&format!(
            "{:<8} {:<24} {:<18} {:>14}  {:<11} {}",
            "Número", "Título", "Cliente", "Total", "Status", "ID"
        ))
    }

    /// One row of `quote list`.
    pub fn format_list_line(&self, doc: &QuoteDocument) -> String {
        format!(
            "{:<8} {:<24} {:<18} {:>14}  {:<11} {}",
            doc.number.to_string(),
            truncate(&doc.title, 24),
            truncate(&doc.client.name, 18),
            format_currency(doc.grand_total()),
            self.status_label(doc.status),
            self.dim(&doc.id.to_string())
        )
    }

    /// Colored status label.
    pub fn status_label(&self, status: QuoteStatus) -> String {
        let label = format!("{:<11}", status.label());
        match status {
            QuoteStatus::Approved => self.green(&label),
            QuoteStatus::Declined | QuoteStatus::Cancelled => self.red(&label),
            QuoteStatus::InReview => self.yellow(&label),
            QuoteStatus::Open => label,
        }
    }

    /// Renders the full document.
    pub fn render_document(&self, doc: &QuoteDocument) -> String {
        let rule = "═".repeat(RULE_WIDTH);
        let thin = "─".repeat(RULE_WIDTH);
        let mut lines = Vec::new();

        // Banner
        lines.push(rule.clone());
        lines.push(format!(" {}", self.bold(&self.company.name)));
        lines.push(format!(" CNPJ: {}", self.company.tax_id));
        lines.push(format!(" {}", self.company.address));
        lines.push(rule);
        lines.push(String::new());

        // Title
        lines.push(center(&doc.title, RULE_WIDTH));
        if let Some(number) = doc.display_number() {
            lines.push(center(&number, RULE_WIDTH));
        }
        lines.push(String::new());

        // Client
        lines.push(thin.clone());
        lines.push(self.bold("Cliente:"));
        lines.push(format!("  {}", doc.client.name));
        if let Some(email) = &doc.client.email {
            lines.push(format!("  {email}"));
        }
        if let Some(phone) = &doc.client.phone {
            lines.push(format!("  {phone}"));
        }
        lines.push(thin);
        lines.push(String::new());

        // Prices
        lines.push(self.bold("Preços"));
        lines.extend(self.price_table(doc));
        lines.push(String::new());

        // Signatures
        let client_name = if doc.client.name.trim().is_empty() {
            "Cliente"
        } else {
            doc.client.name.as_str()
        };
        let company_sig = format!("{}.", self.company.name);
        lines.push(format!("  {:<26}{}", "_".repeat(22), "_".repeat(22)));
        lines.push(format!(
            "  {:<26}{}",
            truncate(&company_sig, 24),
            truncate(client_name, 22)
        ));
        lines.push(String::new());

        lines.push(format!("Data de criação: {}", format_date(doc.created_at)));
        lines.push(format!("Status: {}", self.status_label(doc.status).trim_end()));

        lines.join("\n")
    }

    /// Price table rows; columns follow the document's display toggles.
    fn price_table(&self, doc: &QuoteDocument) -> Vec<String> {
        let display = doc.price_display;
        let mut header = vec![format!("{:<22}", "Item")];
        if display.show_quantity {
            header.push(format!("{:>10}", "Qtde."));
        }
        if display.show_unit_price {
            header.push(format!("{:>14}", "Unitário"));
        }
        if display.show_subtotal {
            header.push(format!("{:>14}", "Total"));
        }

        let mut rows = vec![self.bold(&format!("  {}", header.join(" ")))];
        for item in &doc.items {
            let mut row = vec![format!("{:<22}", truncate(&item.name, 22))];
            if display.show_quantity {
                let qty = format!("{} {}", format_quantity(item.quantity), item.unit);
                row.push(format!("{qty:>10}"));
            }
            if display.show_unit_price {
                row.push(format!("{:>14}", format_currency(item.unit_price)));
            }
            if display.show_subtotal {
                row.push(format!("{:>14}", format_currency(item.line_total())));
            }
            rows.push(format!("  {}", row.join(" ")));
        }

        if display.show_total {
            let width = header.iter().map(|c| c.chars().count()).sum::<usize>() + header.len() - 1;
            let amount = format_currency(doc.grand_total());
            let label_width = width.saturating_sub(amount.chars().count()).max(6);
            rows.push(self.bold(&format!("  {:<label_width$}{amount}", "Total")));
        }
        rows
    }

    // ========================================================================
    // Styling
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }
}

// ============================================================================
// Value Formatting
// ============================================================================

/// Formats an amount as Brazilian real: `R$ 1.234,56`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("{sign}R$ {},{frac_part}", group_thousands(int_part))
}

/// Formats a quantity with a decimal comma and no trailing zeros: `2,5`.
pub fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string().replace('.', ",")
}

/// Formats a timestamp as `DD/MM/YYYY` (UTC).
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y").to_string()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{text}", " ".repeat((width - len) / 2))
}
