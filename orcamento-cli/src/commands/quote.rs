//! Quote command - create, list, render and update quote documents.

use anyhow::Result;
use clap::{Args, Subcommand};
use orcamento_core::{
    Client, CoreError, LineItem, PriceDisplay, QuoteDraft, QuoteId, QuoteStatus,
};
use orcamento_store::{CreationOutcome, QuoteCreator, StoreError};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, info};

use super::{AppContext, QuotaExhausted};
use crate::{Cli, OutputFormat};

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    #[command(subcommand)]
    pub action: QuoteAction,
}

/// Quote subcommands.
#[derive(Subcommand)]
pub enum QuoteAction {
    /// Create a quote (counts against the daily allowance).
    New(NewArgs),

    /// List quotes, newest first.
    #[command(visible_alias = "ls")]
    List,

    /// Render one quote.
    Show {
        /// Quote id.
        id: String,
    },

    /// Change a quote's status (open, approved, declined, in_review, cancelled).
    Status {
        /// Quote id.
        id: String,
        /// New status.
        status: String,
    },

    /// Delete a quote.
    #[command(visible_alias = "rm")]
    Delete {
        /// Quote id.
        id: String,
    },
}

/// Arguments for `quote new`.
#[derive(Args, Default)]
pub struct NewArgs {
    /// Document title.
    #[arg(long)]
    pub title: String,

    /// Client name.
    #[arg(long)]
    pub client: String,

    /// Client email.
    #[arg(long)]
    pub email: Option<String>,

    /// Client phone.
    #[arg(long)]
    pub phone: Option<String>,

    /// Line item as "name;quantity;unit;unit price". Repeatable.
    #[arg(long = "item", value_name = "ITEM")]
    pub items: Vec<String>,

    /// Do not print the document number.
    #[arg(long)]
    pub hide_number: bool,

    /// Hide the quantity column.
    #[arg(long)]
    pub hide_quantity: bool,

    /// Hide the unit price column.
    #[arg(long)]
    pub hide_unit_price: bool,

    /// Hide the per-item total column.
    #[arg(long)]
    pub hide_subtotal: bool,

    /// Hide the grand total row.
    #[arg(long)]
    pub hide_total: bool,
}

impl NewArgs {
    /// Builds the draft described by the arguments.
    pub fn to_draft(&self) -> Result<QuoteDraft, CoreError> {
        let mut client = Client::new(self.client.trim());
        if let Some(email) = &self.email {
            client = client.with_email(email.trim());
        }
        if let Some(phone) = &self.phone {
            client = client.with_phone(phone.trim());
        }

        let mut draft = QuoteDraft::new(self.title.trim(), client);
        for raw in &self.items {
            draft = draft.with_item(parse_item(raw)?);
        }
        draft.hide_number = self.hide_number;
        draft.price_display = PriceDisplay {
            show_quantity: !self.hide_quantity,
            show_unit_price: !self.hide_unit_price,
            show_subtotal: !self.hide_subtotal,
            show_total: !self.hide_total,
        };
        Ok(draft)
    }
}

/// Runs the quote command.
pub fn run(args: &QuoteArgs, cli: &Cli, ctx: &AppContext) -> Result<()> {
    match &args.action {
        QuoteAction::New(new_args) => create(new_args, cli, ctx),
        QuoteAction::List => list(cli, ctx),
        QuoteAction::Show { id } => show(id, cli, ctx),
        QuoteAction::Status { id, status } => set_status(id, status, cli, ctx),
        QuoteAction::Delete { id } => delete(id, cli, ctx),
    }
}

fn create(args: &NewArgs, cli: &Cli, ctx: &AppContext) -> Result<()> {
    let draft = args.to_draft()?;
    debug!(title = %draft.title, items = draft.items.len(), "Creating quote");

    let outcome = QuoteCreator::new(&ctx.entitlements, &ctx.quotes).create(draft)?;
    let doc = match outcome {
        CreationOutcome::Created(doc) => doc,
        CreationOutcome::UpsellRequired { used, limit } => {
            match cli.format {
                OutputFormat::Text => println!("{}", ctx.text(cli).format_upsell(used, limit)),
                OutputFormat::Json => println!("{}", ctx.json(cli).format_upsell(used, limit)?),
            }
            return Err(QuotaExhausted { used, limit }.into());
        }
    };

    match cli.format {
        OutputFormat::Text => {
            let text = ctx.text(cli);
            println!("Created quote {} ({})", doc.number, doc.id);
            println!("{}", text.format_badge(&ctx.entitlements.status()?));
        }
        OutputFormat::Json => println!("{}", ctx.json(cli).format(&doc)?),
    }
    Ok(())
}

fn list(cli: &Cli, ctx: &AppContext) -> Result<()> {
    let docs = ctx.quotes.list()?;

    match cli.format {
        OutputFormat::Text => {
            if docs.is_empty() {
                println!("No quotes yet. Create one with `orcamento quote new`.");
                return Ok(());
            }
            let text = ctx.text(cli);
            println!("{}", text.format_list_header());
            for doc in &docs {
                println!("{}", text.format_list_line(doc));
            }
        }
        OutputFormat::Json => println!("{}", ctx.json(cli).format_list(&docs)?),
    }
    Ok(())
}

fn show(id: &str, cli: &Cli, ctx: &AppContext) -> Result<()> {
    let doc = ctx.quotes.require(id.parse()?)?;

    match cli.format {
        OutputFormat::Text => println!("{}", ctx.text(cli).render_document(&doc)),
        OutputFormat::Json => println!("{}", ctx.json(cli).format(&doc)?),
    }
    Ok(())
}

fn set_status(id: &str, status: &str, cli: &Cli, ctx: &AppContext) -> Result<()> {
    let id: QuoteId = id.parse()?;
    let status: QuoteStatus = status.parse()?;
    let doc = ctx.quotes.set_status(id, status)?;

    match cli.format {
        OutputFormat::Text => println!(
            "Quote {} is now {}",
            doc.number,
            ctx.text(cli).status_label(doc.status).trim_end()
        ),
        OutputFormat::Json => println!("{}", ctx.json(cli).format(&doc)?),
    }
    Ok(())
}

fn delete(id: &str, cli: &Cli, ctx: &AppContext) -> Result<()> {
    let id: QuoteId = id.parse()?;
    if !ctx.quotes.delete(id)? {
        return Err(StoreError::QuoteNotFound(id).into());
    }
    info!(%id, "Quote deleted");

    match cli.format {
        OutputFormat::Text => println!("Deleted quote {id}"),
        OutputFormat::Json => println!(
            "{}",
            ctx.json(cli)
                .format(&serde_json::json!({ "id": id, "deleted": true }))?
        ),
    }
    Ok(())
}

// ============================================================================
// Argument Parsing
// ============================================================================

/// Parses `name;quantity;unit;unit price`.
///
/// Numbers accept either decimal separator: `2.5`, `2,5` and `1.234,56`.
pub fn parse_item(raw: &str) -> Result<LineItem, CoreError> {
    let parts: Vec<&str> = raw.split(';').map(str::trim).collect();
    let [name, quantity, unit, price] = parts.as_slice() else {
        return Err(CoreError::InvalidData(format!(
            "item '{raw}' must be \"name;quantity;unit;unit price\""
        )));
    };
    if name.is_empty() {
        return Err(CoreError::InvalidData(format!("item '{raw}' has no name")));
    }

    let quantity = parse_amount(quantity)?;
    let price = parse_amount(price)?;
    Ok(LineItem::new(*name, quantity, *unit, price))
}

/// Parses a non-negative amount written with `.` or `,` as decimal separator.
pub fn parse_amount(raw: &str) -> Result<Decimal, CoreError> {
    let cleaned = raw.trim().trim_start_matches("R$").trim();
    // With a comma present, dots are thousands separators.
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned.to_string()
    };

    let amount = Decimal::from_str(&normalized)
        .map_err(|e| CoreError::InvalidData(format!("invalid amount '{raw}': {e}")))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CoreError::InvalidData(format!("amount '{raw}' is negative")));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("2.5").unwrap(), Decimal::new(25, 1));
        assert_eq!(parse_amount("2,5").unwrap(), Decimal::new(25, 1));
        assert_eq!(parse_amount("1.234,56").unwrap(), Decimal::new(123456, 2));
        assert_eq!(parse_amount("R$ 80").unwrap(), Decimal::from(80));
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("-1").is_err());
    }

    #[test]
    fn test_parse_item() {
        let item = parse_item("Pintura; 2,5 ; h ; 80").unwrap();
        assert_eq!(item.name, "Pintura");
        assert_eq!(item.unit, "h");
        assert_eq!(item.line_total(), Decimal::from(200));
    }

    #[test]
    fn test_parse_item_rejects_bad_shapes() {
        assert!(matches!(
            parse_item("Pintura;2"),
            Err(CoreError::InvalidData(_))
        ));
        assert!(parse_item(";1;un;10").is_err());
        assert!(parse_item("A;1;un;10;extra").is_err());
    }

    #[test]
    fn test_new_args_to_draft() {
        let args = NewArgs {
            title: " Reforma ".to_string(),
            client: "Maria".to_string(),
            email: Some("maria@example.com".to_string()),
            items: vec!["Pintura;2;h;80".to_string(), "Tinta;3;l;45,90".to_string()],
            hide_number: true,
            hide_unit_price: true,
            ..NewArgs::default()
        };
        let draft = args.to_draft().unwrap();

        assert_eq!(draft.title, "Reforma");
        assert_eq!(draft.client.email.as_deref(), Some("maria@example.com"));
        assert_eq!(draft.client.phone, None);
        assert_eq!(draft.items.len(), 2);
        assert!(draft.hide_number);
        assert!(draft.price_display.show_quantity);
        assert!(!draft.price_display.show_unit_price);
        assert!(draft.price_display.show_total);
    }
}
