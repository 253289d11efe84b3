//! HTML rendering of the invoice.
//!
//! The default template is compiled into the binary. A copy placed at
//! `<data_root>/templates/invoice.html.tera` takes precedence, so the layout
//! can be adjusted without rebuilding.

use log::debug;
use std::collections::HashMap;
use std::path::Path;
use tera::{Context, Tera, Value};

use crate::bill::Bill;
use crate::error::Result;
use crate::model::{InvoiceContext, ItemRow, SellerConfig};
use crate::words::amount_to_words;

pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/invoice.html.tera");

// Name ends in .html so tera autoescapes buyer-supplied text.
const TEMPLATE_NAME: &str = "invoice.html";

/// Delay between the document loading and the print dialog opening.
pub const PRINT_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// On-screen view, no print script.
    Preview,
    /// Prints itself after [`PRINT_DELAY_MS`] and closes.
    Print,
}

pub fn format_inr(amount: f64) -> String {
    format!("₹{:.2}", amount)
}

fn inr_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let amount = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg("inr expects a number"))?;
    Ok(Value::String(format_inr(amount)))
}

// Quantities print without trailing zeros: 2 -> "2", 2.5 -> "2.5".
fn num_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let n = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg("num expects a number"))?;
    Ok(Value::String(n.to_string()))
}

pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Renderer using the built-in template only.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, DEFAULT_TEMPLATE)?;
        Ok(Renderer::with_filters(tera))
    }

    /// Renderer that prefers `<root>/templates/invoice.html.tera` when present.
    pub fn for_root(root: &Path) -> Result<Self> {
        let custom = root.join("templates").join("invoice.html.tera");
        if !custom.exists() {
            return Renderer::new();
        }
        debug!("using template {}", custom.display());
        let mut tera = Tera::default();
        tera.add_template_file(&custom, Some(TEMPLATE_NAME))?;
        Ok(Renderer::with_filters(tera))
    }

    fn with_filters(mut tera: Tera) -> Self {
        tera.register_filter("inr", inr_filter);
        tera.register_filter("num", num_filter);
        Renderer { tera }
    }

    pub fn context(bill: &Bill, seller: &SellerConfig, mode: RenderMode) -> InvoiceContext {
        let totals = bill.totals();
        InvoiceContext {
            bill_number: bill.bill_number().to_string(),
            date: bill.date().format("%-d/%-m/%Y").to_string(),
            seller: seller.clone(),
            buyer: bill.buyer().clone(),
            rows: bill.items().iter().map(ItemRow::from).collect(),
            totals,
            amount_in_words: amount_to_words(totals.total),
            note: bill.note().map(str::to_string),
            auto_print: mode == RenderMode::Print,
            print_delay_ms: PRINT_DELAY_MS,
        }
    }

    pub fn render(&self, bill: &Bill, seller: &SellerConfig, mode: RenderMode) -> Result<String> {
        let context = Context::from_serialize(Renderer::context(bill, seller, mode))?;
        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BankDetails, BuyerDetails, ItemInput, Unit};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn seller() -> SellerConfig {
        SellerConfig {
            company_name: "Acme Supplies".into(),
            address_line1: "1 MG Road".into(),
            address_line2: "Bengaluru 560001".into(),
            gstin: "29AAAAA0000A1Z5".into(),
            phone: "080 1234 5678".into(),
            email: "billing@acme.in".into(),
            place_of_supply: "Karnataka".into(),
            bank: None,
            terms: vec![],
            declaration: None,
        }
    }

    fn bill_with_item() -> Bill {
        let mut bill = Bill::with_number("INV-42", NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        bill.add_item(ItemInput {
            description: "Cement".into(),
            hsn_code: "2523".into(),
            quantity: 2.0,
            unit: Unit::Bag,
            rate: 100.0,
            rate_with_tax: 118.0,
            cgst: 9.0,
            sgst: 9.0,
            amount: 200.0,
        });
        bill
    }

    #[test]
    fn currency_has_two_decimals() {
        assert_eq!(format_inr(236.0), "₹236.00");
        assert_eq!(format_inr(1234.5), "₹1234.50");
    }

    #[test]
    fn context_carries_computed_figures() {
        let ctx = Renderer::context(&bill_with_item(), &seller(), RenderMode::Preview);
        assert_eq!(ctx.date, "5/3/2024");
        assert_eq!(ctx.rows.len(), 1);
        assert_eq!(ctx.rows[0].cgst_amount, 18.0);
        assert_eq!(ctx.rows[0].line_total, 236.0);
        assert_eq!(ctx.amount_in_words, "Two Hundred and Thirty Six Rupees Only");
        assert!(!ctx.auto_print);
    }

    #[test]
    fn document_has_stylesheet_and_figures() {
        let html = Renderer::new()
            .unwrap()
            .render(&bill_with_item(), &seller(), RenderMode::Preview)
            .unwrap();

        for selector in [".header", ".company-name", ".section-title", ".no-print", "@media print"] {
            assert!(html.contains(selector), "missing {selector}");
        }
        assert!(html.contains("class=\"bill-summary-table\""));
        assert!(html.contains("class=\"total-row\""));
        assert!(html.contains("Invoice No: INV-42"));
        assert!(html.contains("2 Bag"));
        assert!(html.contains("₹236.00"));
        assert!(html.contains("Amount in Words: Two Hundred and Thirty Six Rupees Only"));
        assert!(!html.contains("window.print()"));
    }

    #[test]
    fn print_mode_adds_delayed_print_script() {
        let html = Renderer::new()
            .unwrap()
            .render(&bill_with_item(), &seller(), RenderMode::Print)
            .unwrap();
        assert!(html.contains("window.print();"));
        assert!(html.contains("window.close();"));
        assert!(html.contains("}, 500);"));
    }

    #[test]
    fn buyer_text_is_escaped() {
        let mut bill = bill_with_item();
        bill.set_buyer(BuyerDetails {
            name: "<b>Evil & Co</b>".into(),
            ..BuyerDetails::default()
        });
        let html = Renderer::new()
            .unwrap()
            .render(&bill, &seller(), RenderMode::Preview)
            .unwrap();
        assert!(html.contains("&lt;b&gt;Evil &amp; Co&lt;&#x2F;b&gt;"));
        assert!(!html.contains("<b>Evil"));
    }

    #[test]
    fn optional_sections_follow_data() {
        let renderer = Renderer::new().unwrap();
        let mut bill = bill_with_item();

        let bare = renderer.render(&bill, &seller(), RenderMode::Preview).unwrap();
        assert!(!bare.contains("Bank Details"));
        assert!(!bare.contains(">Note<"));
        assert!(!bare.contains("Terms &amp; Conditions"));
        assert!(!bare.contains("Declaration"));

        let mut full = seller();
        full.bank = Some(BankDetails {
            account_name: "Acme".into(),
            bank_name: "HDFC Bank".into(),
            branch: "Indiranagar".into(),
            ifsc: "HDFC0000123".into(),
            account_number: "50100012345678".into(),
        });
        full.terms = vec!["Payment due in 15 days.".into()];
        full.declaration = Some("All particulars are true.".into());
        bill.set_note("Deliver before noon");

        let html = renderer.render(&bill, &full, RenderMode::Preview).unwrap();
        assert!(html.contains("IFSC Code: HDFC0000123"));
        assert!(html.contains(">Note<"));
        assert!(html.contains("Deliver before noon"));
        assert!(html.contains("<li>Payment due in 15 days.</li>"));
        assert!(html.contains("All particulars are true."));
    }

    #[test]
    fn missing_buyer_shows_placeholder_hidden_in_print() {
        let html = Renderer::new()
            .unwrap()
            .render(&bill_with_item(), &seller(), RenderMode::Preview)
            .unwrap();
        assert!(html.contains("No customer added yet."));
    }
}
