//! Line item editor.
//!
//! Holds the in-progress fields of one item and keeps the pre-tax rate, the
//! tax-inclusive rate and the line amount consistent as fields change. Tax
//! percentages are kept as the raw text the user typed so that "missing" and
//! "not a number" can be told apart from zero at submit time.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::{BillItem, ItemId, ItemInput, TaxConfig, Unit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Description,
    HsnCode,
    Quantity,
    Unit,
    Rate,
    RateWithTax,
    Cgst,
    Sgst,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Description => "Description",
            Field::HsnCode => "HSN/SAC Code",
            Field::Quantity => "Quantity",
            Field::Unit => "Unit",
            Field::Rate => "Rate (Without Tax)",
            Field::RateWithTax => "Rate (With Tax)",
            Field::Cgst => "CGST (%)",
            Field::Sgst => "SGST (%)",
        }
    }
}

/// Per-field messages from a failed submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.0.insert(field, message.to_string());
    }

    fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// What a successful submit produces.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorOutcome {
    /// A new item, still without an id.
    Add(ItemInput),
    /// A full replacement for the item with the same id.
    Replace(BillItem),
}

#[derive(Debug, Clone)]
pub struct ItemEditor {
    target: Option<ItemId>,
    description: String,
    hsn_code: String,
    quantity: f64,
    unit: Unit,
    rate: f64,
    rate_with_tax: f64,
    amount: f64,
    cgst: String,
    sgst: String,
    errors: ValidationErrors,
}

fn parse_percent(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn format_percent(value: f64) -> String {
    format!("{}", value)
}

impl ItemEditor {
    /// Blank editor for a new item, with tax percentages pre-filled from the
    /// configured default.
    pub fn new(tax: &TaxConfig) -> Self {
        let (cgst, sgst) = tax.default_split();
        ItemEditor {
            target: None,
            description: String::new(),
            hsn_code: String::new(),
            quantity: 1.0,
            unit: Unit::default(),
            rate: 0.0,
            rate_with_tax: 0.0,
            amount: 0.0,
            cgst: format_percent(cgst),
            sgst: format_percent(sgst),
            errors: ValidationErrors::default(),
        }
    }

    /// Editor pre-populated from an existing item; submitting replaces it by id.
    pub fn for_item(item: &BillItem) -> Self {
        let f = &item.fields;
        ItemEditor {
            target: Some(item.id),
            description: f.description.clone(),
            hsn_code: f.hsn_code.clone(),
            quantity: f.quantity,
            unit: f.unit,
            rate: f.rate,
            rate_with_tax: f.rate_with_tax,
            amount: f.amount,
            cgst: format_percent(f.cgst),
            sgst: format_percent(f.sgst),
            errors: ValidationErrors::default(),
        }
    }

    pub fn target(&self) -> Option<ItemId> {
        self.target
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn hsn_code(&self) -> &str {
        &self.hsn_code
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn rate_with_tax(&self) -> f64 {
        self.rate_with_tax
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn cgst(&self) -> &str {
        &self.cgst
    }

    pub fn sgst(&self) -> &str {
        &self.sgst
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    // Missing or unparsable percentages count as zero here; submit rejects them.
    fn tax_multiplier(&self) -> f64 {
        let cgst = parse_percent(&self.cgst).unwrap_or(0.0);
        let sgst = parse_percent(&self.sgst).unwrap_or(0.0);
        let total = cgst + sgst;
        1.0 + total / 100.0
    }

    fn reprice_from_rate(&mut self) {
        self.rate_with_tax = self.rate * self.tax_multiplier();
        self.amount = self.quantity * self.rate;
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = value.into();
        self.errors.clear(Field::Description);
    }

    pub fn set_hsn_code(&mut self, value: impl Into<String>) {
        self.hsn_code = value.into();
        self.errors.clear(Field::HsnCode);
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
        self.errors.clear(Field::Unit);
    }

    /// Rate with tax is left as it was.
    pub fn set_quantity(&mut self, quantity: f64) {
        self.quantity = quantity;
        self.amount = quantity * self.rate;
        self.errors.clear(Field::Quantity);
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
        self.reprice_from_rate();
        self.errors.clear(Field::Rate);
    }

    /// Back-solves the pre-tax rate from a tax-inclusive one.
    pub fn set_rate_with_tax(&mut self, rate_with_tax: f64) {
        self.rate_with_tax = rate_with_tax;
        let multiplier = self.tax_multiplier();
        if multiplier != 0.0 {
            self.rate = rate_with_tax / multiplier;
        }
        self.amount = self.quantity * self.rate;
        self.errors.clear(Field::RateWithTax);
        self.errors.clear(Field::Rate);
    }

    pub fn set_cgst(&mut self, value: impl Into<String>) {
        self.cgst = value.into();
        self.reprice_from_rate();
        self.errors.clear(Field::Cgst);
    }

    pub fn set_sgst(&mut self, value: impl Into<String>) {
        self.sgst = value.into();
        self.reprice_from_rate();
        self.errors.clear(Field::Sgst);
    }

    /// Checks every field, replacing the stored errors. Returns true when the
    /// item can be submitted.
    pub fn validate(&mut self) -> bool {
        let mut errors = ValidationErrors::default();

        if self.description.trim().is_empty() {
            errors.insert(Field::Description, "Description is required");
        }
        if self.hsn_code.trim().is_empty() {
            errors.insert(Field::HsnCode, "HSN/SAC code is required");
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            errors.insert(Field::Quantity, "Quantity must be greater than 0");
        }
        if !self.rate.is_finite() || self.rate <= 0.0 {
            errors.insert(Field::Rate, "Rate must be greater than 0");
        }
        if parse_percent(&self.cgst).is_none() {
            errors.insert(Field::Cgst, "CGST is required");
        }
        if parse_percent(&self.sgst).is_none() {
            errors.insert(Field::Sgst, "SGST is required");
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Validates and, on success, hands back the finished item. On failure
    /// the field values are left untouched and the errors are kept on the
    /// editor as well as returned.
    pub fn submit(&mut self) -> Result<EditorOutcome, ValidationErrors> {
        if !self.validate() {
            return Err(self.errors.clone());
        }

        let fields = ItemInput {
            description: self.description.trim().to_string(),
            hsn_code: self.hsn_code.trim().to_string(),
            quantity: self.quantity,
            unit: self.unit,
            rate: self.rate,
            rate_with_tax: self.rate_with_tax,
            cgst: parse_percent(&self.cgst).unwrap_or(0.0),
            sgst: parse_percent(&self.sgst).unwrap_or(0.0),
            amount: self.amount,
        };

        Ok(match self.target {
            Some(id) => EditorOutcome::Replace(BillItem { id, fields }),
            None => EditorOutcome::Add(fields),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn editor() -> ItemEditor {
        ItemEditor::new(&TaxConfig::default())
    }

    fn filled() -> ItemEditor {
        let mut e = editor();
        e.set_description("Steel rod");
        e.set_hsn_code("7214");
        e.set_quantity(2.0);
        e.set_rate(100.0);
        e
    }

    #[test]
    fn new_editor_prefills_default_split() {
        let e = editor();
        assert_eq!(e.cgst(), "9");
        assert_eq!(e.sgst(), "9");
        assert_eq!(e.quantity(), 1.0);
        assert_eq!(e.unit(), Unit::Nos);
        assert!(e.target().is_none());
    }

    #[test]
    fn rate_edit_derives_rate_with_tax_and_amount() {
        let e = filled();
        assert!((e.rate_with_tax() - 118.0).abs() < EPS);
        assert!((e.amount() - 200.0).abs() < EPS);
    }

    #[test]
    fn rate_edit_is_idempotent() {
        let mut e = filled();
        e.set_rate(37.5);
        let once = (e.rate_with_tax(), e.amount());
        e.set_rate(37.5);
        assert_eq!((e.rate_with_tax(), e.amount()), once);
    }

    #[test]
    fn tax_edit_reprices_from_rate() {
        let mut e = filled();
        e.set_cgst("2.5");
        e.set_sgst("2.5");
        assert!((e.rate_with_tax() - 105.0).abs() < EPS);
        assert!((e.amount() - 200.0).abs() < EPS);
    }

    #[test]
    fn rate_with_tax_back_solves_rate() {
        let mut e = filled();
        e.set_rate_with_tax(236.0);
        assert!((e.rate() - 200.0).abs() < EPS);
        assert!((e.amount() - 400.0).abs() < EPS);
    }

    #[test]
    fn rate_with_tax_round_trip() {
        for (cgst, sgst, inclusive) in [("9", "9", 123.45), ("0", "0", 10.0), ("-20", "-30", 7.0), ("14", "14", 0.01)] {
            let mut e = filled();
            e.set_cgst(cgst);
            e.set_sgst(sgst);
            e.set_rate_with_tax(inclusive);
            let pre_tax = e.rate();
            e.set_rate(pre_tax);
            assert!((e.rate_with_tax() - inclusive).abs() < 1e-9, "{cgst}/{sgst}");
        }
    }

    #[test]
    fn quantity_edit_keeps_rate_with_tax() {
        let mut e = filled();
        let inclusive = e.rate_with_tax();
        e.set_quantity(5.0);
        assert_eq!(e.rate_with_tax(), inclusive);
        assert!((e.amount() - 500.0).abs() < EPS);
    }

    #[test]
    fn missing_tax_counts_as_zero_for_pricing() {
        let mut e = filled();
        e.set_cgst("");
        e.set_sgst("abc");
        assert!((e.rate_with_tax() - 100.0).abs() < EPS);
    }

    #[test]
    fn empty_description_only_flags_description() {
        let mut e = filled();
        e.set_description("   ");
        let errors = e.submit().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Description), Some("Description is required"));
        assert_eq!(e.hsn_code(), "7214");
        assert!((e.amount() - 200.0).abs() < EPS);
    }

    #[test]
    fn every_rule_reports_its_field() {
        let mut e = editor();
        e.set_quantity(0.0);
        e.set_cgst("");
        e.set_sgst("x");
        let errors = e.submit().unwrap_err();
        assert_eq!(errors.get(Field::Description), Some("Description is required"));
        assert_eq!(errors.get(Field::HsnCode), Some("HSN/SAC code is required"));
        assert_eq!(errors.get(Field::Quantity), Some("Quantity must be greater than 0"));
        assert_eq!(errors.get(Field::Rate), Some("Rate must be greater than 0"));
        assert_eq!(errors.get(Field::Cgst), Some("CGST is required"));
        assert_eq!(errors.get(Field::Sgst), Some("SGST is required"));
        assert_eq!(errors.get(Field::Unit), None);
    }

    #[test]
    fn unbounded_numbers_are_rejected() {
        let mut e = filled();
        e.set_quantity(f64::INFINITY);
        e.set_rate(f64::INFINITY);
        let errors = e.submit().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::Quantity), Some("Quantity must be greater than 0"));
        assert_eq!(errors.get(Field::Rate), Some("Rate must be greater than 0"));

        e.set_quantity(2.0);
        e.set_rate(f64::NAN);
        assert_eq!(e.submit().unwrap_err().get(Field::Rate), Some("Rate must be greater than 0"));

        e.set_rate(100.0);
        assert!(e.submit().is_ok());
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut e = editor();
        assert!(!e.validate());
        e.set_description("Sand");
        assert_eq!(e.error(Field::Description), None);
        assert!(e.error(Field::HsnCode).is_some());
    }

    #[test]
    fn submit_new_item_yields_add() {
        let mut e = filled();
        e.set_unit(Unit::Kg);
        match e.submit() {
            Ok(EditorOutcome::Add(input)) => {
                assert_eq!(input.description, "Steel rod");
                assert_eq!(input.unit, Unit::Kg);
                assert_eq!(input.cgst, 9.0);
                assert_eq!(input.sgst, 9.0);
                assert!((input.amount - 200.0).abs() < EPS);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn editing_existing_item_yields_replacement_with_same_id() {
        let item = match filled().submit() {
            Ok(EditorOutcome::Add(fields)) => BillItem { id: ItemId::generate(), fields },
            other => panic!("unexpected outcome: {other:?}"),
        };

        let mut e = ItemEditor::for_item(&item);
        assert_eq!(e.description(), "Steel rod");
        assert_eq!(e.cgst(), "9");
        e.set_quantity(3.0);

        match e.submit() {
            Ok(EditorOutcome::Replace(updated)) => {
                assert_eq!(updated.id, item.id);
                assert!((updated.fields.amount - 300.0).abs() < EPS);
                assert_eq!(updated.fields.rate_with_tax, item.fields.rate_with_tax);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
