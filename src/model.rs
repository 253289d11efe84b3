use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::totals::Totals;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Nos,
    Kg,
    Ton,
    Ltr,
    Mtr,
    Sqft,
    Bag,
    Box,
    Set,
    Pair,
}

impl Unit {
    pub const ALL: [Unit; 10] = [
        Unit::Nos,
        Unit::Kg,
        Unit::Ton,
        Unit::Ltr,
        Unit::Mtr,
        Unit::Sqft,
        Unit::Bag,
        Unit::Box,
        Unit::Set,
        Unit::Pair,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Nos => "Nos",
            Unit::Kg => "Kg",
            Unit::Ton => "Ton",
            Unit::Ltr => "Ltr",
            Unit::Mtr => "Mtr",
            Unit::Sqft => "Sqft",
            Unit::Bag => "Bag",
            Unit::Box => "Box",
            Unit::Set => "Set",
            Unit::Pair => "Pair",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier handed out when an item joins a bill.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn generate() -> Self {
        ItemId(Uuid::new_v4())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A line item before it has been given an id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ItemInput {
    pub description: String,
    pub hsn_code: String,
    pub quantity: f64,
    pub unit: Unit,
    pub rate: f64,          // pre-tax unit price
    pub rate_with_tax: f64, // derived from rate and the two percentages
    pub cgst: f64,          // percent
    pub sgst: f64,          // percent
    pub amount: f64,        // quantity * rate
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BillItem {
    pub id: ItemId,
    #[serde(flatten)]
    pub fields: ItemInput,
}

impl BillItem {
    pub fn cgst_amount(&self) -> f64 {
        self.fields.amount * self.fields.cgst / 100.0
    }

    pub fn sgst_amount(&self) -> f64 {
        self.fields.amount * self.fields.sgst / 100.0
    }

    pub fn line_total(&self) -> f64 {
        self.fields.amount + self.cgst_amount() + self.sgst_amount()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BuyerDetails {
    pub name: String,
    pub address: String,
    pub gst_number: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BankDetails {
    pub account_name: String,
    pub bank_name: String,
    pub branch: String,
    pub ifsc: String,
    pub account_number: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SellerConfig {
    pub company_name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub gstin: String,
    pub phone: String,
    pub email: String,
    pub place_of_supply: String,
    pub bank: Option<BankDetails>,
    #[serde(default)]
    pub terms: Vec<String>,
    pub declaration: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct TaxConfig {
    pub gst: f64, // percent, split evenly into CGST and SGST
}

impl TaxConfig {
    /// Default (cgst, sgst) pre-fill for items that do not state their own rates.
    pub fn default_split(&self) -> (f64, f64) {
        let half = self.gst / 2.0;
        (half, half)
    }
}

impl Default for TaxConfig {
    fn default() -> Self {
        TaxConfig { gst: 18.0 }
    }
}

/// One row of the tax table, with every figure already computed.
#[derive(Debug, Serialize, Clone)]
pub struct ItemRow {
    pub description: String,
    pub hsn_code: String,
    pub quantity: f64,
    pub unit: String,
    pub rate: f64,
    pub rate_with_tax: f64,
    pub amount: f64,
    pub cgst_amount: f64,
    pub sgst_amount: f64,
    pub line_total: f64,
}

impl From<&BillItem> for ItemRow {
    fn from(item: &BillItem) -> Self {
        ItemRow {
            description: item.fields.description.clone(),
            hsn_code: item.fields.hsn_code.clone(),
            quantity: item.fields.quantity,
            unit: item.fields.unit.to_string(),
            rate: item.fields.rate,
            rate_with_tax: item.fields.rate_with_tax,
            amount: item.fields.amount,
            cgst_amount: item.cgst_amount(),
            sgst_amount: item.sgst_amount(),
            line_total: item.line_total(),
        }
    }
}

#[derive(Serialize)]
pub struct InvoiceContext {
    pub bill_number: String,
    pub date: String,
    pub seller: SellerConfig,
    pub buyer: BuyerDetails,
    pub rows: Vec<ItemRow>,
    pub totals: Totals,
    pub amount_in_words: String,
    pub note: Option<String>,
    pub auto_print: bool,
    pub print_delay_ms: u64,
}
