use chrono::{Local, NaiveDate};
use log::debug;
use thiserror::Error;

use crate::editor::{EditorOutcome, ItemEditor, ValidationErrors};
use crate::model::{BillItem, BuyerDetails, ItemId, ItemInput};
use crate::totals::Totals;

/// Why an editor could not be applied to a bill.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// One or more fields failed validation
    #[error("Invalid item: {0}")]
    Invalid(#[from] ValidationErrors),

    /// The edited item is no longer on the bill
    #[error("No item with id {0} on this bill")]
    UnknownItem(ItemId),
}

/// The invoice being edited in the current session.
///
/// Totals are private and recomputed after every change to the item list, so
/// they always match `items`.
#[derive(Debug, Clone)]
pub struct Bill {
    bill_number: String,
    date: NaiveDate,
    buyer: BuyerDetails,
    items: Vec<BillItem>,
    note: Option<String>,
    totals: Totals,
}

impl Bill {
    /// Starts a bill dated today with a number taken from the current time.
    pub fn start() -> Self {
        let now = Local::now();
        Bill::with_number(format!("INV-{}", now.timestamp_millis()), now.date_naive())
    }

    pub fn with_number(bill_number: impl Into<String>, date: NaiveDate) -> Self {
        Bill {
            bill_number: bill_number.into(),
            date,
            buyer: BuyerDetails::default(),
            items: Vec::new(),
            note: None,
            totals: Totals::default(),
        }
    }

    pub fn bill_number(&self) -> &str {
        &self.bill_number
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn buyer(&self) -> &BuyerDetails {
        &self.buyer
    }

    pub fn items(&self) -> &[BillItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&BillItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn set_buyer(&mut self, buyer: BuyerDetails) {
        self.buyer = buyer;
    }

    /// Blank or whitespace-only notes clear the note section.
    pub fn set_note(&mut self, note: impl Into<String>) {
        let note = note.into();
        self.note = if note.trim().is_empty() { None } else { Some(note) };
    }

    fn recompute(&mut self) {
        self.totals = Totals::of(&self.items);
        debug!(
            "{}: {} item(s), total {:.2}",
            self.bill_number,
            self.items.len(),
            self.totals.total
        );
    }

    /// Appends a new item at the end of the list and returns its fresh id.
    pub fn add_item(&mut self, fields: ItemInput) -> ItemId {
        let id = ItemId::generate();
        self.items.push(BillItem { id, fields });
        self.recompute();
        id
    }

    /// Replaces the item carrying the same id, keeping its position. Returns
    /// false if no such item exists.
    pub fn replace_item(&mut self, item: BillItem) -> bool {
        let Some(slot) = self.items.iter_mut().find(|i| i.id == item.id) else {
            return false;
        };
        *slot = item;
        self.recompute();
        true
    }

    pub fn delete_item(&mut self, id: ItemId) -> Option<BillItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        let removed = self.items.remove(index);
        self.recompute();
        Some(removed)
    }

    /// Submits an editor against this bill: a new item is appended, an
    /// edited one replaced. The bill is untouched when validation fails or
    /// when the edited item has since been deleted.
    pub fn apply(&mut self, editor: &mut ItemEditor) -> Result<ItemId, ApplyError> {
        match editor.submit()? {
            EditorOutcome::Add(fields) => Ok(self.add_item(fields)),
            EditorOutcome::Replace(item) => {
                let id = item.id;
                if self.replace_item(item) {
                    Ok(id)
                } else {
                    Err(ApplyError::UnknownItem(id))
                }
            }
        }
    }
}
