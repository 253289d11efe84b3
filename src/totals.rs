use serde::Serialize;

use crate::model::BillItem;

/// Invoice-level figures derived from the item list.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub subtotal: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub total: f64,
}

impl Totals {
    /// Sums every item at its own CGST/SGST percentage. Nothing is rounded here;
    /// rounding to two places happens when the figures are displayed.
    pub fn of(items: &[BillItem]) -> Totals {
        let subtotal: f64 = items.iter().map(|i| i.fields.amount).sum();
        let cgst: f64 = items.iter().map(BillItem::cgst_amount).sum();
        let sgst: f64 = items.iter().map(BillItem::sgst_amount).sum();

        Totals {
            subtotal,
            cgst,
            sgst,
            total: subtotal + cgst + sgst,
        }
    }
}
