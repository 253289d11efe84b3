//! GST invoice generator.
//!
//! A bill is built up in memory one line item at a time. Every change to the
//! item list recomputes the subtotal, CGST, SGST and total, and the finished
//! bill is rendered to a standalone HTML document that prints itself.

pub mod bill;
pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod print;
pub mod render;
pub mod session;
pub mod totals;
pub mod words;

pub use bill::{ApplyError, Bill};
pub use editor::{EditorOutcome, Field, ItemEditor, ValidationErrors};
pub use error::InvoiceError;
pub use model::{BillItem, BuyerDetails, ItemId, ItemInput, SellerConfig, TaxConfig, Unit};
pub use render::{RenderMode, Renderer};
pub use totals::Totals;
pub use words::amount_to_words;
