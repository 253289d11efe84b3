//! # Error Types
//!
//! Failures outside the item editor's field validation. Those are reported
//! through [`crate::editor::ValidationErrors`] and re-prompted by the session;
//! only an edit of an item that is no longer on the bill surfaces here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Printing needs at least one line item
    #[error("Bill has no items to print")]
    EmptyBill,

    /// An item edit that could not be applied to the bill
    #[error(transparent)]
    Apply(#[from] crate::bill::ApplyError),

    /// A configuration file exists but could not be parsed
    #[error("Invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// Prompt aborted or failed
    #[error("Prompt error: {0}")]
    Prompt(#[from] inquire::InquireError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
