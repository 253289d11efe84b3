use chrono::Datelike;
use log::{debug, info};
use slug::slugify;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::bill::Bill;
use crate::error::{InvoiceError, Result};
use crate::model::SellerConfig;
use crate::render::{RenderMode, Renderer};

/// `<output_root>/<year>/<bill number>_<buyer slug>[_preview].html`
pub fn document_path(output_root: &Path, bill: &Bill, mode: RenderMode) -> PathBuf {
    let buyer = if bill.buyer().name.trim().is_empty() {
        "walk-in".to_string()
    } else {
        slugify(&bill.buyer().name)
    };
    let suffix = match mode {
        RenderMode::Preview => "_preview",
        RenderMode::Print => "",
    };
    output_root
        .join(bill.date().year().to_string())
        .join(format!("{}_{}{}.html", bill.bill_number(), buyer, suffix))
}

/// Renders the bill and writes it under `output_root`. Refuses an empty bill.
pub fn write_document(
    renderer: &Renderer,
    bill: &Bill,
    seller: &SellerConfig,
    output_root: &Path,
    mode: RenderMode,
) -> Result<PathBuf> {
    if bill.is_empty() {
        return Err(InvoiceError::EmptyBill);
    }

    let html = renderer.render(bill, seller, mode)?;
    let path = document_path(output_root, bill, mode);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&path, html)?;
    info!("wrote {}", path.display());
    Ok(path)
}

/// Writes the self-printing document and hands it to the platform viewer.
/// Returns the written path and whether the viewer could be launched; a
/// viewer that fails to start leaves the document on disk and nothing else.
pub fn print_bill(
    renderer: &Renderer,
    bill: &Bill,
    seller: &SellerConfig,
    output_root: &Path,
) -> Result<(PathBuf, bool)> {
    let path = write_document(renderer, bill, seller, output_root, RenderMode::Print)?;
    let opened = open_in_viewer(&path);
    Ok((path, opened))
}

pub fn preview_bill(
    renderer: &Renderer,
    bill: &Bill,
    seller: &SellerConfig,
    output_root: &Path,
) -> Result<(PathBuf, bool)> {
    let path = write_document(renderer, bill, seller, output_root, RenderMode::Preview)?;
    let opened = open_in_viewer(&path);
    Ok((path, opened))
}

// Open a file or folder with the platform default handler
pub fn open_in_viewer(path: &Path) -> bool {
    #[cfg(target_os = "macos")]
    let spawned = Command::new("open").arg(path).spawn();

    #[cfg(target_os = "windows")]
    let spawned = Command::new("explorer").arg(path).spawn();

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let spawned = Command::new("xdg-open").arg(path).spawn();

    match spawned {
        Ok(_) => true,
        Err(e) => {
            debug!("could not open {}: {}", path.display(), e);
            false
        }
    }
}
