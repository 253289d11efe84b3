use directories::{BaseDirs, ProjectDirs};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InvoiceError, Result};
use crate::model::{SellerConfig, TaxConfig};

// Written to the data root on first use, then edited by hand.
pub const DEFAULT_SELLER_TEMPLATE: &str = include_str!("../seller.toml");
pub const DEFAULT_TAX_TEMPLATE: &str = include_str!("../tax_rates.toml");

pub const DEFAULT_DATA_ROOT: &str = "~/Documents/Invoices";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppSettings {
    pub data_root: String,
}

impl AppSettings {
    pub fn root(&self) -> PathBuf {
        PathBuf::from(expand_home_dir(&self.data_root))
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("in", "gst-invoice", "app") {
        let config_dir = proj_dirs.config_dir();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).ok();
        }
        return config_dir.join("settings.toml");
    }
    PathBuf::from("settings.toml")
}

pub fn load_settings() -> Option<AppSettings> {
    let path = get_config_path();
    if !path.exists() {
        return None;
    }
    let content = fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(settings) => Some(settings),
        Err(e) => {
            debug!("ignoring unreadable {}: {}", path.display(), e);
            None
        }
    }
}

pub fn save_settings(settings: &AppSettings) -> Result<PathBuf> {
    let path = get_config_path();
    fs::write(&path, toml::to_string_pretty(settings)?)?;
    Ok(path)
}

pub fn expand_home_dir(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(base_dirs) = BaseDirs::new() {
            let home = base_dirs.home_dir().to_string_lossy();
            return path.replacen('~', &home, 1);
        }
    }
    path.to_string()
}

/// Parses `path`, first writing `default_text` there if the file is missing.
fn load_or_init<T: DeserializeOwned>(path: &Path, default_text: &str) -> Result<T> {
    if !path.exists() {
        info!("initializing {}", path.display());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, default_text)?;
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|source| InvoiceError::Config {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_seller_config(root: &Path) -> Result<SellerConfig> {
    load_or_init(&root.join("seller.toml"), DEFAULT_SELLER_TEMPLATE)
}

pub fn load_tax_config(root: &Path) -> Result<TaxConfig> {
    load_or_init(&root.join("tax_rates.toml"), DEFAULT_TAX_TEMPLATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("gst-invoice-test-{}", Uuid::new_v4()))
    }

    #[test]
    fn bundled_defaults_parse() {
        let seller: SellerConfig = toml::from_str(DEFAULT_SELLER_TEMPLATE).unwrap();
        assert!(!seller.company_name.is_empty());
        assert!(seller.bank.is_some());

        let tax: TaxConfig = toml::from_str(DEFAULT_TAX_TEMPLATE).unwrap();
        assert_eq!(tax, TaxConfig::default());
    }

    #[test]
    fn seller_without_optional_sections() {
        let seller: SellerConfig = toml::from_str(
            r#"
            company_name = "A"
            address_line1 = "B"
            address_line2 = "C"
            gstin = "D"
            phone = "E"
            email = "F"
            place_of_supply = "G"
            "#,
        )
        .unwrap();
        assert!(seller.bank.is_none());
        assert!(seller.terms.is_empty());
        assert!(seller.declaration.is_none());
    }

    #[test]
    fn missing_files_are_initialized() {
        let root = scratch_dir();
        let seller = load_seller_config(&root).unwrap();
        assert!(root.join("seller.toml").exists());
        let expected: SellerConfig = toml::from_str(DEFAULT_SELLER_TEMPLATE).unwrap();
        assert_eq!(seller, expected);

        let tax = load_tax_config(&root).unwrap();
        assert_eq!(tax.gst, 18.0);
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn existing_file_wins_over_default() {
        let root = scratch_dir();
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("tax_rates.toml"), "gst = 12.0\n").unwrap();
        assert_eq!(load_tax_config(&root).unwrap().default_split(), (6.0, 6.0));
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn broken_file_reports_path() {
        let root = scratch_dir();
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("tax_rates.toml"), "gst = \"lots\"\n").unwrap();
        match load_tax_config(&root) {
            Err(InvoiceError::Config { path, .. }) => assert!(path.ends_with("tax_rates.toml")),
            other => panic!("expected config error, got {other:?}"),
        }
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn home_is_expanded() {
        let expanded = expand_home_dir("~/Invoices");
        match BaseDirs::new() {
            Some(dirs) => assert_eq!(PathBuf::from(&expanded), dirs.home_dir().join("Invoices")),
            None => assert_eq!(expanded, "~/Invoices"),
        }
        assert_eq!(expand_home_dir("/srv/invoices"), "/srv/invoices");
    }
}
