use clap::{CommandFactory, Parser, Subcommand};
use inquire::{InquireError, Select, Text};
use log::{LevelFilter, debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gst_invoice::config::{AppSettings, DEFAULT_DATA_ROOT, load_settings, save_settings};
use gst_invoice::error::{InvoiceError, Result};
use gst_invoice::print::open_in_viewer;
use gst_invoice::session::Session;
use gst_invoice::words::amount_to_words;

// ==========================================
// CLI
// ==========================================

#[derive(Parser)]
#[command(name = "gst-invoice", about = "GST invoice generator")]
struct Cli {
    /// Log progress at info level (otherwise RUST_LOG decides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new invoice
    New,
    /// Spell out an amount in words (Indian numbering)
    Words {
        /// Amount in rupees, e.g. 1234567.50
        amount: f64,
    },
    /// Configure data directory
    Config,
    /// Open output folder
    Open,
}

// ==========================================
// Main Function
// ==========================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::builder().filter_level(LevelFilter::Info).init();
        info!("Verbose output enabled (ignoring RUST_LOG environment variable)");
    } else {
        env_logger::init();
        debug!("Logging configured from environment variables");
    }

    let Some(command) = cli.command else {
        Cli::command().print_help().ok();
        return ExitCode::SUCCESS;
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(InvoiceError::Prompt(InquireError::OperationCanceled | InquireError::OperationInterrupted)) => {
            println!("Operation cancelled.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Words { amount } => {
            println!("{}", amount_to_words(amount));
            Ok(())
        }
        Commands::Config => setup_config_wizard().map(|_| ()),
        Commands::New => {
            let root = data_root()?;
            Session::new(&root)?.run()
        }
        Commands::Open => {
            let root = data_root()?;
            open_folder_wizard(&root.join("output"))
        }
    }
}

/// Data root from saved settings, running the setup wizard on first use.
fn data_root() -> Result<PathBuf> {
    let settings = match load_settings() {
        Some(s) => s,
        None => setup_config_wizard()?,
    };
    let root = settings.root();
    fs::create_dir_all(&root)?;
    Ok(root)
}

// ==========================================
// Config & Folders
// ==========================================

fn setup_config_wizard() -> Result<AppSettings> {
    println!("\n⚙️  --- Configuration Setup ---");
    let current = load_settings();
    let default_val = current
        .map(|s| s.data_root)
        .unwrap_or_else(|| DEFAULT_DATA_ROOT.to_string());

    println!("📂 Opening folder picker...");
    let picked_path = rfd::FileDialog::new()
        .set_title("Select Invoice Data Directory")
        .pick_folder();

    let data_root = match picked_path {
        Some(path) => path.to_string_lossy().to_string(),
        None => {
            println!("❌ No folder selected. Falling back to manual input.");
            Text::new("Enter Invoice Data Directory:")
                .with_default(&default_val)
                .prompt()?
        }
    };

    let settings = AppSettings { data_root };
    let path = save_settings(&settings)?;
    println!("✅ Settings saved to {:?}", path);
    Ok(settings)
}

fn open_folder_wizard(output_root: &Path) -> Result<()> {
    let root_opt = "📂 Open Root Output Directory".to_string();

    let mut years: Vec<String> = Vec::new();
    if let Ok(entries) = fs::read_dir(output_root) {
        for entry in entries.flatten() {
            if entry.path().is_dir() {
                years.push(entry.file_name().to_string_lossy().to_string());
            }
        }
    }
    years.sort();
    years.reverse();

    let mut options = vec![root_opt.clone()];
    options.extend(years);

    let choice = Select::new("Select Folder to Open:", options).prompt()?;
    let target = if choice == root_opt {
        output_root.to_path_buf()
    } else {
        output_root.join(&choice)
    };

    fs::create_dir_all(&target)?;
    println!("🚀 Opening: {:?}", target);
    open_in_viewer(&target);
    Ok(())
}
