//! Showcase CLI - Catalog sync for visitors and the admin editor.
//!
//! # Usage
//!
//! ```bash
//! # Load the catalog the way a visitor would (remote first, cache fallback)
//! showcase load
//!
//! # Point the admin session at the shared document
//! showcase settings set --endpoint https://api.jsonbin.io/v3/b/<BIN_ID> --key <MASTER_KEY>
//!
//! # Edit locally
//! showcase product add --name "Edge NVR" --category Hardware --price "¥3,999"
//! showcase import cases cases.json
//!
//! # Push the local catalog to every visitor
//! showcase publish
//! ```
//!
//! # Commands
//!
//! - `load` - Fetch the remote catalog and refresh the local cache
//! - `status` - Show settings and cached data without touching the network
//! - `publish` - Replace the remote document with the local catalog
//! - `export` / `import` - Move collections in and out as JSON arrays
//! - `product` / `case` - Add or delete single records
//! - `settings` - Manage the admin's endpoint and key

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use showcase_core::ProductCategory;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::catalog::Collection;

const DEFAULT_LOG_FILTER: &str = "showcase_sync=info,showcase_cli=info";

#[derive(Parser)]
#[command(name = "showcase")]
#[command(author, version, about = "Showcase catalog sync tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the remote catalog (falling back to the local cache)
    Load,
    /// Show settings and cached data
    Status,
    /// Replace the remote document with the local catalog
    Publish {
        /// Answer yes to every confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Write a collection as a JSON array
    Export {
        #[arg(value_enum)]
        target: ExportTarget,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace a collection with a JSON array from a file
    Import {
        #[arg(value_enum)]
        target: ImportTarget,

        /// JSON file containing an array of records
        file: PathBuf,

        /// Skip the overwrite confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Manage products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage case studies
    Case {
        #[command(subcommand)]
        action: CaseAction,
    },
    /// Manage the admin's cloud settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportTarget {
    Products,
    Cases,
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum ImportTarget {
    Products,
    Cases,
}

#[derive(Subcommand)]
enum ProductAction {
    /// Add a product; unset fields keep placeholder text
    Add(ProductArgs),
    /// Delete a product by id
    Delete {
        id: String,

        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct ProductArgs {
    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// SKU or model number
    #[arg(short, long)]
    pub model: Option<String>,

    /// Hardware, Software or Service
    #[arg(short, long)]
    pub category: Option<ProductCategory>,

    #[arg(long)]
    pub sub_category: Option<String>,

    /// Display price, shown as entered
    #[arg(short, long)]
    pub price: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    /// Marketing highlight (repeatable)
    #[arg(long = "feature")]
    pub features: Vec<String>,

    /// Technical specification (repeatable)
    #[arg(long = "spec")]
    pub specs: Vec<String>,

    #[arg(long)]
    pub image_url: Option<String>,

    #[arg(long)]
    pub brochure_url: Option<String>,
}

#[derive(Subcommand)]
enum CaseAction {
    /// Add a case study; unset fields keep placeholder text
    Add(CaseArgs),
    /// Delete a case study by id
    Delete {
        id: String,

        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct CaseArgs {
    #[arg(short, long)]
    pub title: String,

    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,

    /// Link to the full write-up
    #[arg(long)]
    pub link_url: Option<String>,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show the stored admin settings and the public config
    Show,
    /// Store admin settings
    Set {
        /// Document URL, e.g. https://api.jsonbin.io/v3/b/<BIN_ID>
        #[arg(short, long)]
        endpoint: String,

        /// API key (master key, or a write-scoped access key)
        #[arg(short, long)]
        key: String,

        /// Store the settings but keep cloud sync off
        #[arg(long)]
        disabled: bool,
    },
    /// Remove the admin settings
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Load => commands::catalog::load().await?,
        Commands::Status => commands::catalog::status()?,
        Commands::Publish { yes } => commands::publish::publish(yes).await?,
        Commands::Export { target, output } => {
            let target = match target {
                ExportTarget::Products => Some(Collection::Products),
                ExportTarget::Cases => Some(Collection::Cases),
                ExportTarget::All => None,
            };
            commands::catalog::export(target, output.as_deref())?;
        }
        Commands::Import { target, file, yes } => {
            let target = match target {
                ImportTarget::Products => Collection::Products,
                ImportTarget::Cases => Collection::Cases,
            };
            commands::catalog::import(target, &file, yes)?;
        }
        Commands::Product { action } => match action {
            ProductAction::Add(args) => commands::records::add_product(args)?,
            ProductAction::Delete { id, yes } => commands::records::delete_product(&id, yes)?,
        },
        Commands::Case { action } => match action {
            CaseAction::Add(args) => commands::records::add_case(args)?,
            CaseAction::Delete { id, yes } => commands::records::delete_case(&id, yes)?,
        },
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show()?,
            SettingsAction::Set {
                endpoint,
                key,
                disabled,
            } => commands::settings::set(endpoint, key, !disabled)?,
            SettingsAction::Clear => commands::settings::clear()?,
        },
    }
    Ok(())
}
