use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dealhunt",
    version,
    about = "Browse, filter and save affiliate deals from the command line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Deal data: a JSON file path or http(s) URL (default: data/deals.json)
    #[arg(long, global = true)]
    pub source: Option<String>,

    /// Storefront profile: dealhunt or affiliate-grid
    #[arg(long, global = true)]
    pub storefront: Option<String>,

    /// Deals per page (default: 12)
    #[arg(long, global = true)]
    pub page_size: Option<usize>,

    /// Directory holding the saved-deal list
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only deals in this category (e.g., electronics, home)
    #[arg(long)]
    pub category: Option<String>,

    /// Minimum discount percentage
    #[arg(long)]
    pub min_discount: Option<u32>,

    /// Price range MIN-MAX; omit MAX for no upper bound (e.g., 25-50, 100-)
    #[arg(long)]
    pub price: Option<String>,

    /// Case-insensitive title search
    #[arg(long)]
    pub search: Option<String>,

    /// Sort order: newest, discount-desc, price-asc, price-desc, popularity-desc
    #[arg(long, default_value = "newest")]
    pub sort: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List deals matching the given filters
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Number of pages to show (each page adds --page-size deals)
        #[arg(long, default_value = "1")]
        pages: usize,
    },

    /// Show full details for one deal
    Show {
        /// Deal ID
        id: String,
    },

    /// Get a deal: print its link and optionally open it
    Get {
        /// Deal ID
        id: String,

        /// Open the link in the default browser
        #[arg(long)]
        open: bool,
    },

    /// Toggle a deal in the saved list
    Save {
        /// Deal ID
        id: String,
    },

    /// List saved deals
    Saved,

    /// Catalog statistics
    Stats,

    /// Time until the next deal refresh
    Countdown,

    /// Interactive session with live filtering
    Browse {
        /// Open links from `get` in the default browser
        #[arg(long)]
        open: bool,
    },
}
