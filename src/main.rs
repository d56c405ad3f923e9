mod cli;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use cli::{Cli, Commands, FilterArgs};
use dealhunt::catalog::{Catalog, FilterChange, PriceRange, SortKey};
use dealhunt::config::{AppConfig, ConfigOverrides};
use dealhunt::model::DealId;
use dealhunt::output::{self, DealCard};
use dealhunt::session::{self, Session};
use dealhunt::source::{self, Origin};
use dealhunt::store::FileStore;
use dealhunt::wishlist::Wishlist;
use dealhunt::{actions, countdown};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "dealhunt=debug"
    } else {
        "dealhunt=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(ConfigOverrides {
        source: cli.source,
        storefront: cli.storefront,
        page_size: cli.page_size,
        data_dir: cli.data_dir,
        debug: cli.debug,
    })?;

    ctrlc::set_handler(|| {
        eprintln!("\nInterrupted.");
        std::process::exit(130);
    })
    .context("Failed to set Ctrl+C handler")?;

    match cli.command {
        Commands::Countdown => cmd_countdown(),
        command => run_with_catalog(&config, command).await?,
    }

    Ok(())
}

async fn run_with_catalog(config: &AppConfig, command: Commands) -> Result<()> {
    let catalog = load_catalog(config).await;
    let wishlist = Wishlist::load(
        FileStore::new(config.data_dir.clone()),
        config.storefront.wishlist_key(),
    );
    let currency = config.storefront.currency();

    match command {
        Commands::List { filters, pages } => cmd_list(catalog, &wishlist, currency, &filters, pages)?,
        Commands::Show { id } => {
            let id = DealId::new(id);
            let deal = catalog
                .find(&id)
                .with_context(|| format!("Deal not found: {}", id))?;
            print!(
                "{}",
                output::format_deal_detail(deal, wishlist.contains(&id), currency, Utc::now())
            );
        }
        Commands::Get { id, open } => {
            let id = DealId::new(id);
            let deal = catalog
                .find(&id)
                .with_context(|| format!("Deal not found: {}", id))?;
            let url = actions::acquire(deal)?;
            println!("Redirecting to Amazon for \"{}\": {}", deal.title, url);
            if open {
                actions::open_in_browser(&url).context("Failed to open browser")?;
            }
        }
        Commands::Save { id } => {
            let id = DealId::new(id);
            if catalog.find(&id).is_none() {
                anyhow::bail!("Deal not found: {}", id);
            }
            let mut wishlist = wishlist;
            if wishlist.toggle_saved(&id).context("Failed to update saved deals")? {
                println!("Deal {} saved successfully!", id);
            } else {
                println!("Deal {} removed from saved list", id);
            }
        }
        Commands::Saved => cmd_saved(&catalog, &wishlist, currency),
        Commands::Stats => print!("{}", output::format_stats(&catalog.stats(), currency)),
        Commands::Browse { open } => {
            let mut session = Session::new(catalog, wishlist, currency).with_open_links(open);
            let (tx, rx) = mpsc::channel(32);
            tokio::spawn(async move {
                let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
            });
            println!("Type 'help' for commands.\n");
            let mut out = std::io::stdout().lock();
            session::run(&mut session, rx, &mut out).await?;
        }
        Commands::Countdown => cmd_countdown(),
    }

    Ok(())
}

fn cmd_countdown() {
    let now = Local::now().naive_local();
    println!(
        "Next deal refresh at {} (in {})",
        countdown::next_refresh(now).format("%H:%M"),
        countdown::format_countdown(countdown::time_until_refresh(now))
    );
}

async fn load_catalog(config: &AppConfig) -> Catalog {
    eprintln!("Loading deals...");
    let loaded = source::load_deals(&config.source, config.storefront, Utc::now()).await;
    if loaded.origin == Origin::Fallback {
        tracing::info!("Using {} built-in deals", loaded.deals.len());
    }
    Catalog::new(loaded.deals, config.page_size)
}

fn filter_changes(args: &FilterArgs) -> Result<Vec<FilterChange>> {
    let price = args
        .price
        .as_deref()
        .map(str::parse::<PriceRange>)
        .transpose()?;
    Ok(vec![
        FilterChange::Category(args.category.clone()),
        FilterChange::MinDiscount(args.min_discount),
        FilterChange::PriceRange(price),
        FilterChange::Search(args.search.clone()),
        FilterChange::Sort(SortKey::parse_lossy(&args.sort)),
    ])
}

fn cmd_list(
    mut catalog: Catalog,
    wishlist: &Wishlist<FileStore>,
    currency: &str,
    filters: &FilterArgs,
    pages: usize,
) -> Result<()> {
    catalog.set_filter(filter_changes(filters)?);
    for _ in 1..pages.max(1) {
        catalog.load_more();
    }

    let now = Utc::now();
    let cards: Vec<DealCard> = catalog
        .visible()
        .into_iter()
        .map(|deal| DealCard::new(deal, wishlist.contains(&deal.id), currency, now))
        .collect();
    let tags = catalog.active_filters(output::currency_symbol(currency));
    print!(
        "{}",
        output::format_deal_list(&cards, catalog.filtered_count(), &tags)
    );
    Ok(())
}

fn cmd_saved(catalog: &Catalog, wishlist: &Wishlist<FileStore>, currency: &str) {
    let now = Utc::now();
    let cards: Vec<DealCard> = wishlist
        .ids()
        .filter_map(|id| catalog.find(&id))
        .map(|deal| DealCard::new(deal, true, currency, now))
        .collect();
    if cards.is_empty() {
        println!("No saved deals yet. Use `dealhunt save <id>` to save one.");
        return;
    }
    print!("{}", output::format_deal_list(&cards, cards.len(), &[]));
}
