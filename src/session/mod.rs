//! Interactive browsing session driven by a single-task event loop.
//!
//! Three event sources feed the loop: command lines, the search debounce
//! timer, and a one-second countdown tick. Each event is handled to
//! completion before the next one is polled.

pub mod debounce;

use crate::actions;
use crate::catalog::{Catalog, FilterChange, FilterKey, PriceRange, SortKey};
use crate::countdown;
use crate::error::DealHuntError;
use crate::model::DealId;
use crate::output::{self, DealCard};
use crate::store::KeyValueStore;
use crate::wishlist::Wishlist;
use chrono::{Local, NaiveDateTime, Utc};
use debounce::{Debouncer, SEARCH_QUIET_PERIOD};
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

const HELP: &str = "\
Commands:
  search <text>     filter titles (applied after typing pauses)
  category <name>   filter by category (no argument clears)
  discount <n>      minimum discount percentage (no argument clears)
  price <min-max>   price range, e.g. 25-50 or 100- (no argument clears)
  sort <key>        newest, discount-desc, price-asc, price-desc, popularity-desc
  remove <filter>   clear one of: category, discount, price, search
  clear             reset all filters
  more              load more deals
  save <id>         toggle a deal in your saved list
  get <id>          open the deal link
  show <id>         deal details
  stats             catalog statistics
  status            active filters and next refresh
  quit              exit
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    Category(Option<String>),
    Discount(Option<u32>),
    Price(Option<PriceRange>),
    Sort(SortKey),
    Remove(FilterKey),
    Clear,
    More,
    Save(DealId),
    Get(DealId),
    Show(DealId),
    Stats,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, DealHuntError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());
        let id = || {
            arg.as_deref()
                .map(DealId::from)
                .ok_or_else(|| DealHuntError::InvalidFilter(format!("'{}' needs a deal id", word)))
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "search" | "s" => Command::Search(rest.to_string()),
            "category" | "cat" => Command::Category(arg.clone()),
            "discount" => Command::Discount(match arg.as_deref() {
                Some(n) => Some(n.trim_end_matches('%').parse().map_err(|_| {
                    DealHuntError::InvalidFilter(format!("Invalid discount '{}'", n))
                })?),
                None => None,
            }),
            "price" => Command::Price(arg.as_deref().map(str::parse::<PriceRange>).transpose()?),
            "sort" => Command::Sort(SortKey::parse_lossy(rest)),
            "remove" | "rm" => Command::Remove(rest.parse()?),
            "clear" => Command::Clear,
            "more" | "m" => Command::More,
            "save" => Command::Save(id()?),
            "get" => Command::Get(id()?),
            "show" => Command::Show(id()?),
            "stats" => Command::Stats,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => {
                return Err(DealHuntError::InvalidFilter(format!(
                    "Unknown command '{}'. Type 'help' for a list",
                    other
                )))
            }
        };
        Ok(Some(command))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<S: KeyValueStore> {
    catalog: Catalog,
    wishlist: Wishlist<S>,
    currency: &'static str,
    open_links: bool,
    countdown: String,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(catalog: Catalog, wishlist: Wishlist<S>, currency: &'static str) -> Self {
        let mut session = Self {
            catalog,
            wishlist,
            currency,
            open_links: false,
            countdown: String::new(),
        };
        session.tick(Local::now().naive_local());
        session
    }

    pub fn with_open_links(mut self, open_links: bool) -> Self {
        self.open_links = open_links;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn wishlist(&self) -> &Wishlist<S> {
        &self.wishlist
    }

    pub fn countdown(&self) -> &str {
        &self.countdown
    }

    /// Recompute the refresh countdown. Independent of the filter pipeline.
    pub fn tick(&mut self, now: NaiveDateTime) {
        self.countdown = countdown::format_countdown(countdown::time_until_refresh(now));
    }

    pub fn render(&self, out: &mut impl Write) -> Result<(), DealHuntError> {
        let now = Utc::now();
        let cards: Vec<DealCard> = self
            .catalog
            .visible()
            .into_iter()
            .map(|deal| DealCard::new(deal, self.wishlist.contains(&deal.id), self.currency, now))
            .collect();
        let tags = self.catalog.active_filters(output::currency_symbol(self.currency));
        write!(
            out,
            "{}",
            output::format_deal_list(&cards, self.catalog.filtered_count(), &tags)
        )?;
        Ok(())
    }

    pub fn handle(&mut self, command: Command, out: &mut impl Write) -> Result<Flow, DealHuntError> {
        match command {
            Command::Search(text) => {
                self.catalog.set_filter([FilterChange::Search(Some(text))]);
                self.render(out)?;
            }
            Command::Category(c) => {
                match c {
                    Some(c) => self.catalog.filter_by_category(c),
                    None => self.catalog.remove_filter(FilterKey::Category),
                };
                self.render(out)?;
            }
            Command::Discount(d) => {
                self.catalog.set_filter([FilterChange::MinDiscount(d)]);
                self.render(out)?;
            }
            Command::Price(r) => {
                self.catalog.set_filter([FilterChange::PriceRange(r)]);
                self.render(out)?;
            }
            Command::Sort(key) => {
                self.catalog.set_filter([FilterChange::Sort(key)]);
                self.render(out)?;
            }
            Command::Remove(key) => {
                self.catalog.remove_filter(key);
                self.render(out)?;
            }
            Command::Clear => {
                self.catalog.clear_filters();
                self.render(out)?;
            }
            Command::More => {
                if self.catalog.has_more() {
                    self.catalog.load_more();
                    self.render(out)?;
                } else {
                    writeln!(out, "All matching deals are already shown.")?;
                }
            }
            Command::Save(id) => {
                if self.catalog.find(&id).is_none() {
                    return Err(DealHuntError::DealNotFound(id.to_string()));
                }
                let saved = self.wishlist.toggle_saved(&id)?;
                if saved {
                    writeln!(out, "Deal {} saved successfully!", id)?;
                } else {
                    writeln!(out, "Deal {} removed from saved list", id)?;
                }
            }
            Command::Get(id) => {
                let deal = self
                    .catalog
                    .find(&id)
                    .ok_or_else(|| DealHuntError::DealNotFound(id.to_string()))?;
                let url = actions::acquire(deal)?;
                writeln!(out, "Redirecting to Amazon for \"{}\": {}", deal.title, url)?;
                if self.open_links {
                    actions::open_in_browser(&url)?;
                }
            }
            Command::Show(id) => {
                let deal = self
                    .catalog
                    .find(&id)
                    .ok_or_else(|| DealHuntError::DealNotFound(id.to_string()))?;
                let saved = self.wishlist.contains(&deal.id);
                write!(
                    out,
                    "{}",
                    output::format_deal_detail(deal, saved, self.currency, Utc::now())
                )?;
            }
            Command::Stats => {
                write!(out, "{}", output::format_stats(&self.catalog.stats(), self.currency))?;
            }
            Command::Status => {
                let tags = self.catalog.active_filters(output::currency_symbol(self.currency));
                if tags.is_empty() {
                    writeln!(out, "No active filters (sort: {})", self.catalog.filter().sort)?;
                } else {
                    writeln!(
                        out,
                        "Active filters: {} (sort: {})",
                        tags.join(" · "),
                        self.catalog.filter().sort
                    )?;
                }
                writeln!(
                    out,
                    "Showing {} of {} deals, {} saved",
                    self.catalog.visible().len(),
                    self.catalog.filtered_count(),
                    self.wishlist.len()
                )?;
                writeln!(out, "Next deal refresh in {}", self.countdown)?;
            }
            Command::Help => write!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

/// Run the session until `quit` or the input channel closes. A search still
/// waiting out its quiet period when input ends is applied before returning.
pub async fn run<S, W>(
    session: &mut Session<S>,
    mut lines: mpsc::Receiver<String>,
    out: &mut W,
) -> Result<(), DealHuntError>
where
    S: KeyValueStore,
    W: Write,
{
    let mut search = Debouncer::new(SEARCH_QUIET_PERIOD);
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    session.render(out)?;
    out.flush()?;

    loop {
        let deadline = search.deadline();
        let flow = tokio::select! {
            line = lines.recv() => match line {
                Some(line) => match Command::parse(&line) {
                    Ok(Some(Command::Search(text))) => {
                        search.schedule(text);
                        Flow::Continue
                    }
                    Ok(Some(command)) => {
                        // A direct command supersedes a search still in flight.
                        if let Some(text) = search.cancel() {
                            session.handle(Command::Search(text), out)?;
                        }
                        report(session.handle(command, out), out)?
                    }
                    Ok(None) => Flow::Continue,
                    Err(e) => {
                        writeln!(out, "{}", e)?;
                        Flow::Continue
                    }
                },
                None => {
                    if let Some(text) = search.cancel() {
                        session.handle(Command::Search(text), out)?;
                    }
                    Flow::Quit
                }
            },
            _ = debounce::wait_until(deadline) => {
                match search.take_due(Instant::now()) {
                    Some(text) => session.handle(Command::Search(text), out)?,
                    None => Flow::Continue,
                }
            }
            _ = ticker.tick() => {
                session.tick(Local::now().naive_local());
                Flow::Continue
            }
        };
        out.flush()?;
        if flow == Flow::Quit {
            break;
        }
    }

    tracing::debug!("Session ended");
    Ok(())
}

// User-level failures (unknown id, bad link) are shown and the loop continues.
fn report(result: Result<Flow, DealHuntError>, out: &mut impl Write) -> Result<Flow, DealHuntError> {
    match result {
        Ok(flow) => Ok(flow),
        Err(DealHuntError::Io(e)) => Err(DealHuntError::Io(e)),
        Err(e) => {
            writeln!(out, "{}", e)?;
            Ok(Flow::Continue)
        }
    }
}
