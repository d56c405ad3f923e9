//! Catalog filter/sort/page engine.

mod engine;
mod filter;
mod page;

pub use engine::{compute_visible, filtered, Catalog, CatalogStats};
pub use filter::{FilterChange, FilterKey, FilterState, PriceRange, SortKey};
pub use page::{PageState, DEFAULT_PAGE_SIZE};
