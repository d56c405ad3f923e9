use super::filter::{FilterChange, FilterKey, FilterState};
use super::page::PageState;
use crate::model::{Deal, DealId};

/// Filter, stable-sort and cumulatively slice `items`.
pub fn compute_visible<'a>(items: &'a [Deal], filter: &FilterState, page: &PageState) -> Vec<&'a Deal> {
    let mut matched = filtered(items, filter);
    matched.truncate(page.limit());
    matched
}

/// Filter and sort without slicing.
pub fn filtered<'a>(items: &'a [Deal], filter: &FilterState) -> Vec<&'a Deal> {
    let mut matched: Vec<&Deal> = items.iter().filter(|d| filter.matches(d)).collect();
    // sort_by is stable
    matched.sort_by(|a, b| filter.sort.compare(a, b));
    matched
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats {
    pub active_deals: usize,
    pub total_savings: f64,
    pub average_discount: u32,
}

/// Owns the loaded collection and the current filter/page selections.
/// The collection is read-only once constructed.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Deal>,
    filter: FilterState,
    page: PageState,
}

impl Catalog {
    pub fn new(items: Vec<Deal>, page_size: usize) -> Self {
        Self {
            items,
            filter: FilterState::default(),
            page: PageState::new(page_size),
        }
    }

    pub fn items(&self) -> &[Deal] {
        &self.items
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn find(&self, id: &DealId) -> Option<&Deal> {
        self.items.iter().find(|d| &d.id == id)
    }

    pub fn visible(&self) -> Vec<&Deal> {
        compute_visible(&self.items, &self.filter, &self.page)
    }

    pub fn filtered_count(&self) -> usize {
        self.items.iter().filter(|d| self.filter.matches(d)).count()
    }

    /// Apply a partial update. Always restarts pagination.
    pub fn set_filter(&mut self, changes: impl IntoIterator<Item = FilterChange>) -> &FilterState {
        for change in changes {
            self.filter.apply(change);
        }
        self.page.reset();
        tracing::debug!("Filter changed: {:?}", self.filter);
        &self.filter
    }

    pub fn filter_by_category(&mut self, category: impl Into<String>) -> &FilterState {
        self.set_filter([FilterChange::Category(Some(category.into()))])
    }

    pub fn remove_filter(&mut self, key: FilterKey) -> &FilterState {
        self.filter.clear(key);
        self.page.reset();
        &self.filter
    }

    pub fn clear_filters(&mut self) -> &FilterState {
        self.filter = FilterState::default();
        self.page.reset();
        &self.filter
    }

    pub fn has_more(&self) -> bool {
        self.page.limit() < self.filtered_count()
    }

    /// Grow the visible window by one page. A no-op once the window already
    /// covers every filtered item.
    pub fn load_more(&mut self) -> PageState {
        if self.has_more() {
            self.page.current_page += 1;
        } else {
            tracing::debug!("load_more: all {} items already visible", self.filtered_count());
        }
        self.page
    }

    /// Human-readable tags for each active filter field.
    pub fn active_filters(&self, currency_symbol: &str) -> Vec<String> {
        let mut tags = Vec::new();
        if let Some(category) = &self.filter.category {
            tags.push(format!("Category: {}", capitalize_first(category)));
        }
        if let Some(discount) = self.filter.min_discount {
            tags.push(format!("Min Discount: {}%+", discount));
        }
        if let Some(range) = &self.filter.price_range {
            let tag = match range.max {
                Some(max) => format!("Price: {0}{1} - {0}{2}", currency_symbol, range.min, max),
                None => format!("Price: {}{}+", currency_symbol, range.min),
            };
            tags.push(tag);
        }
        if let Some(search) = &self.filter.search {
            tags.push(format!("Search: \"{}\"", search));
        }
        tags
    }

    /// Aggregates over the full collection, independent of filters.
    pub fn stats(&self) -> CatalogStats {
        let active_deals = self.items.len();
        let total_savings = self.items.iter().map(|d| d.savings).sum();
        let average_discount = if active_deals == 0 {
            0
        } else {
            let sum: u64 = self.items.iter().map(|d| d.discount_percentage as u64).sum();
            (sum as f64 / active_deals as f64).round() as u32
        };
        CatalogStats {
            active_deals,
            total_savings,
            average_discount,
        }
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
