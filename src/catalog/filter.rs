//! Filter and sort selections.

use crate::error::DealHuntError;
use crate::model::Deal;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort order for the visible set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently created first.
    #[default]
    Newest,
    /// Highest discount percentage first.
    DiscountDesc,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// Most reviewed first.
    PopularityDesc,
}

impl SortKey {
    pub const ALL: &'static [SortKey] = &[
        SortKey::Newest,
        SortKey::DiscountDesc,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::PopularityDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::DiscountDesc => "discount-desc",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::PopularityDesc => "popularity-desc",
        }
    }

    /// Parse a sort key, accepting the short aliases used by the deal page.
    /// Anything unrecognized falls back to `Newest`.
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "discount-desc" | "discount" => SortKey::DiscountDesc,
            "price-asc" | "price-low" => SortKey::PriceAsc,
            "price-desc" | "price-high" => SortKey::PriceDesc,
            "popularity-desc" | "popular" | "popularity" => SortKey::PopularityDesc,
            "newest" => SortKey::Newest,
            other => {
                tracing::debug!("Unrecognized sort key '{}', using newest", other);
                SortKey::Newest
            }
        }
    }

    /// Comparator for this key. Callers must use a stable sort so equal keys
    /// keep their input order.
    pub fn compare(&self, a: &Deal, b: &Deal) -> Ordering {
        match self {
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::DiscountDesc => b.discount_percentage.cmp(&a.discount_percentage),
            SortKey::PriceAsc => a.current_price.total_cmp(&b.current_price),
            SortKey::PriceDesc => b.current_price.total_cmp(&a.current_price),
            SortKey::PopularityDesc => b.review_count.cmp(&a.review_count),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed price interval; `max == None` means unbounded above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn new(min: f64, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }
}

impl FromStr for PriceRange {
    type Err = DealHuntError;

    /// Parses `"min-max"`. An empty or zero `max` is unbounded (`"100-"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || DealHuntError::InvalidFilter(format!("Invalid price range '{}', expected MIN-MAX", s));

        let (min, max) = s.trim().split_once('-').ok_or_else(bad)?;
        let min: f64 = if min.trim().is_empty() {
            0.0
        } else {
            min.trim().parse().map_err(|_| bad())?
        };
        let max: Option<f64> = if max.trim().is_empty() {
            None
        } else {
            let m: f64 = max.trim().parse().map_err(|_| bad())?;
            (m != 0.0).then_some(m)
        };

        if !min.is_finite() || min < 0.0 || max.is_some_and(|m| !m.is_finite() || m < min) {
            return Err(bad());
        }
        Ok(PriceRange { min, max })
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}-", self.min),
        }
    }
}

/// The active filter and sort selections. Empty fields match everything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    pub category: Option<String>,
    pub min_discount: Option<u32>,
    pub price_range: Option<PriceRange>,
    pub search: Option<String>,
    pub sort: SortKey,
}

impl FilterState {
    pub fn matches(&self, deal: &Deal) -> bool {
        if let Some(category) = &self.category {
            if deal.category != *category {
                return false;
            }
        }
        if let Some(threshold) = self.min_discount {
            if deal.discount_percentage < threshold {
                return false;
            }
        }
        if let Some(range) = &self.price_range {
            if !range.contains(deal.current_price) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !deal.title.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        true
    }

    /// True when no field narrows the collection.
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.min_discount.is_none()
            && self.price_range.is_none()
            && self.search.is_none()
    }

    pub fn apply(&mut self, change: FilterChange) {
        match change {
            FilterChange::Category(c) => self.category = non_blank(c),
            FilterChange::MinDiscount(d) => self.min_discount = d,
            FilterChange::PriceRange(r) => self.price_range = r,
            FilterChange::Search(s) => self.search = non_blank(s),
            FilterChange::Sort(k) => self.sort = k,
        }
    }

    pub fn clear(&mut self, key: FilterKey) {
        match key {
            FilterKey::Category => self.category = None,
            FilterKey::Discount => self.min_discount = None,
            FilterKey::PriceRange => self.price_range = None,
            FilterKey::Search => self.search = None,
        }
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// One field of a partial filter update.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    Category(Option<String>),
    MinDiscount(Option<u32>),
    PriceRange(Option<PriceRange>),
    Search(Option<String>),
    Sort(SortKey),
}

/// Removable filter fields. Sort is not a filter and cannot be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Category,
    Discount,
    PriceRange,
    Search,
}

impl FromStr for FilterKey {
    type Err = DealHuntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(FilterKey::Category),
            "discount" => Ok(FilterKey::Discount),
            "price" | "price-range" => Ok(FilterKey::PriceRange),
            "search" => Ok(FilterKey::Search),
            other => Err(DealHuntError::InvalidFilter(format!(
                "Unknown filter '{}'. Use category, discount, price or search",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_aliases() {
        assert_eq!(SortKey::parse_lossy("price-low"), SortKey::PriceAsc);
        assert_eq!(SortKey::parse_lossy("POPULAR"), SortKey::PopularityDesc);
        assert_eq!(SortKey::parse_lossy("discount-desc"), SortKey::DiscountDesc);
        assert_eq!(SortKey::parse_lossy("rating"), SortKey::Newest);
    }

    #[test]
    fn test_price_range_parse() {
        assert_eq!("25-50".parse::<PriceRange>().unwrap(), PriceRange::new(25.0, Some(50.0)));
        assert_eq!("100-".parse::<PriceRange>().unwrap(), PriceRange::new(100.0, None));
        assert_eq!("100-0".parse::<PriceRange>().unwrap(), PriceRange::new(100.0, None));
        assert!("cheap".parse::<PriceRange>().is_err());
        assert!("50-25".parse::<PriceRange>().is_err());
    }

    #[test]
    fn test_price_range_is_closed() {
        let range = PriceRange::new(25.0, Some(50.0));
        assert!(range.contains(25.0));
        assert!(range.contains(50.0));
        assert!(!range.contains(50.01));
    }

    #[test]
    fn test_blank_search_clears_field() {
        let mut state = FilterState::default();
        state.apply(FilterChange::Search(Some("phone".into())));
        assert_eq!(state.search.as_deref(), Some("phone"));
        state.apply(FilterChange::Search(Some("   ".into())));
        assert!(state.search.is_none());
    }
}
