use crate::error::DealHuntError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable deal identifier. Data files carry either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DealId(String);

impl DealId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DealId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for DealId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => DealId(s),
            RawId::Number(n) => DealId(n.to_string()),
        })
    }
}

/// A normalized deal. Prices are authoritative; `savings` and
/// `discount_percentage` stay within a cent and a point of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDeal")]
pub struct Deal {
    pub id: DealId,
    pub title: String,
    pub category: String,
    pub original_price: f64,
    pub current_price: f64,
    pub discount_percentage: u32,
    pub savings: f64,
    pub rating: f64,
    pub review_count: u32,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub is_verified: bool,
    pub badge: Option<String>,
    pub amazon_url: String,
    pub image_url: Option<String>,
    pub deal_score: Option<u32>,
    pub commission: Option<f64>,
}

/// Wire shape of a deal before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeal {
    pub id: DealId,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    pub original_price: f64,
    #[serde(alias = "salePrice")]
    pub current_price: f64,
    #[serde(default)]
    pub discount_percentage: Option<u32>,
    #[serde(default)]
    pub savings: Option<f64>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, alias = "reviews")]
    pub review_count: u32,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub badge: Option<String>,
    pub amazon_url: String,
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub deal_score: Option<u32>,
    #[serde(default)]
    pub commission: Option<f64>,
}

const DEFAULT_CATEGORY: &str = "general";

pub fn derive_savings(original: f64, current: f64) -> f64 {
    ((original - current) * 100.0).round() / 100.0
}

pub fn derive_discount(original: f64, current: f64) -> u32 {
    if original <= 0.0 {
        return 0;
    }
    ((original - current) / original * 100.0).round() as u32
}

impl TryFrom<RawDeal> for Deal {
    type Error = DealHuntError;

    fn try_from(raw: RawDeal) -> Result<Self, Self::Error> {
        let invalid = |reason: String| DealHuntError::InvalidDeal {
            id: raw.id.to_string(),
            reason,
        };

        if !raw.original_price.is_finite() || !raw.current_price.is_finite() {
            return Err(invalid("prices must be finite".to_string()));
        }
        if raw.original_price < 0.0 || raw.current_price < 0.0 {
            return Err(invalid("prices must not be negative".to_string()));
        }
        if raw.current_price > raw.original_price {
            return Err(invalid(format!(
                "current price {} exceeds original price {}",
                raw.current_price, raw.original_price
            )));
        }
        if !(0.0..=5.0).contains(&raw.rating) {
            return Err(invalid(format!("rating {} outside 0-5", raw.rating)));
        }

        let derived_savings = derive_savings(raw.original_price, raw.current_price);
        let savings = match raw.savings {
            Some(supplied) if (supplied - derived_savings).abs() <= 0.01 + f64::EPSILON => supplied,
            Some(supplied) => {
                tracing::warn!(
                    "Deal {}: supplied savings {:.2} disagrees with prices, using {:.2}",
                    raw.id,
                    supplied,
                    derived_savings
                );
                derived_savings
            }
            None => derived_savings,
        };

        let derived_discount = derive_discount(raw.original_price, raw.current_price);
        let discount = match raw.discount_percentage {
            Some(supplied) if supplied.abs_diff(derived_discount) <= 1 => supplied,
            Some(supplied) => {
                tracing::warn!(
                    "Deal {}: supplied discount {}% disagrees with prices, using {}%",
                    raw.id,
                    supplied,
                    derived_discount
                );
                derived_discount
            }
            None => derived_discount,
        };

        Ok(Deal {
            category: raw
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            original_price: raw.original_price,
            current_price: raw.current_price,
            discount_percentage: discount,
            savings,
            rating: raw.rating,
            review_count: raw.review_count,
            expires_at: raw.expires_at,
            created_at: raw.created_at.unwrap_or(DateTime::UNIX_EPOCH),
            is_verified: raw.is_verified,
            badge: raw.badge,
            amazon_url: raw.amazon_url,
            image_url: raw.image_url,
            deal_score: raw.deal_score,
            commission: raw.commission,
            title: raw.title,
            id: raw.id,
        })
    }
}

/// Which storefront page the catalog is presented as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Storefront {
    #[default]
    DealHunt,
    AffiliateGrid,
}

impl Storefront {
    pub fn as_str(&self) -> &'static str {
        match self {
            Storefront::DealHunt => "dealhunt",
            Storefront::AffiliateGrid => "affiliate-grid",
        }
    }

    /// Key under which the saved-deal id list is persisted.
    pub fn wishlist_key(&self) -> &'static str {
        match self {
            Storefront::DealHunt => "savedDeals",
            Storefront::AffiliateGrid => "wishlist",
        }
    }

    pub fn currency(&self) -> &'static str {
        match self {
            Storefront::DealHunt => "USD",
            Storefront::AffiliateGrid => "INR",
        }
    }
}

impl FromStr for Storefront {
    type Err = DealHuntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dealhunt" | "deals" => Ok(Storefront::DealHunt),
            "affiliate-grid" | "affiliate" | "amazon" => Ok(Storefront::AffiliateGrid),
            other => Err(DealHuntError::Config(format!(
                "Unknown storefront '{}'. Use 'dealhunt' or 'affiliate-grid'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_ids() {
        let a: DealId = serde_json::from_str("7").unwrap();
        let b: DealId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_derived_fields_are_filled() {
        let deal: Deal = serde_json::from_str(
            r#"{"id":1,"title":"Lamp","originalPrice":50.0,"currentPrice":20.0,
                "amazonUrl":"https://amazon.com/dp/x"}"#,
        )
        .unwrap();
        assert_eq!(deal.savings, 30.0);
        assert_eq!(deal.discount_percentage, 60);
        assert_eq!(deal.category, "general");
        assert_eq!(deal.created_at, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_inconsistent_savings_is_rederived() {
        let deal: Deal = serde_json::from_str(
            r#"{"id":"a","title":"Mug","originalPrice":10.0,"currentPrice":8.0,
                "savings":5.0,"discountPercentage":90,"amazonUrl":"https://amazon.com/dp/y"}"#,
        )
        .unwrap();
        assert_eq!(deal.savings, 2.0);
        assert_eq!(deal.discount_percentage, 20);
    }

    #[test]
    fn test_supplied_values_within_tolerance_are_kept() {
        let deal: Deal = serde_json::from_str(
            r#"{"id":"b","title":"Kettle","originalPrice":129.99,"currentPrice":40.0,
                "savings":89.99,"discountPercentage":70,"amazonUrl":"https://amazon.com/dp/k"}"#,
        )
        .unwrap();
        assert_eq!(derive_discount(129.99, 40.0), 69);
        assert_eq!(deal.discount_percentage, 70);
        assert_eq!(deal.savings, 89.99);
    }

    #[test]
    fn test_sale_above_original_is_rejected() {
        let result = serde_json::from_str::<Deal>(
            r#"{"id":2,"title":"Bad","originalPrice":10.0,"currentPrice":12.0,
                "amazonUrl":"https://amazon.com/dp/z"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_affiliate_field_aliases() {
        let deal: Deal = serde_json::from_str(
            r#"{"id":"4","name":"Apple iPhone 15","originalPrice":79900,"salePrice":69900,
                "discount":10000,"rating":4.6,"reviews":3241,"amazonUrl":"https://amazon.in/dp/B0CHX69VFQ"}"#,
        )
        .unwrap();
        assert_eq!(deal.title, "Apple iPhone 15");
        assert_eq!(deal.review_count, 3241);
        assert_eq!(deal.savings, 10000.0);
        assert_eq!(deal.discount_percentage, 13);
    }

    #[test]
    fn test_storefront_parse() {
        assert_eq!("amazon".parse::<Storefront>().unwrap(), Storefront::AffiliateGrid);
        assert!("shop".parse::<Storefront>().is_err());
    }
}
