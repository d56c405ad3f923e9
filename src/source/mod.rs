//! Deal loading: a JSON file or URL, falling back to the embedded seed.

pub mod seed;

use crate::error::DealHuntError;
use crate::model::{Deal, RawDeal, Storefront};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    Url(Url),
}

impl FromStr for DataSource {
    type Err = DealHuntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            let url = Url::parse(s)
                .map_err(|e| DealHuntError::Config(format!("Invalid source URL '{}': {}", s, e)))?;
            Ok(DataSource::Url(url))
        } else if s.is_empty() {
            Err(DealHuntError::Config("Empty data source".to_string()))
        } else {
            Ok(DataSource::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Source,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct LoadedDeals {
    pub deals: Vec<Deal>,
    pub origin: Origin,
}

/// Load deals from `source`. Any retrieval or parse failure, or an empty
/// result, is replaced by the storefront's seed collection immediately.
pub async fn load_deals(source: &DataSource, storefront: Storefront, now: DateTime<Utc>) -> LoadedDeals {
    match fetch_deals(source).await {
        Ok(deals) if !deals.is_empty() => {
            tracing::info!("Loaded {} deals from {}", deals.len(), source);
            LoadedDeals {
                deals,
                origin: Origin::Source,
            }
        }
        Ok(_) => {
            tracing::warn!("{} contained no usable deals, using built-in deals", source);
            fallback(storefront, now)
        }
        Err(e) => {
            tracing::warn!("Error loading deals from {}: {}. Using built-in deals", source, e);
            fallback(storefront, now)
        }
    }
}

fn fallback(storefront: Storefront, now: DateTime<Utc>) -> LoadedDeals {
    LoadedDeals {
        deals: seed::seed_deals(storefront, now),
        origin: Origin::Fallback,
    }
}

pub async fn fetch_deals(source: &DataSource) -> Result<Vec<Deal>, DealHuntError> {
    let body = match source {
        DataSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DealHuntError::DataSource(format!("Failed to read {}: {}", path.display(), e)))?,
        DataSource::Url(url) => {
            let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
            let response = client.get(url.clone()).send().await?;
            if !response.status().is_success() {
                return Err(DealHuntError::DataSource(format!(
                    "{} returned HTTP {}",
                    url,
                    response.status()
                )));
            }
            response.text().await?
        }
    };
    parse_deals(&body)
}

/// Parse a JSON array of deals. Records that fail validation are dropped.
pub fn parse_deals(body: &str) -> Result<Vec<Deal>, DealHuntError> {
    let raw: Vec<RawDeal> = serde_json::from_str(body)?;
    let total = raw.len();
    let deals: Vec<Deal> = raw
        .into_iter()
        .filter_map(|r| match Deal::try_from(r) {
            Ok(deal) => Some(deal),
            Err(e) => {
                tracing::warn!("Skipping deal: {}", e);
                None
            }
        })
        .collect();
    if deals.len() < total {
        tracing::debug!("Kept {} of {} deals", deals.len(), total);
    }
    Ok(deals)
}
