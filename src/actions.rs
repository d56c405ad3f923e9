use crate::error::DealHuntError;
use crate::model::Deal;
use url::Url;

/// Validated external purchase URL for a deal.
pub fn purchase_url(deal: &Deal) -> Result<Url, DealHuntError> {
    let url = Url::parse(&deal.amazon_url)
        .map_err(|e| DealHuntError::InvalidUrl(format!("{} ({})", deal.amazon_url, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DealHuntError::InvalidUrl(format!(
            "{} uses unsupported scheme '{}'",
            deal.amazon_url, other
        ))),
    }
}

/// Record a deal click and return where to send the user.
pub fn acquire(deal: &Deal) -> Result<Url, DealHuntError> {
    let url = purchase_url(deal)?;
    tracing::info!(deal_id = %deal.id, deal_title = %deal.title, "deal_click");
    Ok(url)
}

/// Hand the URL to the platform's default opener.
pub fn open_in_browser(url: &Url) -> Result<(), DealHuntError> {
    let mut command = if cfg!(target_os = "macos") {
        std::process::Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = std::process::Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        std::process::Command::new("xdg-open")
    };
    command.arg(url.as_str());
    tracing::debug!("Opening {} with {:?}", url, command.get_program());
    command.spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Storefront;
    use crate::source::seed::seed_deals;
    use chrono::Utc;

    #[test]
    fn test_seed_urls_are_valid() {
        for storefront in [Storefront::DealHunt, Storefront::AffiliateGrid] {
            for deal in seed_deals(storefront, Utc::now()) {
                assert!(acquire(&deal).is_ok(), "{}", deal.amazon_url);
            }
        }
    }

    #[test]
    fn test_non_web_url_rejected() {
        let mut deal = seed_deals(Storefront::DealHunt, Utc::now()).remove(0);
        deal.amazon_url = "javascript:alert(1)".to_string();
        assert!(matches!(purchase_url(&deal), Err(DealHuntError::InvalidUrl(_))));
        deal.amazon_url = "not a url".to_string();
        assert!(purchase_url(&deal).is_err());
    }
}
