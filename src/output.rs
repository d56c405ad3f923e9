use crate::catalog::CatalogStats;
use crate::model::Deal;
use chrono::{DateTime, Local, Utc};

/// Everything a rendered deal card exposes.
#[derive(Debug, Clone, PartialEq)]
pub struct DealCard {
    pub id: String,
    pub title: String,
    pub badge: Option<String>,
    pub current_price: String,
    pub original_price: String,
    pub discount_percentage: u32,
    pub savings: String,
    pub stars: String,
    pub rating: f64,
    pub review_count: u32,
    pub verified: bool,
    pub time_left: Option<String>,
    pub saved: bool,
    pub url: String,
}

impl DealCard {
    pub fn new(deal: &Deal, saved: bool, currency: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: deal.id.to_string(),
            title: deal.title.clone(),
            badge: deal.badge.clone(),
            current_price: format_price(deal.current_price, currency),
            original_price: format_price(deal.original_price, currency),
            discount_percentage: deal.discount_percentage,
            savings: format_price(deal.savings, currency),
            stars: star_glyphs(deal.rating),
            rating: deal.rating,
            review_count: deal.review_count,
            verified: deal.is_verified,
            time_left: deal.expires_at.map(|at| time_left(at, now)),
            saved,
            url: deal.amazon_url.clone(),
        }
    }
}

pub fn format_deal_list(
    cards: &[DealCard],
    filtered_total: usize,
    active_filters: &[String],
) -> String {
    let mut out = String::new();

    if !active_filters.is_empty() {
        out.push_str(&format!("Active filters: {}\n\n", active_filters.join(" · ")));
    }

    if cards.is_empty() {
        out.push_str(&format_no_results());
        return out;
    }

    out.push_str(&format!(
        "## Deals (showing {} of {})\n\n",
        cards.len(),
        filtered_total
    ));

    for (i, card) in cards.iter().enumerate() {
        out.push_str(&format_card(i + 1, card));
        if i < cards.len() - 1 {
            out.push_str("\n---\n\n");
        }
    }

    if cards.len() < filtered_total {
        out.push_str(&format!(
            "\n_{} more deals available. Load more to see them._\n",
            filtered_total - cards.len()
        ));
    }

    out
}

pub fn format_no_results() -> String {
    "## No deals found\nTry adjusting your filters or search terms.\n".to_string()
}

pub fn format_card(position: usize, card: &DealCard) -> String {
    let mut out = String::new();

    match card.badge {
        Some(ref badge) => out.push_str(&format!("### {}. {} [{}]\n", position, card.title, badge)),
        None => out.push_str(&format!("### {}. {}\n", position, card.title)),
    }

    if card.discount_percentage > 0 {
        out.push_str(&format!(
            "- **Price:** {} ~~{}~~ ({}% off)\n",
            card.current_price, card.original_price, card.discount_percentage
        ));
        out.push_str(&format!("- **You save:** {}\n", card.savings));
    } else {
        out.push_str(&format!("- **Price:** {}\n", card.current_price));
    }

    out.push_str(&format!(
        "- **Rating:** {} {:.1}/5 ({} reviews)\n",
        card.stars,
        card.rating,
        format_number(card.review_count as u64)
    ));

    if card.verified {
        out.push_str("- **Verified deal**\n");
    }
    if let Some(ref left) = card.time_left {
        if left == "Expired" {
            out.push_str("- **Expired**\n");
        } else {
            out.push_str(&format!("- **Expires in:** {}\n", left));
        }
    }
    if card.saved {
        out.push_str("- **Saved** ♥\n");
    }

    out.push_str(&format!("- **ID:** {}\n", card.id));
    out.push_str(&format!("- **Get deal:** {}\n", card.url));
    out
}

pub fn format_deal_detail(deal: &Deal, saved: bool, currency: &str, now: DateTime<Utc>) -> String {
    let card = DealCard::new(deal, saved, currency, now);
    let mut out = format!("# {}\n\n", deal.title);

    out.push_str("## Overview\n");
    out.push_str(&format!("- **Category:** {}\n", deal.category));
    out.push_str(&format!(
        "- **Price:** {} ~~{}~~\n",
        card.current_price, card.original_price
    ));
    out.push_str(&format!(
        "- **Savings:** {} ({}%)\n",
        card.savings, card.discount_percentage
    ));
    if let Some(score) = deal.deal_score {
        out.push_str(&format!("- **Deal Score:** {}/100\n", score));
    }
    out.push_str(&format!(
        "- **Rating:** {} ({} reviews)\n",
        card.stars,
        format_number(deal.review_count as u64)
    ));
    out.push_str(&format!(
        "- **Verified Deal:** {}\n",
        if deal.is_verified { "Yes" } else { "No" }
    ));
    let expires = match deal.expires_at {
        Some(at) => format!(
            "{} ({})",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            time_left(at, now)
        ),
        None => "No expiration".to_string(),
    };
    out.push_str(&format!("- **Expires:** {}\n", expires));
    if let Some(commission) = deal.commission {
        out.push_str(&format!(
            "- **Disclosure:** We earn {}\n",
            format_price(commission, currency)
        ));
    }
    if saved {
        out.push_str("- **Saved** ♥\n");
    }
    out.push_str(&format!("- **Get deal:** {}\n", deal.amazon_url));
    out
}

pub fn format_stats(stats: &CatalogStats, currency: &str) -> String {
    let mut out = String::from("## Deal stats\n");
    out.push_str(&format!("- **Active deals:** {}\n", stats.active_deals));
    out.push_str(&format!(
        "- **Total savings:** {}\n",
        format_price(stats.total_savings, currency)
    ));
    out.push_str(&format!("- **Average discount:** {}%\n", stats.average_discount));
    out
}

/// Star glyphs for a 0-5 rating: whole stars, one half star for any
/// fractional part, padded with empty stars to five.
pub fn star_glyphs(rating: f64) -> String {
    let rating = rating.clamp(0.0, 5.0);
    let full = rating.floor() as usize;
    let half = usize::from(rating.fract() != 0.0);
    let empty = 5 - full - half;
    format!("{}{}{}", "★".repeat(full), "⯨".repeat(half), "☆".repeat(empty))
}

/// Remaining time until `expires_at`: `"Xh Ym"`, `"Ym"`, or `"Expired"`.
pub fn time_left(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = expires_at - now;
    if remaining.num_milliseconds() <= 0 {
        return "Expired".to_string();
    }
    let hours = remaining.num_hours();
    let minutes = remaining.num_minutes() % 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

pub fn currency_symbol(currency: &str) -> &str {
    match currency {
        "USD" => "$",
        "INR" => "₹",
        _ => currency,
    }
}

/// Format an amount with the currency symbol. INR uses Indian digit
/// grouping and drops a zero fraction; everything else shows cents.
pub fn format_price(amount: f64, currency: &str) -> String {
    let symbol = currency_symbol(currency);
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    if currency == "INR" {
        let grouped = group_indian(&whole.to_string());
        if frac == 0 {
            format!("{}{}{}", sign, symbol, grouped)
        } else {
            format!("{}{}{}.{:02}", sign, symbol, grouped, frac)
        }
    } else {
        format!("{}{}{}.{:02}", sign, symbol, format_number(whole), frac)
    }
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

// Last three digits, then groups of two: 1,59,900
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (a, b) = rest.split_at(rest.len() - 2);
        groups.push(b);
        rest = a;
    }
    groups.push(rest);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
