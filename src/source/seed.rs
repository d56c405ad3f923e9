//! Embedded deals used whenever the data source cannot be read.

use crate::model::{derive_discount, derive_savings, Deal, DealId, Storefront};
use chrono::{DateTime, Duration, Utc};

pub fn seed_deals(storefront: Storefront, now: DateTime<Utc>) -> Vec<Deal> {
    match storefront {
        Storefront::DealHunt => dealhunt_seed(now),
        Storefront::AffiliateGrid => affiliate_seed(now),
    }
}

struct Seed {
    id: &'static str,
    title: &'static str,
    category: &'static str,
    original: f64,
    current: f64,
    rating: f64,
    reviews: u32,
    url: &'static str,
}

impl Seed {
    fn into_deal(self, created_at: DateTime<Utc>) -> Deal {
        Deal {
            id: DealId::new(self.id),
            title: self.title.to_string(),
            category: self.category.to_string(),
            original_price: self.original,
            current_price: self.current,
            discount_percentage: derive_discount(self.original, self.current),
            savings: derive_savings(self.original, self.current),
            rating: self.rating,
            review_count: self.reviews,
            expires_at: None,
            created_at,
            is_verified: false,
            badge: None,
            amazon_url: self.url.to_string(),
            image_url: None,
            deal_score: None,
            commission: None,
        }
    }
}

fn dealhunt_seed(now: DateTime<Utc>) -> Vec<Deal> {
    let mut headphones = Seed {
        id: "1",
        title: "Wireless Bluetooth Headphones - Premium Sound Quality",
        category: "electronics",
        original: 129.99,
        current: 39.99,
        rating: 4.5,
        reviews: 2847,
        url: "https://amazon.com/dp/example1",
    }
    .into_deal(now - Duration::hours(2));
    headphones.expires_at = Some(now + Duration::hours(6));
    headphones.is_verified = true;
    headphones.deal_score = Some(92);
    headphones.commission = Some(2.40);

    let mut camera = Seed {
        id: "2",
        title: "Smart Home Security Camera System with Night Vision",
        category: "home",
        original: 199.99,
        current: 79.99,
        rating: 4.3,
        reviews: 1256,
        url: "https://amazon.com/dp/example2",
    }
    .into_deal(now - Duration::hours(1));
    camera.expires_at = Some(now + Duration::hours(4));
    camera.is_verified = true;
    camera.deal_score = Some(87);
    camera.commission = Some(4.80);

    let mut knives = Seed {
        id: "3",
        title: "Premium Kitchen Knife Set - Professional Grade Stainless Steel",
        category: "home",
        original: 89.99,
        current: 29.99,
        rating: 4.7,
        reviews: 892,
        url: "https://amazon.com/dp/example3",
    }
    .into_deal(now - Duration::minutes(30));
    knives.expires_at = Some(now + Duration::hours(8));
    knives.is_verified = true;
    knives.deal_score = Some(94);
    knives.commission = Some(1.80);

    vec![headphones, camera, knives]
}

fn affiliate_seed(now: DateTime<Utc>) -> Vec<Deal> {
    let products = [
        (
            Seed {
                id: "1",
                title: "Apple iPhone 15 Pro Max (256GB) - Natural Titanium",
                category: "smartphones",
                original: 159900.0,
                current: 144900.0,
                rating: 4.5,
                reviews: 2847,
                url: "https://amazon.in/dp/B0CHX1W1XY",
            },
            Some("🔥 TRENDING"),
        ),
        (
            Seed {
                id: "2",
                title: "Sony WH-1000XM4 Wireless Industry Leading Noise Canceling Overhead Headphones",
                category: "audio",
                original: 29990.0,
                current: 18990.0,
                rating: 4.4,
                reviews: 1523,
                url: "https://amazon.in/dp/B0863TXGM3",
            },
            Some("⚡ DEAL OF DAY"),
        ),
        (
            Seed {
                id: "3",
                title: "Samsung 65 inches Neo QLED 4K Smart TV QN90A Series",
                category: "televisions",
                original: 199900.0,
                current: 149900.0,
                rating: 4.3,
                reviews: 892,
                url: "https://amazon.in/dp/B08W2682Q7",
            },
            Some("💎 PREMIUM"),
        ),
        (
            Seed {
                id: "4",
                title: "Apple iPhone 15 (128GB) - Pink",
                category: "smartphones",
                original: 79900.0,
                current: 69900.0,
                rating: 4.6,
                reviews: 3241,
                url: "https://amazon.in/dp/B0CHX69VFQ",
            },
            None,
        ),
        (
            Seed {
                id: "5",
                title: "Sony WH-CH720N Wireless Noise Canceling Headphones",
                category: "audio",
                original: 14990.0,
                current: 9990.0,
                rating: 4.2,
                reviews: 756,
                url: "https://amazon.in/dp/B0BZZ7X4R3",
            },
            Some("🎯 BEST SELLER"),
        ),
        (
            Seed {
                id: "6",
                title: "Samsung 55 inches Crystal 4K Vivid Pro Ultra HD Smart LED TV",
                category: "televisions",
                original: 62900.0,
                current: 39900.0,
                rating: 4.1,
                reviews: 1347,
                url: "https://amazon.in/dp/B0BVXF72F4",
            },
            None,
        ),
    ];

    // Listing order is the page order, so the first product is the newest.
    products
        .into_iter()
        .enumerate()
        .map(|(i, (seed, badge))| {
            let mut deal = seed.into_deal(now - Duration::hours(i as i64 + 1));
            deal.badge = badge.map(str::to_string);
            deal
        })
        .collect()
}
