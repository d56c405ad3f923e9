//! Data source loading, fallback, and saved-list persistence.

use chrono::Utc;
use dealhunt::catalog::{Catalog, FilterChange};
use dealhunt::model::{DealId, Storefront};
use dealhunt::source::{load_deals, DataSource, Origin};
use dealhunt::store::{FileStore, KeyValueStore};
use dealhunt::wishlist::Wishlist;
use std::path::PathBuf;

fn bundled_data() -> DataSource {
    DataSource::File(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/deals.json"))
}

#[tokio::test]
async fn bundled_data_file_loads() {
    let loaded = load_deals(&bundled_data(), Storefront::DealHunt, Utc::now()).await;
    assert_eq!(loaded.origin, Origin::Source);
    assert_eq!(loaded.deals.len(), 14);

    let mut catalog = Catalog::new(loaded.deals, 12);
    assert_eq!(catalog.visible().len(), 12);
    assert!(catalog.has_more());
    catalog.load_more();
    assert_eq!(catalog.visible().len(), 14);

    catalog.set_filter([FilterChange::Category(Some("sports".into()))]);
    assert_eq!(catalog.visible().len(), 3);
}

#[tokio::test]
async fn missing_source_falls_back_to_seed() {
    let tmp = tempfile::tempdir().unwrap();
    let source = DataSource::File(tmp.path().join("deals.json"));

    let loaded = load_deals(&source, Storefront::DealHunt, Utc::now()).await;
    assert_eq!(loaded.origin, Origin::Fallback);
    assert_eq!(loaded.deals.len(), 3);

    let loaded = load_deals(&source, Storefront::AffiliateGrid, Utc::now()).await;
    assert_eq!(loaded.origin, Origin::Fallback);
    assert_eq!(loaded.deals.len(), 6);
}

#[tokio::test]
async fn malformed_source_falls_back_to_seed() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("deals.json");
    std::fs::write(&path, "<html>404</html>").unwrap();

    let loaded = load_deals(&DataSource::File(path), Storefront::DealHunt, Utc::now()).await;
    assert_eq!(loaded.origin, Origin::Fallback);
    assert_eq!(loaded.deals.len(), 3);
}

#[tokio::test]
async fn source_with_only_invalid_deals_falls_back() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("deals.json");
    std::fs::write(
        &path,
        r#"[{"id":1,"title":"Broken","originalPrice":10,"currentPrice":20,"amazonUrl":"https://amazon.com/dp/a"}]"#,
    )
    .unwrap();

    let loaded = load_deals(&DataSource::File(path), Storefront::DealHunt, Utc::now()).await;
    assert_eq!(loaded.origin, Origin::Fallback);
}

#[tokio::test]
async fn unreachable_url_falls_back() {
    let source: DataSource = "http://127.0.0.1:9/deals.json".parse().unwrap();
    let loaded = load_deals(&source, Storefront::DealHunt, Utc::now()).await;
    assert_eq!(loaded.origin, Origin::Fallback);
    assert_eq!(loaded.deals.len(), 3);
}

#[test]
fn saved_list_survives_reload() {
    let tmp = tempfile::tempdir().unwrap();
    let key = Storefront::DealHunt.wishlist_key();

    let mut wishlist = Wishlist::load(FileStore::new(tmp.path().to_path_buf()), key);
    assert!(wishlist.toggle_saved(&DealId::from("2")).unwrap());
    assert!(wishlist.toggle_saved(&DealId::from("7")).unwrap());
    assert!(!wishlist.toggle_saved(&DealId::from("2")).unwrap());

    let reloaded = Wishlist::load(FileStore::new(tmp.path().to_path_buf()), key);
    assert_eq!(reloaded.ids().collect::<Vec<_>>(), vec![DealId::from("7")]);
}

#[test]
fn corrupt_saved_list_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(tmp.path().to_path_buf());
    store.set("wishlist", "[\"1\",").unwrap();

    let wishlist = Wishlist::load(store, "wishlist");
    assert!(wishlist.is_empty());
}
