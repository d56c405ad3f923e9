use crate::error::DealHuntError;
use crate::model::DealId;
use crate::store::KeyValueStore;

/// Saved-deal id set persisted as a JSON string list under one key.
pub struct Wishlist<S: KeyValueStore> {
    store: S,
    key: String,
    ids: Vec<String>,
}

impl<S: KeyValueStore> Wishlist<S> {
    /// Load the saved set. Missing or malformed data yields an empty set.
    pub fn load(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let ids = match store.get(&key) {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(values) => values.into_iter().filter_map(id_from_value).collect(),
                Err(e) => {
                    tracing::warn!("Ignoring malformed saved list '{}': {}", key, e);
                    Vec::new()
                }
            },
        };
        Self { store, key, ids }
    }

    pub fn contains(&self, id: &DealId) -> bool {
        self.ids.iter().any(|s| s == id.as_str())
    }

    /// Saved ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = DealId> + '_ {
        self.ids.iter().map(|s| DealId::new(s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flip membership of `id`, persist, and return the new membership.
    /// A failed write leaves the set unchanged.
    pub fn toggle_saved(&mut self, id: &DealId) -> Result<bool, DealHuntError> {
        let saved = !self.contains(id);
        let mut ids = self.ids.clone();
        if saved {
            ids.push(id.to_string());
        } else {
            ids.retain(|s| s != id.as_str());
        }
        let content = serde_json::to_string(&ids)?;
        self.store.set(&self.key, &content)?;
        self.ids = ids;
        tracing::info!(deal_id = %id, saved, "Saved list updated");
        Ok(saved)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

// Older pages stored numeric ids.
fn id_from_value(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut wishlist = Wishlist::load(MemoryStore::new(), "savedDeals");
        let id = DealId::from("3");
        assert!(!wishlist.contains(&id));
        assert!(wishlist.toggle_saved(&id).unwrap());
        assert!(wishlist.contains(&id));
        assert!(!wishlist.toggle_saved(&id).unwrap());
        assert!(!wishlist.contains(&id));
    }

    #[test]
    fn test_malformed_data_is_empty_set() {
        let mut store = MemoryStore::new();
        store.set("savedDeals", "{not json").unwrap();
        let wishlist = Wishlist::load(store, "savedDeals");
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_numeric_ids_are_accepted() {
        let mut store = MemoryStore::new();
        store.set("savedDeals", "[1, \"2\", null]").unwrap();
        let wishlist = Wishlist::load(store, "savedDeals");
        assert_eq!(wishlist.ids().collect::<Vec<_>>(), vec![DealId::from("1"), DealId::from("2")]);
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Option<String> {
            Some("[\"1\"]".to_string())
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), DealHuntError> {
            Err(DealHuntError::Store("disk full".to_string()))
        }
    }

    #[test]
    fn test_failed_write_keeps_membership() {
        let mut wishlist = Wishlist::load(FailingStore, "savedDeals");
        let saved = DealId::from("1");
        let unsaved = DealId::from("2");

        assert!(wishlist.toggle_saved(&unsaved).is_err());
        assert!(!wishlist.contains(&unsaved));

        assert!(wishlist.toggle_saved(&saved).is_err());
        assert!(wishlist.contains(&saved));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_toggle_persists() {
        let mut wishlist = Wishlist::load(MemoryStore::new(), "wishlist");
        wishlist.toggle_saved(&DealId::from("a")).unwrap();
        wishlist.toggle_saved(&DealId::from("b")).unwrap();
        let store = wishlist.into_store();
        assert_eq!(store.get("wishlist").as_deref(), Some("[\"a\",\"b\"]"));
        let reloaded = Wishlist::load(store, "wishlist");
        assert_eq!(reloaded.len(), 2);
    }
}
