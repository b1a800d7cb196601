//! Process-local record of generated call intents
//!
//! Non-authoritative: redemption always decodes the token itself. Entries are
//! never expired and are invisible to other instances; the cache only feeds
//! the admin listing.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use qrcall_core::{mask_phone_number, CallIntent};
use serde::Serialize;
use std::sync::Arc;

/// Admin view of a cached intent, phone number masked
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MappingView {
    pub id: String,
    pub phone_number: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct IntentCache {
    entries: Arc<DashMap<String, CallIntent>>,
}

impl IntentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: &str, intent: CallIntent) {
        self.entries.insert(token.to_string(), intent);
    }

    pub fn get(&self, token: &str) -> Option<CallIntent> {
        self.entries.get(token).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first
    pub fn masked_mappings(&self) -> Vec<MappingView> {
        let mut views: Vec<MappingView> = self
            .entries
            .iter()
            .map(|entry| MappingView {
                id: entry.key().clone(),
                phone_number: mask_phone_number(&entry.value().target_number),
                label: entry.value().label.clone(),
                created_at: entry.value().created_at,
            })
            .collect();
        views.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        views
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_masked_mappings() {
        let cache = IntentCache::new();
        let now = Utc::now();
        cache.insert("b", CallIntent::new("+14155550000", "Alice").with_created_at(now));
        cache.insert(
            "a",
            CallIntent::new("+442079460958", "Bob").with_created_at(now - Duration::seconds(5)),
        );

        let views = cache.masked_mappings();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].label, "Bob");
        assert_eq!(views[0].phone_number, "+********0958");
        assert_eq!(views[1].id, "b");
        assert_eq!(views[1].phone_number, "+*******0000");
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = IntentCache::new();
        let clone = cache.clone();
        clone.insert("token", CallIntent::new("+14155550000", "Alice"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("token").unwrap().label, "Alice");
        assert!(cache.get("missing").is_none());
    }
}
