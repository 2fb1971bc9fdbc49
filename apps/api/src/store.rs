//! Storage boundary for parsed and optimized resumes.
//!
//! Records are keyed by `storage_key`, derived from the contact phone. The
//! only backend is in-process memory; `AppState` carries it as
//! `Arc<dyn ResumeStore>`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{Contact, OptimizedSections, ParsedResume};

pub const DEFAULT_KEY: &str = "default";
const MIN_PHONE_DIGITS: usize = 10;

/// Phone digits when there are at least ten of them, else `"default"`.
pub fn storage_key(contact: &Contact) -> String {
    let digits: String = contact
        .phone
        .as_deref()
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if digits.len() >= MIN_PHONE_DIGITS {
        digits
    } else {
        DEFAULT_KEY.to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResume {
    pub parsed: ParsedResume,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized: Option<OptimizedSections>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Replaces the parsed resume and clears any earlier overlay. Returns the key.
    async fn save_parsed(&self, parsed: ParsedResume) -> Result<String, AppError>;

    /// Attaches an overlay to the record under `key`.
    async fn save_optimized(&self, key: &str, optimized: OptimizedSections)
        -> Result<(), AppError>;

    async fn get(&self, key: &str) -> Result<Option<StoredResume>, AppError>;
}

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, StoredResume>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn save_parsed(&self, parsed: ParsedResume) -> Result<String, AppError> {
        let key = storage_key(&parsed.contact);
        let record = StoredResume {
            parsed,
            optimized: None,
            updated_at: Utc::now(),
        };
        self.records.write().await.insert(key.clone(), record);
        Ok(key)
    }

    async fn save_optimized(
        &self,
        key: &str,
        optimized: OptimizedSections,
    ) -> Result<(), AppError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(key)
            .ok_or_else(|| AppError::NotFound(format!("No stored resume under '{key}'")))?;
        record.optimized = Some(optimized);
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredResume>, AppError> {
        Ok(self.records.read().await.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(phone: &str) -> Contact {
        Contact {
            phone: Some(phone.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_storage_key_uses_phone_digits() {
        assert_eq!(storage_key(&contact("(206) 555-0147")), "2065550147");
        assert_eq!(storage_key(&contact("+1 206.555.0147")), "12065550147");
    }

    #[test]
    fn test_storage_key_defaults() {
        assert_eq!(storage_key(&contact("555-0147")), DEFAULT_KEY);
        assert_eq!(storage_key(&Contact::default()), DEFAULT_KEY);
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let store = MemoryStore::new();
        let parsed = ParsedResume {
            contact: contact("206-555-0147"),
            skills: vec!["Rust".to_string()],
            ..Default::default()
        };

        let key = store.save_parsed(parsed.clone()).await.unwrap();
        assert_eq!(key, "2065550147");

        let stored = store.get(&key).await.unwrap().unwrap();
        assert_eq!(stored.parsed, parsed);
        assert!(stored.optimized.is_none());
    }

    #[tokio::test]
    async fn test_save_optimized_attaches_overlay() {
        let store = MemoryStore::new();
        let key = store.save_parsed(ParsedResume::default()).await.unwrap();
        let overlay = OptimizedSections {
            skills: Some(vec!["Go".to_string()]),
            ..Default::default()
        };

        store.save_optimized(&key, overlay.clone()).await.unwrap();
        let stored = store.get(&key).await.unwrap().unwrap();
        assert_eq!(stored.optimized, Some(overlay));
    }

    #[tokio::test]
    async fn test_save_optimized_requires_record() {
        let store = MemoryStore::new();
        let result = store
            .save_optimized("missing", OptimizedSections::default())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reparse_clears_overlay() {
        let store = MemoryStore::new();
        let key = store.save_parsed(ParsedResume::default()).await.unwrap();
        store
            .save_optimized(&key, OptimizedSections::default())
            .await
            .unwrap();
        store.save_parsed(ParsedResume::default()).await.unwrap();
        assert!(store.get(&key).await.unwrap().unwrap().optimized.is_none());
    }
}
