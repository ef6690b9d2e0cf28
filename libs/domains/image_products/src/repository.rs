use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{AutomatorError, AutomatorResult};
use crate::models::{CatalogEntry, CatalogSettings, NewEntry, UpdateSettings};

/// Catalog entry persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Whether any entry uses this attachment as its primary image
    async fn exists_for_image(&self, image_id: i64) -> AutomatorResult<bool>;

    /// Insert an entry together with its primary image link.
    ///
    /// Fails with `AlreadyExists` when another entry already owns the image.
    async fn create_entry(&self, entry: NewEntry) -> AutomatorResult<CatalogEntry>;

    async fn link_category(&self, entry_id: Uuid, category_id: i64) -> AutomatorResult<()>;

    async fn get_by_id(&self, id: Uuid) -> AutomatorResult<Option<CatalogEntry>>;
}

/// Read access to uploaded attachments
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// True when the attachment exists and has an `image/*` MIME type
    async fn is_image(&self, attachment_id: i64) -> AutomatorResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self) -> AutomatorResult<CatalogSettings>;

    async fn update(&self, input: UpdateSettings) -> AutomatorResult<CatalogSettings>;
}

/// Persisted sequence counter
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SequenceStore: Send + Sync {
    /// Atomically advance the counter and return the new value.
    ///
    /// Returns `sequence_start` when nothing has been issued yet, otherwise
    /// the last issued number plus one.
    async fn issue_next(&self) -> AutomatorResult<i64>;
}

#[derive(Debug, Default)]
struct CatalogState {
    entries: HashMap<Uuid, CatalogEntry>,
    by_image: HashMap<i64, Uuid>,
}

/// In-memory catalog (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogRepository {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// All entries ordered by sequence number
    pub async fn entries(&self) -> Vec<CatalogEntry> {
        let state = self.state.read().await;
        let mut entries: Vec<_> = state.entries.values().cloned().collect();
        entries.sort_by_key(|e| e.sequence_number);
        entries
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn exists_for_image(&self, image_id: i64) -> AutomatorResult<bool> {
        Ok(self.state.read().await.by_image.contains_key(&image_id))
    }

    async fn create_entry(&self, input: NewEntry) -> AutomatorResult<CatalogEntry> {
        let mut state = self.state.write().await;

        if state.by_image.contains_key(&input.primary_image) {
            return Err(AutomatorError::AlreadyExists(input.primary_image));
        }

        let entry = CatalogEntry {
            id: Uuid::now_v7(),
            name: input.name,
            status: input.status,
            price: input.price,
            is_virtual: input.is_virtual,
            primary_image: input.primary_image,
            category: None,
            sequence_number: input.sequence_number,
            created_at: Utc::now(),
        };

        state.by_image.insert(entry.primary_image, entry.id);
        state.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn link_category(&self, entry_id: Uuid, category_id: i64) -> AutomatorResult<()> {
        let mut state = self.state.write().await;
        let entry = state
            .entries
            .get_mut(&entry_id)
            .ok_or(AutomatorError::NotFound(entry_id))?;
        entry.category = Some(category_id);
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> AutomatorResult<Option<CatalogEntry>> {
        Ok(self.state.read().await.entries.get(&id).cloned())
    }
}

/// In-memory attachment registry
#[derive(Debug, Default, Clone)]
pub struct InMemoryMediaRepository {
    mime_types: Arc<RwLock<HashMap<i64, String>>>,
}

impl InMemoryMediaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_attachment(&self, id: i64, mime_type: impl Into<String>) {
        self.mime_types.write().await.insert(id, mime_type.into());
    }

    pub async fn add_image(&self, id: i64) {
        self.add_attachment(id, "image/jpeg").await;
    }
}

#[async_trait]
impl MediaRepository for InMemoryMediaRepository {
    async fn is_image(&self, attachment_id: i64) -> AutomatorResult<bool> {
        Ok(self
            .mime_types
            .read()
            .await
            .get(&attachment_id)
            .is_some_and(|mime| mime.starts_with("image/")))
    }
}

/// In-memory settings row; also serves as the sequence store.
///
/// Every read-modify-write of the counter happens under one mutex guard.
#[derive(Debug, Default, Clone)]
pub struct InMemorySettingsRepository {
    settings: Arc<Mutex<CatalogSettings>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CatalogSettings) -> Self {
        Self {
            settings: Arc::new(Mutex::new(settings)),
        }
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn get(&self) -> AutomatorResult<CatalogSettings> {
        Ok(self.settings.lock().await.clone())
    }

    async fn update(&self, input: UpdateSettings) -> AutomatorResult<CatalogSettings> {
        let mut settings = self.settings.lock().await;
        settings.apply(input);
        Ok(settings.clone())
    }
}

#[async_trait]
impl SequenceStore for InMemorySettingsRepository {
    async fn issue_next(&self) -> AutomatorResult<i64> {
        let mut settings = self.settings.lock().await;
        let next = settings
            .next_sequence_number()
            .ok_or_else(|| AutomatorError::Internal("Sequence numbers exhausted".to_string()))?;
        settings.last_sequence_number = Some(next);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductStatus;
    use rust_decimal::Decimal;

    fn new_entry(image: i64, seq: i64) -> NewEntry {
        NewEntry {
            name: format!("SKU {:03}", seq),
            status: ProductStatus::Published,
            price: Decimal::ZERO,
            is_virtual: true,
            primary_image: image,
            sequence_number: seq,
        }
    }

    #[tokio::test]
    async fn test_create_entry_enforces_one_entry_per_image() {
        let repo = InMemoryCatalogRepository::new();

        let entry = repo.create_entry(new_entry(10, 1)).await.unwrap();
        assert!(repo.exists_for_image(10).await.unwrap());
        assert_eq!(repo.get_by_id(entry.id).await.unwrap(), Some(entry));

        let err = repo.create_entry(new_entry(10, 2)).await.unwrap_err();
        assert!(matches!(err, AutomatorError::AlreadyExists(10)));
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_link_category_unknown_entry() {
        let repo = InMemoryCatalogRepository::new();
        let err = repo.link_category(Uuid::now_v7(), 1).await.unwrap_err();
        assert!(matches!(err, AutomatorError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_media_is_image_by_mime_type() {
        let media = InMemoryMediaRepository::new();
        media.add_image(1).await;
        media.add_attachment(2, "application/pdf").await;

        assert!(media.is_image(1).await.unwrap());
        assert!(!media.is_image(2).await.unwrap());
        assert!(!media.is_image(3).await.unwrap());
    }

    #[tokio::test]
    async fn test_issue_next_starts_at_start_then_increments() {
        let store = InMemorySettingsRepository::with_settings(CatalogSettings {
            sequence_start: 5,
            ..Default::default()
        });

        assert_eq!(store.issue_next().await.unwrap(), 5);
        assert_eq!(store.issue_next().await.unwrap(), 6);
        assert_eq!(store.get().await.unwrap().last_sequence_number, Some(6));
    }

    #[tokio::test]
    async fn test_raising_start_does_not_rewind_counter() {
        let store = InMemorySettingsRepository::new();
        assert_eq!(store.issue_next().await.unwrap(), 1);

        store
            .update(UpdateSettings {
                sequence_start: Some(100),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(store.issue_next().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_counter_fails_without_wrapping() {
        let store = InMemorySettingsRepository::new();
        store
            .update(UpdateSettings {
                sequence_start: Some(i64::MAX),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(store.issue_next().await.unwrap(), i64::MAX);
        let err = store.issue_next().await.unwrap_err();
        assert!(matches!(err, AutomatorError::Internal(_)));
        assert_eq!(store.get().await.unwrap().last_sequence_number, Some(i64::MAX));
    }
}
