use std::sync::Arc;
use tracing::instrument;

use crate::error::{AutomatorError, AutomatorResult};
use crate::models::{CatalogEntry, NewEntry, ProductStatus};
use crate::repository::{CatalogRepository, MediaRepository, SettingsRepository};
use crate::sequence::{SequenceAllocator, entry_name, format_number};

/// Turns a single image into a catalog entry.
#[derive(Clone)]
pub struct EntryCreator {
    catalog: Arc<dyn CatalogRepository>,
    media: Arc<dyn MediaRepository>,
    settings: Arc<dyn SettingsRepository>,
    allocator: SequenceAllocator,
}

impl EntryCreator {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        media: Arc<dyn MediaRepository>,
        settings: Arc<dyn SettingsRepository>,
        allocator: SequenceAllocator,
    ) -> Self {
        Self {
            catalog,
            media,
            settings,
            allocator,
        }
    }

    /// Create a published, virtual entry named after the next sequence number.
    ///
    /// Nothing is allocated for non-images or already-linked images. Once a
    /// number is issued it stays consumed even if the insert fails. A failed
    /// category link is logged and does not fail the entry.
    #[instrument(skip(self))]
    pub async fn create_from_image(&self, image_id: i64) -> AutomatorResult<CatalogEntry> {
        if !self.media.is_image(image_id).await? {
            return Err(AutomatorError::NotAnImage(image_id));
        }

        if self.catalog.exists_for_image(image_id).await? {
            return Err(AutomatorError::AlreadyExists(image_id));
        }

        let settings = self.settings.get().await?;
        let naming = settings.naming();

        let sequence_number = self.allocator.issue_next().await?;
        let name = entry_name(
            &naming.prefix,
            &format_number(sequence_number, settings.sequence_digits),
        );

        let mut entry = self
            .catalog
            .create_entry(NewEntry {
                name,
                status: ProductStatus::Published,
                price: naming.default_price,
                is_virtual: true,
                primary_image: image_id,
                sequence_number,
            })
            .await?;

        if let Some(category_id) = naming.default_category {
            match self.catalog.link_category(entry.id, category_id).await {
                Ok(()) => entry.category = Some(category_id),
                Err(e) => tracing::warn!(
                    product_id = %entry.id,
                    category_id,
                    error = %e,
                    "Failed to assign default category"
                ),
            }
        }

        tracing::info!(
            product_id = %entry.id,
            image_id,
            sequence_number,
            name = %entry.name,
            "Created catalog entry from image"
        );
        Ok(entry)
    }
}
