use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::batch::BatchProcessor;
use crate::creator::EntryCreator;
use crate::error::{AutomatorError, AutomatorResult};
use crate::models::{BatchResult, CatalogEntry, CatalogSettings, UpdateSettings};
use crate::repository::{CatalogRepository, MediaRepository, SequenceStore, SettingsRepository};
use crate::sequence::SequenceAllocator;

/// Entry point used by the HTTP layer
#[derive(Clone)]
pub struct ImageProductService {
    catalog: Arc<dyn CatalogRepository>,
    settings: Arc<dyn SettingsRepository>,
    batch: BatchProcessor,
}

impl ImageProductService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        media: Arc<dyn MediaRepository>,
        settings: Arc<dyn SettingsRepository>,
        sequence: Arc<dyn SequenceStore>,
    ) -> Self {
        let creator = EntryCreator::new(
            catalog.clone(),
            media,
            settings.clone(),
            SequenceAllocator::new(sequence),
        );

        Self {
            catalog,
            settings,
            batch: BatchProcessor::new(creator),
        }
    }

    pub async fn bulk_create(&self, image_ids: &[i64]) -> Vec<BatchResult> {
        self.batch.process_batch(image_ids).await
    }

    pub async fn get_entry(&self, id: Uuid) -> AutomatorResult<CatalogEntry> {
        self.catalog
            .get_by_id(id)
            .await?
            .ok_or(AutomatorError::NotFound(id))
    }

    pub async fn get_settings(&self) -> AutomatorResult<CatalogSettings> {
        self.settings.get().await
    }

    #[instrument(skip(self))]
    pub async fn update_settings(&self, input: UpdateSettings) -> AutomatorResult<CatalogSettings> {
        input
            .validate()
            .map_err(|e| AutomatorError::Validation(e.to_string()))?;

        let settings = self.settings.update(input).await?;
        tracing::info!(
            prefix = %settings.product_prefix,
            sequence_start = settings.sequence_start,
            sequence_digits = settings.sequence_digits,
            "Catalog settings updated"
        );
        Ok(settings)
    }
}
