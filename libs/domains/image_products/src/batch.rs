use tracing::instrument;

use crate::creator::EntryCreator;
use crate::error::AutomatorError;
use crate::models::BatchResult;

/// Runs the entry creator over a list of image ids.
#[derive(Clone)]
pub struct BatchProcessor {
    creator: EntryCreator,
}

impl BatchProcessor {
    pub fn new(creator: EntryCreator) -> Self {
        Self { creator }
    }

    /// One result per id, in input order.
    ///
    /// Items run one after another, so a repeated id sees the entry created
    /// for its first occurrence. A failing item never stops the rest.
    #[instrument(skip_all, fields(batch_size = image_ids.len()))]
    pub async fn process_batch(&self, image_ids: &[i64]) -> Vec<BatchResult> {
        let mut results = Vec::with_capacity(image_ids.len());

        for &image_id in image_ids {
            let result = match self.creator.create_from_image(image_id).await {
                Ok(entry) => BatchResult::created(image_id, &entry),
                Err(e) => {
                    match &e {
                        AutomatorError::AlreadyExists(_) => {
                            tracing::info!(image_id, "Skipping image, product already exists")
                        }
                        AutomatorError::NotAnImage(_) => {
                            tracing::info!(image_id, "Skipping attachment, not an image")
                        }
                        _ => tracing::warn!(image_id, error = %e, "Failed to create product"),
                    }
                    BatchResult::failed(image_id, e.to_string())
                }
            };
            results.push(result);
        }

        let created = results.iter().filter(|r| r.success).count();
        tracing::info!(
            requested = image_ids.len(),
            created,
            failed = image_ids.len() - created,
            "Batch processed"
        );
        results
    }
}
