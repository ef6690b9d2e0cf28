use async_trait::async_trait;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, QueryFilter, SqlErr, Statement,
};
use uuid::Uuid;

use crate::{
    entity::{
        attachment, catalog_settings,
        catalog_settings::SETTINGS_ROW_ID,
        product, product_category,
    },
    error::{AutomatorError, AutomatorResult},
    models::{CatalogEntry, CatalogSettings, NewEntry, UpdateSettings},
    repository::{CatalogRepository, MediaRepository, SequenceStore, SettingsRepository},
};

const PRIMARY_IMAGE_CONSTRAINT: &str = "uq_products_primary_image_id";

// One statement, so the row lock covers the read and the write
const ISSUE_NEXT_SQL: &str = "UPDATE catalog_settings \
     SET last_sequence_number = CASE \
         WHEN last_sequence_number IS NULL THEN sequence_start \
         ELSE last_sequence_number + 1 \
     END, \
     updated_at = now() \
     WHERE id = $1 \
     RETURNING last_sequence_number";

/// Client-visible text for storage failures; the driver error only goes to the logs.
const DATABASE_FAILURE: &str = "database operation failed";

fn internal(e: DbErr) -> AutomatorError {
    tracing::error!(error = %e, "Catalog storage error");
    AutomatorError::Internal(DATABASE_FAILURE.to_string())
}

fn settings_missing() -> AutomatorError {
    AutomatorError::Internal("catalog_settings row is missing; run migrations".to_string())
}

pub struct PgCatalogRepository {
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn exists_for_image(&self, image_id: i64) -> AutomatorResult<bool> {
        let found = product::Entity::find()
            .filter(product::Column::PrimaryImageId.eq(image_id))
            .one(&self.db)
            .await
            .map_err(internal)?;

        Ok(found.is_some())
    }

    async fn create_entry(&self, input: NewEntry) -> AutomatorResult<CatalogEntry> {
        let image_id = input.primary_image;
        let active_model: product::ActiveModel = input.into();

        match active_model.insert(&self.db).await {
            Ok(model) => {
                tracing::debug!(product_id = %model.id, image_id, "Inserted product row");
                Ok(model.into_entry(None))
            }
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg))
                    if msg.contains(PRIMARY_IMAGE_CONSTRAINT) =>
                {
                    Err(AutomatorError::AlreadyExists(image_id))
                }
                _ => {
                    tracing::error!(image_id, error = %e, "Failed to insert product");
                    Err(AutomatorError::Persistence(DATABASE_FAILURE.to_string()))
                }
            },
        }
    }

    async fn link_category(&self, entry_id: Uuid, category_id: i64) -> AutomatorResult<()> {
        product_category::ActiveModel {
            product_id: Set(entry_id),
            category_id: Set(category_id),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            tracing::error!(entry_id = %entry_id, category_id, error = %e, "Failed to link category");
            AutomatorError::Persistence(DATABASE_FAILURE.to_string())
        })?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> AutomatorResult<Option<CatalogEntry>> {
        let Some(model) = product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(internal)?
        else {
            return Ok(None);
        };

        let category = product_category::Entity::find()
            .filter(product_category::Column::ProductId.eq(id))
            .one(&self.db)
            .await
            .map_err(internal)?
            .map(|link| link.category_id);

        Ok(Some(model.into_entry(category)))
    }
}

pub struct PgMediaRepository {
    db: DatabaseConnection,
}

impl PgMediaRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MediaRepository for PgMediaRepository {
    async fn is_image(&self, attachment_id: i64) -> AutomatorResult<bool> {
        let attachment = attachment::Entity::find_by_id(attachment_id)
            .one(&self.db)
            .await
            .map_err(internal)?;

        Ok(attachment.is_some_and(|a| a.mime_type.starts_with("image/")))
    }
}

/// Settings row plus the sequence counter stored in it
pub struct PgSettingsRepository {
    db: DatabaseConnection,
}

impl PgSettingsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    async fn get(&self) -> AutomatorResult<CatalogSettings> {
        catalog_settings::Entity::find_by_id(SETTINGS_ROW_ID)
            .one(&self.db)
            .await
            .map_err(internal)?
            .map(Into::into)
            .ok_or_else(settings_missing)
    }

    async fn update(&self, input: UpdateSettings) -> AutomatorResult<CatalogSettings> {
        let mut active_model = catalog_settings::ActiveModel {
            id: Unchanged(SETTINGS_ROW_ID),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        if let Some(prefix) = input.product_prefix {
            active_model.product_prefix = Set(prefix);
        }
        if let Some(price) = input.default_price {
            active_model.default_price = Set(price);
        }
        if let Some(category) = input.default_category {
            active_model.default_category_id = Set(category);
        }
        if let Some(start) = input.sequence_start {
            active_model.sequence_start = Set(start);
        }
        if let Some(digits) = input.sequence_digits {
            active_model.sequence_digits = Set(i16::from(digits));
        }

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => settings_missing(),
            e => internal(e),
        })?;

        Ok(model.into())
    }
}

#[async_trait]
impl SequenceStore for PgSettingsRepository {
    async fn issue_next(&self) -> AutomatorResult<i64> {
        let row = self
            .db
            .query_one_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                ISSUE_NEXT_SQL,
                [SETTINGS_ROW_ID.into()],
            ))
            .await
            .map_err(internal)?
            .ok_or_else(settings_missing)?;

        row.try_get::<i64>("", "last_sequence_number")
            .map_err(internal)
    }
}
