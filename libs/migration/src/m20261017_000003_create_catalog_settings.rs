use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Single-row table: naming defaults plus the persisted sequence counter
        manager
            .create_table(
                Table::create()
                    .table(CatalogSettings::Table)
                    .if_not_exists()
                    .col(small_integer(CatalogSettings::Id).primary_key())
                    .col(string_len(CatalogSettings::ProductPrefix, 100).default(""))
                    .col(decimal_len(CatalogSettings::DefaultPrice, 12, 2).default(0))
                    .col(big_integer_null(CatalogSettings::DefaultCategoryId))
                    .col(big_integer(CatalogSettings::SequenceStart).default(1))
                    .col(small_integer(CatalogSettings::SequenceDigits).default(3))
                    .col(big_integer_null(CatalogSettings::LastSequenceNumber))
                    .col(
                        timestamp_with_time_zone(CatalogSettings::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE catalog_settings \
                 ADD CONSTRAINT ck_catalog_settings_singleton CHECK (id = 1), \
                 ADD CONSTRAINT ck_catalog_settings_digits CHECK (sequence_digits BETWEEN 1 AND 10), \
                 ADD CONSTRAINT ck_catalog_settings_start CHECK (sequence_start >= 0)",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared("INSERT INTO catalog_settings (id) VALUES (1) ON CONFLICT (id) DO NOTHING")
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CatalogSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CatalogSettings {
    Table,
    Id,
    ProductPrefix,
    DefaultPrice,
    DefaultCategoryId,
    SequenceStart,
    SequenceDigits,
    LastSequenceNumber,
    UpdatedAt,
}
