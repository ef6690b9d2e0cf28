pub use sea_orm_migration::prelude::*;

mod m20261017_000001_create_media_and_categories;
mod m20261017_000002_create_products;
mod m20261017_000003_create_catalog_settings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261017_000001_create_media_and_categories::Migration),
            Box::new(m20261017_000002_create_products::Migration),
            Box::new(m20261017_000003_create_catalog_settings::Migration),
        ]
    }
}
