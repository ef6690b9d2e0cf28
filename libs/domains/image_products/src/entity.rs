//! Sea-ORM entities for the tables this domain reads and writes.

/// `products`
pub mod product {
    use crate::models::ProductStatus;
    use sea_orm::ActiveValue::Set;
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub status: ProductStatus,
        #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
        pub price: Decimal,
        pub is_virtual: bool,
        #[sea_orm(unique)]
        pub primary_image_id: i64,
        #[sea_orm(unique)]
        pub sequence_number: i64,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl Model {
        pub fn into_entry(self, category: Option<i64>) -> crate::models::CatalogEntry {
            crate::models::CatalogEntry {
                id: self.id,
                name: self.name,
                status: self.status,
                price: self.price,
                is_virtual: self.is_virtual,
                primary_image: self.primary_image_id,
                category,
                sequence_number: self.sequence_number,
                created_at: self.created_at.into(),
            }
        }
    }

    impl From<crate::models::NewEntry> for ActiveModel {
        fn from(input: crate::models::NewEntry) -> Self {
            ActiveModel {
                id: Set(Uuid::now_v7()),
                name: Set(input.name),
                status: Set(input.status),
                price: Set(input.price),
                is_virtual: Set(input.is_virtual),
                primary_image_id: Set(input.primary_image),
                sequence_number: Set(input.sequence_number),
                created_at: Set(chrono::Utc::now().into()),
            }
        }
    }
}

/// `product_categories` join table
pub mod product_category {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "product_categories")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub product_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub category_id: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// `attachments` (read only)
pub mod attachment {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "attachments")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub file_name: String,
        pub mime_type: String,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// `catalog_settings`, a single row with `id = 1`
pub mod catalog_settings {
    use sea_orm::entity::prelude::*;

    pub const SETTINGS_ROW_ID: i16 = 1;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "catalog_settings")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i16,
        pub product_prefix: String,
        #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
        pub default_price: Decimal,
        pub default_category_id: Option<i64>,
        pub sequence_start: i64,
        pub sequence_digits: i16,
        pub last_sequence_number: Option<i64>,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::CatalogSettings {
        fn from(model: Model) -> Self {
            Self {
                product_prefix: model.product_prefix,
                default_price: model.default_price,
                default_category: model.default_category_id,
                sequence_start: model.sequence_start,
                // CHECK constraint keeps this within 1..=10
                sequence_digits: u8::try_from(model.sequence_digits)
                    .unwrap_or(crate::models::DEFAULT_SEQUENCE_DIGITS),
                last_sequence_number: model.last_sequence_number,
            }
        }
    }
}
