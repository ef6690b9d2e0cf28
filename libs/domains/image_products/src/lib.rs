//! Image-to-product automation
//!
//! Creates one published catalog entry per uploaded image, named with a
//! prefix and a zero-padded number from a persisted, race-free counter.
//!
//! ```text
//! handlers ─► service ─► BatchProcessor ─► EntryCreator ─┬─► MediaRepository
//!                                                        ├─► CatalogRepository
//!                                                        ├─► SettingsRepository
//!                                                        └─► SequenceAllocator ─► SequenceStore
//! ```
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_image_products::{
//!     ImageProductService, InMemoryCatalogRepository, InMemoryMediaRepository,
//!     InMemorySettingsRepository,
//! };
//!
//! let settings = InMemorySettingsRepository::new();
//! let service = ImageProductService::new(
//!     Arc::new(InMemoryCatalogRepository::new()),
//!     Arc::new(InMemoryMediaRepository::new()),
//!     Arc::new(settings.clone()),
//!     Arc::new(settings),
//! );
//! ```

pub mod batch;
pub mod creator;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod sequence;
pub mod service;

pub use batch::BatchProcessor;
pub use creator::EntryCreator;
pub use error::{AutomatorError, AutomatorResult};
pub use models::{
    BatchResult, BulkCreateRequest, CatalogEntry, CatalogSettings, Envelope, MAX_BATCH_SIZE,
    NamingConfig, NewEntry, ProductStatus, UpdateSettings,
};
pub use postgres::{PgCatalogRepository, PgMediaRepository, PgSettingsRepository};
pub use repository::{
    CatalogRepository, InMemoryCatalogRepository, InMemoryMediaRepository,
    InMemorySettingsRepository, MediaRepository, SequenceStore, SettingsRepository,
};
pub use sequence::{SequenceAllocator, entry_name, format_number};
pub use service::ImageProductService;
