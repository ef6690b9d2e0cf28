//! Integration tests against a real Postgres (testcontainers)
//!
//! Each test starts its own container with the workspace migrations applied.

use domain_image_products::*;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;
use test_utils::assertions::{assert_some, assert_strictly_increasing};
use test_utils::{TestDataBuilder, TestDatabase};

struct PgFixture {
    db: TestDatabase,
    catalog: Arc<PgCatalogRepository>,
    settings: Arc<PgSettingsRepository>,
    service: ImageProductService,
}

fn fixture(db: TestDatabase) -> PgFixture {
    let catalog = Arc::new(PgCatalogRepository::new(db.connection()));
    let settings = Arc::new(PgSettingsRepository::new(db.connection()));
    let service = ImageProductService::new(
        catalog.clone(),
        Arc::new(PgMediaRepository::new(db.connection())),
        settings.clone(),
        settings.clone(),
    );
    PgFixture {
        db,
        catalog,
        settings,
        service,
    }
}

#[tokio::test]
async fn test_scenario_prefix_price_and_category() {
    let f = fixture(TestDatabase::new().await);
    let builder = TestDataBuilder::from_test_name("scenario_sku");

    let category = f.db.insert_category(&builder.name("category", "prints")).await;
    let img_a = f.db.insert_image(&builder.file_name("a", "jpg")).await;
    let img_b = f.db.insert_image(&builder.file_name("b", "jpg")).await;

    f.service
        .update_settings(UpdateSettings {
            product_prefix: Some("SKU".to_string()),
            default_price: Some(Decimal::new(999, 2)),
            default_category: Some(Some(category)),
            sequence_start: Some(1),
            sequence_digits: Some(3),
        })
        .await
        .unwrap();

    let results = f.service.bulk_create(&[img_a, img_b]).await;
    assert!(results.iter().all(|r| r.success), "{:?}", results);

    let mut names = Vec::new();
    for (result, image) in results.iter().zip([img_a, img_b]) {
        let id = assert_some(result.product_id, "product id");
        let entry = f.service.get_entry(id).await.unwrap();
        assert_eq!(entry.primary_image, image);
        assert_eq!(entry.price, Decimal::new(999, 2));
        assert_eq!(entry.category, Some(category));
        assert!(entry.is_virtual);
        names.push(entry.name);
    }
    assert_eq!(names, vec!["SKU 001", "SKU 002"]);
}

#[tokio::test]
async fn test_non_image_in_middle_of_batch() {
    let f = fixture(TestDatabase::new().await);

    let a = f.db.insert_image("a.jpg").await;
    let b = f.db.insert_attachment("b.pdf", "application/pdf").await;
    let c = f.db.insert_image("c.png").await;

    let results = f.service.bulk_create(&[a, b, c]).await;
    let flags: Vec<bool> = results.iter().map(|r| r.success).collect();
    assert_eq!(flags, vec![true, false, true]);

    let first = f.service.get_entry(results[0].product_id.unwrap()).await.unwrap();
    let third = f.service.get_entry(results[2].product_id.unwrap()).await.unwrap();
    assert_strictly_increasing(
        &[first.sequence_number, third.sequence_number],
        "sequence numbers",
    );
}

#[tokio::test]
async fn test_resubmission_across_batches() {
    let f = fixture(TestDatabase::new().await);
    let image = f.db.insert_image("once.jpg").await;

    let first = f.service.bulk_create(&[image]).await;
    let second = f.service.bulk_create(&[image]).await;

    assert!(first[0].success);
    assert!(!second[0].success);
    assert_eq!(
        second[0].message.as_deref(),
        Some("Product already exists for this image")
    );
    assert!(f.catalog.exists_for_image(image).await.unwrap());
}

#[tokio::test]
async fn test_unique_index_maps_to_already_exists() {
    let f = fixture(TestDatabase::new().await);
    let image = f.db.insert_image("race.jpg").await;

    let entry = |seq: i64| NewEntry {
        name: format!("race {}", seq),
        status: ProductStatus::Published,
        price: Decimal::ZERO,
        is_virtual: true,
        primary_image: image,
        sequence_number: seq,
    };

    f.catalog.create_entry(entry(1)).await.unwrap();
    let err = f.catalog.create_entry(entry(2)).await.unwrap_err();
    assert!(matches!(err, AutomatorError::AlreadyExists(id) if id == image));
}

#[tokio::test]
async fn test_sequence_starts_at_configured_start() {
    let f = fixture(TestDatabase::new().await);

    f.settings
        .update(UpdateSettings {
            sequence_start: Some(5),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(f.settings.issue_next().await.unwrap(), 5);
    assert_eq!(f.settings.issue_next().await.unwrap(), 6);
    assert_eq!(
        f.settings.get().await.unwrap().last_sequence_number,
        Some(6)
    );
}

#[tokio::test]
async fn test_concurrent_issue_next_never_repeats() {
    let f = fixture(TestDatabase::new().await);

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let settings = f.settings.clone();
            tokio::spawn(async move { settings.issue_next().await.unwrap() })
        })
        .collect();

    let issued: Vec<i64> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let unique: HashSet<_> = issued.iter().collect();
    assert_eq!(unique.len(), 20);
    assert_eq!(issued.iter().max(), Some(&20));
}

#[tokio::test]
async fn test_missing_category_does_not_fail_item() {
    let f = fixture(TestDatabase::new().await);
    let image = f.db.insert_image("orphan.jpg").await;

    f.service
        .update_settings(UpdateSettings {
            default_category: Some(Some(999_999)),
            ..Default::default()
        })
        .await
        .unwrap();

    let results = f.service.bulk_create(&[image]).await;
    assert!(results[0].success);

    let entry = f.service.get_entry(results[0].product_id.unwrap()).await.unwrap();
    assert_eq!(entry.category, None);
}
