use std::sync::Arc;

use crate::error::AutomatorResult;
use crate::repository::SequenceStore;

/// Issues unique, strictly increasing sequence numbers.
///
/// Numbers are never handed back: one that was issued for a failed creation
/// leaves a gap.
#[derive(Clone)]
pub struct SequenceAllocator {
    store: Arc<dyn SequenceStore>,
}

impl SequenceAllocator {
    pub fn new(store: Arc<dyn SequenceStore>) -> Self {
        Self { store }
    }

    pub async fn issue_next(&self) -> AutomatorResult<i64> {
        let number = self.store.issue_next().await?;
        tracing::debug!(sequence_number = number, "Issued sequence number");
        Ok(number)
    }
}

/// Left-pad `number` with zeros to `digits` characters. Wider numbers are kept whole.
pub fn format_number(number: i64, digits: u8) -> String {
    format!("{:0>width$}", number, width = usize::from(digits))
}

/// `"<trimmed prefix> <number>"`
pub fn entry_name(prefix: &str, formatted_number: &str) -> String {
    format!("{} {}", prefix.trim(), formatted_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutomatorError;
    use crate::models::CatalogSettings;
    use crate::repository::{InMemorySettingsRepository, MockSequenceStore};
    use std::collections::HashSet;

    #[test]
    fn test_format_number_pads_and_never_truncates() {
        assert_eq!(format_number(7, 3), "007");
        assert_eq!(format_number(1234, 3), "1234");
        assert_eq!(format_number(0, 1), "0");
        assert_eq!(format_number(42, 10), "0000000042");
    }

    #[test]
    fn test_entry_name_trims_prefix() {
        assert_eq!(entry_name("  SKU ", "001"), "SKU 001");
        assert_eq!(entry_name("", "001"), " 001");
    }

    #[tokio::test]
    async fn test_concurrent_allocations_are_unique() {
        let store = Arc::new(InMemorySettingsRepository::with_settings(CatalogSettings {
            sequence_start: 1,
            ..Default::default()
        }));
        let allocator = SequenceAllocator::new(store);

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let allocator = allocator.clone();
                tokio::spawn(async move { allocator.issue_next().await.unwrap() })
            })
            .collect();

        let mut issued = HashSet::new();
        for handle in handles {
            assert!(issued.insert(handle.await.unwrap()));
        }

        assert_eq!(issued.len(), 50);
        assert_eq!(issued.iter().min(), Some(&1));
        assert_eq!(issued.iter().max(), Some(&50));
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let mut store = MockSequenceStore::new();
        store
            .expect_issue_next()
            .times(1)
            .returning(|| Err(AutomatorError::Internal("connection reset".to_string())));

        let allocator = SequenceAllocator::new(Arc::new(store));
        assert!(matches!(
            allocator.issue_next().await,
            Err(AutomatorError::Internal(_))
        ));
    }
}
