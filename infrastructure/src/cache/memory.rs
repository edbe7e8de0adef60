//! In-memory plan cache, for embedding the engine without a data directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tactician_application::ports::plan_cache::{PlanCacheError, PlanCacheStore};
use tactician_domain::StepRecord;

/// Plan cache backed by a process-local hash map.
#[derive(Default)]
pub struct InMemoryPlanCacheStore {
    entries: Mutex<HashMap<String, Vec<StepRecord>>>,
}

impl InMemoryPlanCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PlanCacheStore for InMemoryPlanCacheStore {
    async fn load(&self, key: &str) -> Result<Vec<StepRecord>, PlanCacheError> {
        self.entries
            .lock()
            .map_err(|e| PlanCacheError::Io(e.to_string()))?
            .get(key)
            .cloned()
            .ok_or_else(|| PlanCacheError::NotFound(key.to_string()))
    }

    async fn save(&self, key: &str, records: &[StepRecord]) -> Result<(), PlanCacheError> {
        self.entries
            .lock()
            .map_err(|e| PlanCacheError::Io(e.to_string()))?
            .insert(key.to_string(), records.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_load() {
        let store = InMemoryPlanCacheStore::new();
        let records = vec![StepRecord {
            task_id: "1".into(),
            dependent_task_ids: vec![],
            instruction: "do it".into(),
            task_type: String::new(),
            output_key: "out".into(),
            output_type: String::new(),
            output_description: String::new(),
            dependent: vec![],
            hint: None,
        }];

        store.save("k", &records).await.unwrap();
        assert_eq!(store.load("k").await.unwrap(), records);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_key_is_not_found() {
        let store = InMemoryPlanCacheStore::new();
        assert!(store.load("absent").await.unwrap_err().is_miss());
    }
}
