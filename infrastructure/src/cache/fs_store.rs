//! Filesystem plan cache.
//!
//! One JSON file per cache key under a root directory. Each file holds the
//! step records plus a `saved_at` timestamp. Writes go to a temporary file
//! first and are renamed into place, so readers never observe a partial
//! document.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tactician_application::ports::plan_cache::{PlanCacheError, PlanCacheStore};
use tactician_domain::StepRecord;
use tracing::{debug, warn};

/// On-disk document shape for one cached plan.
#[derive(Debug, Serialize, Deserialize)]
struct CachedPlanDocument {
    saved_at: String,
    steps: Vec<StepRecord>,
}

/// Plan cache that stores each key as a JSON file in `root`.
pub struct FsPlanCacheStore {
    root: PathBuf,
}

impl FsPlanCacheStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// the first save.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are caller-chosen free text; keep filenames portable.
        let sanitized: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(format!("{}.plan.json", sanitized))
    }
}

#[async_trait]
impl PlanCacheStore for FsPlanCacheStore {
    async fn load(&self, key: &str) -> Result<Vec<StepRecord>, PlanCacheError> {
        let path = self.path_for(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PlanCacheError::NotFound(key.to_string()));
            }
            Err(e) => return Err(PlanCacheError::Io(e.to_string())),
        };

        let document: CachedPlanDocument =
            serde_json::from_str(&content).map_err(|e| PlanCacheError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        debug!(
            "loaded cached plan '{}' ({} steps, saved {})",
            key,
            document.steps.len(),
            document.saved_at
        );
        Ok(document.steps)
    }

    async fn save(&self, key: &str, records: &[StepRecord]) -> Result<(), PlanCacheError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| PlanCacheError::Io(e.to_string()))?;

        let document = CachedPlanDocument {
            saved_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            steps: records.to_vec(),
        };
        let content = serde_json::to_string_pretty(&document)
            .map_err(|e| PlanCacheError::Io(e.to_string()))?;

        let path = self.path_for(key);
        let temp = path.with_extension("json.tmp");
        tokio::fs::write(&temp, content)
            .await
            .map_err(|e| PlanCacheError::Io(e.to_string()))?;
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            warn!("could not move cached plan into place: {}", e);
            return Err(PlanCacheError::Io(e.to_string()));
        }
        debug!("saved plan '{}' to {}", key, path.display());
        Ok(())
    }
}
