use std::sync::Arc;

use tracing::{debug, warn};

use quiz_core::model::{
    LevelId, LevelRecord, Stars, apply_level_result, default_levels, reconcile_levels,
};
use storage::repository::KeyValueRepository;

use crate::error::ProgressError;

/// Storage slot holding the JSON-encoded level records.
pub const PROGRESS_KEY: &str = "animal_game_levels";

/// Best-effort persistence of level progress.
///
/// `load` and `save` never fail: the game stays playable without storage.
/// The `try_*` variants surface errors for callers that need them.
#[derive(Clone)]
pub struct ProgressStore {
    repo: Arc<dyn KeyValueRepository>,
    total_levels: u32,
}

impl ProgressStore {
    #[must_use]
    pub fn new(repo: Arc<dyn KeyValueRepository>, total_levels: u32) -> Self {
        Self { repo, total_levels }
    }

    #[must_use]
    pub fn total_levels(&self) -> u32 {
        self.total_levels
    }

    /// Records for a first run.
    #[must_use]
    pub fn defaults(&self) -> Vec<LevelRecord> {
        default_levels(self.total_levels)
    }

    /// Loads stored progress, falling back to defaults on any problem.
    pub async fn load(&self) -> Vec<LevelRecord> {
        match self.try_load().await {
            Ok(Some(levels)) => levels,
            Ok(None) => {
                debug!("no stored progress, starting fresh");
                self.defaults()
            }
            Err(err) => {
                warn!(error = %err, "stored progress unreadable, starting fresh");
                self.defaults()
            }
        }
    }

    /// Reads and parses the progress slot.
    ///
    /// Returns `Ok(None)` when nothing usable is stored (missing slot, blank
    /// value or an empty array).
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` on storage failures, malformed JSON or
    /// duplicate level ids.
    pub async fn try_load(&self) -> Result<Option<Vec<LevelRecord>>, ProgressError> {
        let Some(raw) = self.repo.get(PROGRESS_KEY).await? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }

        let stored: Vec<LevelRecord> = serde_json::from_str(&raw)?;
        if stored.is_empty() {
            return Ok(None);
        }
        Ok(Some(reconcile_levels(stored, self.total_levels)?))
    }

    /// Overwrites stored progress, logging instead of failing.
    pub async fn save(&self, records: &[LevelRecord]) {
        if let Err(err) = self.try_save(records).await {
            warn!(error = %err, "failed to persist progress");
        }
    }

    /// # Errors
    ///
    /// Returns `ProgressError` if encoding or storage fails.
    pub async fn try_save(&self, records: &[LevelRecord]) -> Result<(), ProgressError> {
        let raw = serde_json::to_string(records)?;
        self.repo.set(PROGRESS_KEY, &raw).await?;
        Ok(())
    }

    /// Applies a finished level and saves the result.
    pub async fn record_result(
        &self,
        records: &[LevelRecord],
        level_id: LevelId,
        earned: Stars,
    ) -> Vec<LevelRecord> {
        let updated = apply_level_result(records, level_id, earned);
        self.save(&updated).await;
        updated
    }

    /// Replaces stored progress with first-run defaults.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the defaults cannot be stored.
    pub async fn reset(&self) -> Result<Vec<LevelRecord>, ProgressError> {
        let levels = self.defaults();
        self.try_save(&levels).await?;
        Ok(levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    fn store(repo: &InMemoryRepository) -> ProgressStore {
        ProgressStore::new(Arc::new(repo.clone()), 6)
    }

    fn assert_defaults(levels: &[LevelRecord]) {
        assert_eq!(levels.len(), 6);
        assert!(!levels[0].is_locked);
        assert!(levels[1..].iter().all(|l| l.is_locked));
        assert!(levels.iter().all(|l| l.stars == Stars::ZERO));
    }

    #[tokio::test]
    async fn load_without_data_returns_defaults() {
        let repo = InMemoryRepository::new();
        assert_defaults(&store(&repo).load().await);
    }

    #[tokio::test]
    async fn load_with_corrupt_or_empty_data_returns_defaults() {
        for raw in ["", "   ", "not json", "[]", "{\"id\":1}", r#"[{"id":1,"stars":7,"isLocked":false}]"#] {
            let repo = InMemoryRepository::new();
            repo.set(PROGRESS_KEY, raw).await.unwrap();
            assert_defaults(&store(&repo).load().await);
        }
    }

    #[tokio::test]
    async fn try_load_reports_malformed_json() {
        let repo = InMemoryRepository::new();
        repo.set(PROGRESS_KEY, "{").await.unwrap();
        let err = store(&repo).try_load().await.unwrap_err();
        assert!(matches!(err, ProgressError::Json(_)));
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let repo = InMemoryRepository::new();
        let store = store(&repo);
        let levels = store
            .record_result(&store.defaults(), LevelId::FIRST, Stars::TWO)
            .await;

        let loaded = store.load().await;
        assert_eq!(loaded, levels);
        assert_eq!(loaded[0].stars, Stars::TWO);
        assert!(!loaded[1].is_locked);
    }

    #[tokio::test]
    async fn saved_format_matches_stored_slot() {
        let repo = InMemoryRepository::new();
        let store = ProgressStore::new(Arc::new(repo.clone()), 2);
        store.save(&store.defaults()).await;
        let raw = repo.get(PROGRESS_KEY).await.unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"id":1,"stars":0,"isLocked":false},{"id":2,"stars":0,"isLocked":true}]"#
        );
    }

    #[tokio::test]
    async fn load_reconciles_a_changed_level_count() {
        let repo = InMemoryRepository::new();
        repo.set(
            PROGRESS_KEY,
            r#"[{"id":1,"stars":3,"isLocked":false},{"id":2,"stars":1,"isLocked":false}]"#,
        )
        .await
        .unwrap();

        let levels = store(&repo).load().await;
        assert_eq!(levels.len(), 6);
        assert_eq!(levels[0].stars, Stars::THREE);
        assert_eq!(levels[1].stars, Stars::ONE);
        assert!(levels[2].is_locked);
    }

    #[tokio::test]
    async fn reset_overwrites_progress() {
        let repo = InMemoryRepository::new();
        let store = store(&repo);
        store
            .record_result(&store.defaults(), LevelId::FIRST, Stars::THREE)
            .await;
        let reset = store.reset().await.unwrap();
        assert_defaults(&reset);
        assert_defaults(&store.load().await);
    }
}
