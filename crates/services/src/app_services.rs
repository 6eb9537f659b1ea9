use std::sync::Arc;

use quiz_core::GameConfig;
use quiz_core::model::AnimalCatalog;
use storage::repository::Storage;

use crate::audio::{AudioChannel, AudioPlayer};
use crate::error::AppServicesError;
use crate::game::GameController;
use crate::progress_store::ProgressStore;

/// Assembles the game's collaborators from configuration and storage.
#[derive(Clone)]
pub struct AppServices {
    config: GameConfig,
    catalog: Arc<AnimalCatalog>,
    progress: ProgressStore,
    audio: AudioChannel,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        config: GameConfig,
        player: Arc<dyn AudioPlayer>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, config, player))
    }

    /// Build services that keep progress in memory only.
    #[must_use]
    pub fn in_memory(config: GameConfig, player: Arc<dyn AudioPlayer>) -> Self {
        Self::from_storage(&Storage::in_memory(), config, player)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, config: GameConfig, player: Arc<dyn AudioPlayer>) -> Self {
        let progress = ProgressStore::new(Arc::clone(&storage.kv), config.total_levels());
        Self {
            config,
            catalog: Arc::new(AnimalCatalog::builtin()),
            progress,
            audio: AudioChannel::new(player),
        }
    }

    /// Swap the built-in animals for another catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: AnimalCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<AnimalCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    /// A controller on the map screen with stored progress loaded.
    pub async fn game(&self) -> GameController {
        GameController::new(
            self.config.clone(),
            Arc::clone(&self.catalog),
            self.progress.clone(),
            self.audio.clone(),
        )
        .await
    }
}
