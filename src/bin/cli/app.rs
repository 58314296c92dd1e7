use std::path::PathBuf;

use anyhow::{Context, Result};

use flashdeck_lib::config::{AppConfig, Backend};
use flashdeck_lib::flashcards::{Collection, Flashcard, FlashcardId, FlashcardStore};

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub store: FlashcardStore,
}

impl App {
    /// Load configuration, apply command-line overrides and open the store
    pub async fn new(
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
        backend: Option<Backend>,
    ) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => AppConfig::load_from(&path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => AppConfig::load().context("Failed to read config")?,
        };

        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        if let Some(backend) = backend {
            config.backend = backend;
        }

        let store = config
            .open_store()
            .await
            .context("Failed to open flashcard storage")?;

        Ok(Self { config, store })
    }

    /// Load all cards. Unreadable stored data is reported on stderr and
    /// treated as an empty collection.
    pub async fn load_cards(&self) -> Result<Collection> {
        let (cards, warning) = self
            .store
            .load_or_empty()
            .await
            .context("Failed to load flashcards")?;

        if let Some(e) = warning {
            eprintln!("Warning: {}", e);
            eprintln!("Starting from an empty list. Run `flashdeck-cli reset` to discard the stored data.");
        }

        Ok(cards)
    }

    /// Find a card by id
    pub async fn find_card(&self, id: u64) -> Result<Flashcard> {
        let cards = self.store.load().await.context("Failed to load flashcards")?;
        cards
            .get(FlashcardId(id))
            .cloned()
            .with_context(|| format!("No flashcard with id {}", id))
    }
}
