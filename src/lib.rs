//! Flashdeck: question/answer flashcards kept in a local key-value store,
//! with a sequential study mode.

pub mod config;
pub mod flashcards;
pub mod kv;

pub use config::{AppConfig, Backend, ConfigError};
pub use flashcards::{
    Collection, Flashcard, FlashcardId, FlashcardStore, FlashcardUpdate, StoreError,
    StudySession, StudyState,
};
