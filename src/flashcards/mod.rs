//! Flashcards for Flashdeck
//!
//! This module provides:
//! - Card and collection models
//! - Flashcard CRUD persisted as one JSON array in a key-value store
//! - Sequential study sessions with on-demand answer reveal

pub mod models;
pub mod storage;
pub mod study;

pub use models::*;
pub use storage::{FlashcardStore, IdStrategy, StoreError, DEFAULT_STORAGE_KEY};
pub use study::{Progress, StudyError, StudySession, StudyState};
