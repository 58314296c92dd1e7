//! Sequential study sessions
//!
//! A session walks a fixed snapshot of cards from first to last. Each card
//! starts with its answer hidden; revealing it is optional before moving on.

use serde::Serialize;
use thiserror::Error;

use super::models::{Collection, Flashcard};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StudyError {
    #[error("No flashcards to study")]
    EmptyCollection,

    #[error("Study session already finished")]
    Finished,
}

pub type Result<T> = std::result::Result<T, StudyError>;

/// Where a session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum StudyState {
    /// Showing the card at `position`
    Browsing { position: usize, revealed: bool },
    /// Moved past the last card
    Finished,
}

impl StudyState {
    fn start() -> Self {
        Self::Browsing {
            position: 0,
            revealed: false,
        }
    }
}

/// "Card N of M", 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

/// A review pass over a snapshot of the collection
#[derive(Debug, Clone)]
pub struct StudySession {
    cards: Vec<Flashcard>,
    state: StudyState,
}

impl StudySession {
    /// Start at the first card with its answer hidden
    pub fn enter(cards: Collection) -> Result<Self> {
        if cards.is_empty() {
            return Err(StudyError::EmptyCollection);
        }

        Ok(Self {
            cards: cards.into_vec(),
            state: StudyState::start(),
        })
    }

    pub fn state(&self) -> StudyState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == StudyState::Finished
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// The card under the cursor, `None` once finished
    pub fn current(&self) -> Option<&Flashcard> {
        match self.state {
            StudyState::Browsing { position, .. } => self.cards.get(position),
            StudyState::Finished => None,
        }
    }

    /// The current card's answer, only once it has been revealed
    pub fn answer(&self) -> Option<&str> {
        match self.state {
            StudyState::Browsing {
                position,
                revealed: true,
            } => self.cards.get(position).map(|c| c.answer.as_str()),
            _ => None,
        }
    }

    pub fn progress(&self) -> Option<Progress> {
        match self.state {
            StudyState::Browsing { position, .. } => Some(Progress {
                current: position + 1,
                total: self.cards.len(),
            }),
            StudyState::Finished => None,
        }
    }

    /// Show the current card's answer
    pub fn reveal(&mut self) -> Result<()> {
        match &mut self.state {
            StudyState::Browsing { revealed, .. } => {
                *revealed = true;
                Ok(())
            }
            StudyState::Finished => Err(StudyError::Finished),
        }
    }

    /// Move to the next card, or finish after the last one
    pub fn advance(&mut self) -> Result<StudyState> {
        let StudyState::Browsing { position, .. } = self.state else {
            return Err(StudyError::Finished);
        };

        self.state = if position + 1 < self.cards.len() {
            StudyState::Browsing {
                position: position + 1,
                revealed: false,
            }
        } else {
            StudyState::Finished
        };
        Ok(self.state)
    }

    /// Go back to the first card with its answer hidden
    pub fn restart(&mut self) {
        self.state = StudyState::start();
    }

    /// End the session
    pub fn exit(self) {
        log::debug!("Study session over {} cards ended", self.cards.len());
    }
}
