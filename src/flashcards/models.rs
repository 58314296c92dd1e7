//! Data models for the flashcard system

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier of a flashcard, serialized as a plain JSON number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlashcardId(pub u64);

impl fmt::Display for FlashcardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for FlashcardId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A question/answer pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: FlashcardId,
    pub question: String,
    pub answer: String,
    /// How the question is pronounced. Empty when not given.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pronunciation: String,
}

impl Flashcard {
    pub fn new(id: FlashcardId, question: String, answer: String) -> Self {
        Self {
            id,
            question,
            answer,
            pronunciation: String::new(),
        }
    }

    pub fn with_pronunciation(mut self, pronunciation: String) -> Self {
        self.pronunciation = pronunciation;
        self
    }

    /// Returns the first required field that is blank, if any
    pub fn blank_field(&self) -> Option<CardField> {
        if self.question.trim().is_empty() {
            Some(CardField::Question)
        } else if self.answer.trim().is_empty() {
            Some(CardField::Answer)
        } else {
            None
        }
    }

    /// Strip surrounding whitespace from every text field
    pub(crate) fn trimmed(mut self) -> Self {
        trim_in_place(&mut self.question);
        trim_in_place(&mut self.answer);
        trim_in_place(&mut self.pronunciation);
        self
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// User-editable text fields of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Question,
    Answer,
    Pronunciation,
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardField::Question => write!(f, "question"),
            CardField::Answer => write!(f, "answer"),
            CardField::Pronunciation => write!(f, "pronunciation"),
        }
    }
}

/// Partial update of a card. Only the fields that are `Some` are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashcardUpdate {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub pronunciation: Option<String>,
}

impl FlashcardUpdate {
    pub fn is_empty(&self) -> bool {
        self.question.is_none() && self.answer.is_none() && self.pronunciation.is_none()
    }

    /// Merge the provided fields over `card`
    pub fn apply_to(self, card: &mut Flashcard) {
        if let Some(question) = self.question {
            card.question = question;
        }
        if let Some(answer) = self.answer {
            card.answer = answer;
        }
        if let Some(pronunciation) = self.pronunciation {
            card.pronunciation = pronunciation;
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("Duplicate flashcard id: {0}")]
    DuplicateId(FlashcardId),
}

/// Ordered list of flashcards with unique ids.
///
/// Insertion order is preserved and is the order of the serialized array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Flashcard>", into = "Vec<Flashcard>")]
pub struct Collection {
    cards: Vec<Flashcard>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Flashcard> {
        self.cards.iter()
    }

    pub fn as_slice(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn get(&self, id: FlashcardId) -> Option<&Flashcard> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: FlashcardId) -> bool {
        self.get(id).is_some()
    }

    pub fn position(&self, id: FlashcardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    pub fn last(&self) -> Option<&Flashcard> {
        self.cards.last()
    }

    /// Highest id in the collection
    pub fn max_id(&self) -> Option<FlashcardId> {
        self.cards.iter().map(|c| c.id).max()
    }

    /// Append a card at the end
    pub fn push(&mut self, card: Flashcard) -> Result<(), CollectionError> {
        if self.contains(card.id) {
            return Err(CollectionError::DuplicateId(card.id));
        }
        self.cards.push(card);
        Ok(())
    }

    /// Replace the card with the same id, keeping its position.
    /// Returns the previous card, or `None` if no card had that id.
    pub fn replace(&mut self, card: Flashcard) -> Option<Flashcard> {
        let pos = self.position(card.id)?;
        Some(std::mem::replace(&mut self.cards[pos], card))
    }

    /// Remove the card with the given id, if present
    pub fn remove(&mut self, id: FlashcardId) -> Option<Flashcard> {
        let pos = self.position(id)?;
        Some(self.cards.remove(pos))
    }

    pub fn into_vec(self) -> Vec<Flashcard> {
        self.cards
    }
}

impl TryFrom<Vec<Flashcard>> for Collection {
    type Error = CollectionError;

    fn try_from(cards: Vec<Flashcard>) -> Result<Self, Self::Error> {
        let mut collection = Collection::new();
        for card in cards {
            collection.push(card)?;
        }
        Ok(collection)
    }
}

impl From<Collection> for Vec<Flashcard> {
    fn from(collection: Collection) -> Self {
        collection.cards
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Flashcard;
    type IntoIter = std::slice::Iter<'a, Flashcard>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

impl IntoIterator for Collection {
    type Item = Flashcard;
    type IntoIter = std::vec::IntoIter<Flashcard>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u64, question: &str, answer: &str) -> Flashcard {
        Flashcard::new(FlashcardId(id), question.to_string(), answer.to_string())
    }

    #[test]
    fn test_missing_pronunciation_defaults_to_empty() {
        let json = r#"[{"id": 7, "question": "犬", "answer": "dog"}]"#;
        let collection: Collection = serde_json::from_str(json).unwrap();

        let first = collection.get(FlashcardId(7)).unwrap();
        assert_eq!(first.pronunciation, "");
    }

    #[test]
    fn test_empty_pronunciation_is_omitted() {
        let json = serde_json::to_string(&card(1, "2+2=?", "4")).unwrap();
        assert_eq!(json, r#"{"id":1,"question":"2+2=?","answer":"4"}"#);

        let json =
            serde_json::to_string(&card(2, "犬", "dog").with_pronunciation("inu".to_string()))
                .unwrap();
        assert!(json.contains(r#""pronunciation":"inu""#));
    }

    #[test]
    fn test_duplicate_ids_rejected_on_deserialize() {
        let json = r#"[{"id":1,"question":"a","answer":"b"},{"id":1,"question":"c","answer":"d"}]"#;
        let result: Result<Collection, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_push_rejects_duplicate() {
        let mut collection = Collection::new();
        collection.push(card(1, "a", "b")).unwrap();

        assert_eq!(
            collection.push(card(1, "c", "d")),
            Err(CollectionError::DuplicateId(FlashcardId(1)))
        );
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut collection =
            Collection::try_from(vec![card(1, "a", "1"), card(2, "b", "2"), card(3, "c", "3")])
                .unwrap();

        let previous = collection.replace(card(2, "B", "2")).unwrap();

        assert_eq!(previous.question, "b");
        assert_eq!(collection.position(FlashcardId(2)), Some(1));
        assert_eq!(collection.as_slice()[1].question, "B");
        assert!(collection.replace(card(9, "x", "y")).is_none());
    }

    #[test]
    fn test_blank_field() {
        assert_eq!(card(1, "  ", "a").blank_field(), Some(CardField::Question));
        assert_eq!(card(1, "q", "\t").blank_field(), Some(CardField::Answer));
        assert_eq!(card(1, "q", "a").blank_field(), None);
    }

    #[test]
    fn test_update_only_touches_provided_fields() {
        let mut c = card(4, "q", "a").with_pronunciation("p".to_string());
        FlashcardUpdate {
            answer: Some("A".to_string()),
            ..Default::default()
        }
        .apply_to(&mut c);

        assert_eq!(c, card(4, "q", "A").with_pronunciation("p".to_string()));
    }
}
