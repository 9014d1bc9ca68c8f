//! Card domain model.
//!
//! # Responsibility
//! - Define the habit card and its per-day completion entries.
//! - Provide pure mutations that return new cards/collections.
//!
//! # Invariants
//! - `id` is immutable and never reused for another card.
//! - `entries.len()` is fixed at creation to the days of the creation month.
//! - `name` is never empty or whitespace-only.
//! - Archival is derived from `created_at`, never stored.

use crate::calendar::{days_in_month, is_same_month};
use chrono::{DateTime, Datelike, Local};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque, stable card identifier.
///
/// New cards get a v4 UUID in simple hex form; decoded ids are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(String);

impl CardId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Validation errors for card mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    /// Name is empty or whitespace-only; the caller should ask again.
    EmptyName,
    /// Entry index is outside `[0, len)`.
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for CardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "card name cannot be empty"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "entry index {index} is out of range for {len} entries")
            }
        }
    }
}

impl Error for CardError {}

/// Display state of one day slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Day precedes the card's start day; neither complete nor incomplete.
    PreTracking,
    Complete,
    Incomplete,
}

/// One tracked habit for a single month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    /// One flag per calendar day, index 0 = day 1.
    pub entries: Vec<bool>,
    /// Fixes the tracked month and the first tracked day.
    pub created_at: DateTime<Local>,
}

impl Card {
    /// Creates a card for the current local month.
    pub fn new(name: &str) -> Result<Self, CardError> {
        Self::create(name, Local::now())
    }

    /// Creates a card tracking the month of `now`, starting on `now`'s day.
    ///
    /// # Errors
    /// - `CardError::EmptyName` when `name` is blank.
    pub fn create(name: &str, now: DateTime<Local>) -> Result<Self, CardError> {
        let name = normalize_name(name)?;
        let len = days_in_month(now.month0(), now.year()) as usize;
        Ok(Self {
            id: CardId::generate(),
            name,
            entries: vec![false; len],
            created_at: now,
        })
    }

    /// Returns a copy with entry `index` negated.
    pub fn toggled(&self, index: usize) -> Result<Self, CardError> {
        if index >= self.entries.len() {
            return Err(CardError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let mut card = self.clone();
        card.entries[index] = !card.entries[index];
        Ok(card)
    }

    /// Returns a copy carrying `name`, trimmed.
    pub fn renamed(&self, name: &str) -> Result<Self, CardError> {
        let name = normalize_name(name)?;
        Ok(Self {
            name,
            ..self.clone()
        })
    }

    pub fn is_archived(&self, reference: &DateTime<Local>) -> bool {
        is_archived(self, reference)
    }

    /// Local day-of-month the card started on (1-based).
    pub fn start_day(&self) -> u32 {
        self.created_at.day()
    }

    /// Tracked `(year, month)` with a 0-based month.
    pub fn tracked_month(&self) -> (i32, u32) {
        (self.created_at.year(), self.created_at.month0())
    }

    /// Classifies entry `index`; `None` when out of range.
    pub fn entry_state(&self, index: usize) -> Option<EntryState> {
        let done = *self.entries.get(index)?;
        Some(if index + 1 < self.start_day() as usize {
            EntryState::PreTracking
        } else if done {
            EntryState::Complete
        } else {
            EntryState::Incomplete
        })
    }

    pub fn completed_count(&self) -> usize {
        self.entries.iter().filter(|done| **done).count()
    }
}

/// True when `card` tracks a different month than `reference`.
pub fn is_archived(card: &Card, reference: &DateTime<Local>) -> bool {
    !is_same_month(&card.created_at, reference)
}

/// Returns `cards` without the card matching `id`; unchanged when absent.
pub fn remove_card(cards: &[Card], id: &CardId) -> Vec<Card> {
    cards.iter().filter(|card| &card.id != id).cloned().collect()
}

/// Returns `cards` with the slot at `position` replaced by `updated`.
///
/// Decoded stores may repeat an id; only `position` is touched. Out-of-range
/// positions leave the collection unchanged.
pub fn replace_at(cards: &[Card], position: usize, updated: Card) -> Vec<Card> {
    let mut next = cards.to_vec();
    if let Some(slot) = next.get_mut(position) {
        *slot = updated;
    }
    next
}

fn normalize_name(name: &str) -> Result<String, CardError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CardError::EmptyName);
    }
    Ok(trimmed.to_string())
}
