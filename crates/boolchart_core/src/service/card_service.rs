//! Card use-case service.
//!
//! # Responsibility
//! - Hold the authoritative in-memory card collection for one session.
//! - Apply card mutations and persist the whole collection after each one.
//!
//! # Invariants
//! - A rejected mutation leaves the collection untouched and writes nothing.
//! - A failed save never rolls back the in-memory collection; the error is
//!   kept for the caller to report.
//! - Toggling entries of an archived card is rejected.

use crate::model::card::{remove_card, replace_at, Card, CardError, CardId};
use crate::repo::card_store::{default_cards, CardStore, StoreError};
use crate::repo::kv_repo::KeyValueRepository;
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Rejection of a card mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Input failed card validation (blank name, entry index).
    Card(CardError),
    CardNotFound(CardId),
    /// Card tracks a past month and is read-only.
    ArchivedCard(CardId),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Card(err) => write!(f, "{err}"),
            Self::CardNotFound(id) => write!(f, "card not found: {id}"),
            Self::ArchivedCard(id) => write!(f, "card is archived: {id}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Card(err) => Some(err),
            Self::CardNotFound(_) | Self::ArchivedCard(_) => None,
        }
    }
}

impl From<CardError> for ServiceError {
    fn from(value: CardError) -> Self {
        Self::Card(value)
    }
}

/// Source of "now" for card creation and archival checks.
pub type Clock = Box<dyn Fn() -> DateTime<Local>>;

/// Facade over card mutations and their persistence.
pub struct CardService<R: KeyValueRepository> {
    store: CardStore<R>,
    cards: Vec<Card>,
    clock: Clock,
    last_save_error: Option<StoreError>,
}

impl<R: KeyValueRepository> CardService<R> {
    /// Opens the service on `repo` using the local system clock and loads cards.
    pub fn open(repo: R) -> Self {
        Self::with_clock(repo, Local::now)
    }

    /// Opens the service with a caller-provided clock and loads cards.
    pub fn with_clock(repo: R, clock: impl Fn() -> DateTime<Local> + 'static) -> Self {
        let mut service = Self {
            store: CardStore::new(repo),
            cards: Vec::new(),
            clock: Box::new(clock),
            last_save_error: None,
        };
        service.load();
        service
    }

    /// Reloads the collection from storage.
    ///
    /// An unreadable medium degrades to the default seed for this session.
    pub fn load(&mut self) -> &[Card] {
        let now = self.now();
        self.cards = match self.store.load(now) {
            Ok(cards) => cards,
            Err(err) => {
                warn!(
                    "event=cards_load module=service status=error error_code=store_unreadable error={err}"
                );
                default_cards(now)
            }
        };
        &self.cards
    }

    /// Current authoritative collection.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }

    /// Appends a new card for the current month.
    ///
    /// # Errors
    /// - `ServiceError::Card(CardError::EmptyName)`; the caller should ask again.
    pub fn add_card(&mut self, name: &str) -> ServiceResult<&[Card]> {
        let card = Card::create(name, self.now())?;
        let mut next = self.cards.clone();
        next.push(card);
        Ok(self.commit("add_card", next))
    }

    /// Removes the card with `id`; unknown ids leave the collection as is.
    pub fn remove_card(&mut self, id: &CardId) -> &[Card] {
        if !self.cards.iter().any(|card| &card.id == id) {
            debug!("event=remove_card module=service status=noop");
            return &self.cards;
        }
        let next = remove_card(&self.cards, id);
        self.commit("remove_card", next)
    }

    /// Flips entry `index` of card `id`.
    ///
    /// # Errors
    /// - `CardNotFound`, `ArchivedCard`, or `Card(IndexOutOfRange)`.
    pub fn toggle_entry(&mut self, id: &CardId, index: usize) -> ServiceResult<&[Card]> {
        let now = self.now();
        let (position, card) = self.find(id)?;
        if card.is_archived(&now) {
            return Err(ServiceError::ArchivedCard(id.clone()));
        }
        let toggled = card.toggled(index)?;
        let next = replace_at(&self.cards, position, toggled);
        Ok(self.commit("toggle_entry", next))
    }

    /// Renames card `id`. Archived cards may still be renamed.
    pub fn rename_card(&mut self, id: &CardId, name: &str) -> ServiceResult<&[Card]> {
        let (position, card) = self.find(id)?;
        let renamed = card.renamed(name)?;
        let next = replace_at(&self.cards, position, renamed);
        Ok(self.commit("rename_card", next))
    }

    /// Drops stored cards and reloads, which reseeds the defaults.
    pub fn reset(&mut self) -> &[Card] {
        if let Err(err) = self.store.clear() {
            warn!("event=cards_reset module=service status=error error={err}");
        }
        self.load()
    }

    /// Error of the most recent save, cleared by the next successful one.
    pub fn last_save_error(&self) -> Option<&StoreError> {
        self.last_save_error.as_ref()
    }

    /// First card with `id` and its position in the collection.
    fn find(&self, id: &CardId) -> ServiceResult<(usize, &Card)> {
        self.cards
            .iter()
            .enumerate()
            .find(|(_, card)| &card.id == id)
            .ok_or_else(|| ServiceError::CardNotFound(id.clone()))
    }

    fn commit(&mut self, operation: &str, next: Vec<Card>) -> &[Card] {
        self.cards = next;
        match self.store.save(&self.cards) {
            Ok(()) => {
                self.last_save_error = None;
                info!(
                    "event={operation} module=service status=ok cards={}",
                    self.cards.len()
                );
            }
            Err(err) => {
                warn!(
                    "event={operation} module=service status=degraded error_code=save_failed error={err}"
                );
                self.last_save_error = Some(err);
            }
        }
        &self.cards
    }
}
