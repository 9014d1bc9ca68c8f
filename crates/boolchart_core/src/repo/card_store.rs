//! Card collection gateway over a key-value repository.
//!
//! # Responsibility
//! - Load and save the whole card collection under [`CARDS_KEY`].
//! - Seed the default collection on first use.
//!
//! # Invariants
//! - `load` never reports "nothing stored": a missing or undecodable value
//!   yields the default seed, which is persisted when possible.
//! - `save` replaces the stored value wholesale; there is no partial write.

use crate::codec::{self, CodecError};
use crate::db::DbError;
use crate::model::card::Card;
use crate::repo::kv_repo::KeyValueRepository;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the encoded collection.
pub const CARDS_KEY: &str = "cards";

/// When a seeded card starts tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStart {
    /// The moment the store is first seeded.
    Now,
    /// Local noon of a fixed date; `month` is 1-based.
    On { year: i32, month: u32, day: u32 },
}

/// Static description of one default card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedCard {
    pub name: &'static str,
    pub start: SeedStart,
}

/// Cards written on first-ever load. The fixed-date card lands in a past
/// month, so a fresh store always shows one archived example.
pub const DEFAULT_CARDS: &[SeedCard] = &[
    SeedCard {
        name: "Apply for a job",
        start: SeedStart::Now,
    },
    SeedCard {
        name: "5 Leetcode Problems",
        start: SeedStart::Now,
    },
    SeedCard {
        name: "Read 15 Pages",
        // Why: a fresh store should show what an archived card looks like, so
        // this one is pinned to a month that is always in the past.
        start: SeedStart::On {
            year: 2024,
            month: 9,
            day: 20,
        },
    },
    SeedCard {
        name: "Follow Diet",
        start: SeedStart::Now,
    },
    SeedCard {
        name: "Meditate",
        start: SeedStart::Now,
    },
];

impl SeedStart {
    fn resolve(self, now: DateTime<Local>) -> DateTime<Local> {
        match self {
            Self::Now => now,
            Self::On { year, month, day } => {
                let Some(noon) = NaiveDate::from_ymd_opt(year, month, day)
                    .and_then(|date| date.and_hms_opt(12, 0, 0))
                else {
                    warn!("event=store_seed module=store status=error error_code=invalid_seed_date");
                    return now;
                };
                // Noon is never skipped by DST; the UTC reading only covers
                // zones that skip a whole local day, and stays on the same date.
                Local
                    .from_local_datetime(&noon)
                    .earliest()
                    .unwrap_or_else(|| Utc.from_utc_datetime(&noon).with_timezone(&Local))
            }
        }
    }
}

/// Builds the default collection relative to `now`.
pub fn default_cards(now: DateTime<Local>) -> Vec<Card> {
    DEFAULT_CARDS
        .iter()
        .filter_map(|seed| Card::create(seed.name, seed.start.resolve(now)).ok())
        .collect()
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Gateway failure: storage medium or codec.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Codec(CodecError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "card storage failed: {err}"),
            Self::Codec(err) => write!(f, "card encoding failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Codec(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<CodecError> for StoreError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

/// Persists the card collection through a [`KeyValueRepository`].
pub struct CardStore<R: KeyValueRepository> {
    repo: R,
}

impl<R: KeyValueRepository> CardStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Reads the stored collection, seeding defaults when absent or corrupt.
    ///
    /// # Errors
    /// - `StoreError::Db` when the medium cannot be read.
    pub fn load(&self, now: DateTime<Local>) -> StoreResult<Vec<Card>> {
        let Some(text) = self.repo.get(CARDS_KEY)? else {
            info!("event=store_load module=store status=empty");
            return self.seed(now);
        };

        match codec::decode(&text) {
            Ok(cards) => {
                info!(
                    "event=store_load module=store status=ok cards={}",
                    cards.len()
                );
                Ok(cards)
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error error_code=decode_failed error={err}"
                );
                self.seed(now)
            }
        }
    }

    /// Encodes `cards` and replaces the stored value.
    pub fn save(&self, cards: &[Card]) -> StoreResult<()> {
        let text = codec::encode(cards)?;
        if let Err(err) = self.repo.put(CARDS_KEY, &text) {
            warn!(
                "event=store_save module=store status=error error_code=write_failed error={err}"
            );
            return Err(err.into());
        }
        info!(
            "event=store_save module=store status=ok cards={} bytes={}",
            cards.len(),
            text.len()
        );
        Ok(())
    }

    /// Drops the stored collection; the next `load` seeds again.
    pub fn clear(&self) -> StoreResult<bool> {
        Ok(self.repo.delete(CARDS_KEY)?)
    }

    fn seed(&self, now: DateTime<Local>) -> StoreResult<Vec<Card>> {
        let cards = default_cards(now);
        let text = codec::encode(&cards)?;

        if let Err(err) = self.repo.put(CARDS_KEY, &text) {
            warn!(
                "event=store_seed module=store status=error error_code=write_failed error={err}"
            );
            return Ok(cards);
        }
        info!(
            "event=store_seed module=store status=ok cards={}",
            cards.len()
        );

        match self.repo.get(CARDS_KEY)? {
            Some(stored) => Ok(codec::decode(&stored)?),
            None => Ok(cards),
        }
    }
}
