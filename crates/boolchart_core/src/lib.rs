//! Core habit-tracking engine for BoolChart.
//! This crate is the single source of truth for card invariants; UI layers
//! render what it returns and call back into `CardService`.

pub mod calendar;
pub mod codec;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::{chunk_into_weeks, day_index, days_in_month, entry_index, week_count};
pub use codec::{decode, encode, CodecError};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::card::{is_archived, remove_card, Card, CardError, CardId, EntryState};
pub use repo::card_store::{default_cards, CardStore, StoreError, StoreResult, CARDS_KEY};
pub use repo::kv_repo::{KeyValueRepository, SqliteKeyValueRepository};
pub use service::card_service::{CardService, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
