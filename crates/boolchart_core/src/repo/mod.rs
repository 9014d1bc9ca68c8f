//! Persistence layer for the card collection.
//!
//! # Responsibility
//! - `kv_repo`: text values under keys, backed by SQLite.
//! - `card_store`: encode/decode the collection and seed first-run defaults.
//!
//! # Invariants
//! - The collection is stored under one key and replaced wholesale.

pub mod card_store;
pub mod kv_repo;
