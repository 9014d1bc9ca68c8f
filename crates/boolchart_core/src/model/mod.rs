//! Habit card domain model.
//!
//! # Responsibility
//! - Define the card entity and its pure mutations.
//!
//! # Invariants
//! - A collection is a plain ordered `Vec<Card>`; order is display and
//!   persistence order.
//! - No two cards in a collection share a `CardId`.

pub mod card;
