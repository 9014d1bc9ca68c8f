//! Use-case services consumed by presentation layers.
//!
//! # Responsibility
//! - Sequence card mutations with persistence.
//! - Keep UI callers decoupled from storage details.

pub mod card_service;
