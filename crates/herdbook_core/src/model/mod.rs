//! Herd domain model.
//!
//! # Responsibility
//! - Define the canonical cow record and its event history.
//! - Own the validation rules every stored cow must satisfy.
//!
//! # Invariants
//! - Every cow is identified by an immutable ear tag.
//! - Events are owned by exactly one cow and never move.

pub mod cow;
