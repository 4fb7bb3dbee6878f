//! Herd use-case services.
//!
//! # Responsibility
//! - Own the reactive herd collection and keep the durable copy in sync.
//! - Derive the filtered view and on-demand queries from it.
//!
//! # See also
//! - `repo::herd_repo` for the durable boundary.

pub mod filter;
pub mod filtered_view;
pub mod herd_store;
pub mod queries;
