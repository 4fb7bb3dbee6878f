//! Push-based observation primitives.
//!
//! # Responsibility
//! - Hold one current value and fan it out to observers on replacement.
//! - Hand out cancellable subscriptions.
//!
//! # Invariants
//! - Delivery is synchronous and depth-first on the calling thread.
//! - An observer never receives a version older than one it has seen.
//! - Types here are `!Send`; all access happens on one thread.

pub mod observable;
