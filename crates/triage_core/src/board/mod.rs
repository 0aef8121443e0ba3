//! Triage board engine.
//!
//! # Responsibility
//! - Order, filter, measure and re-rank triage items.
//! - Plan the persistence updates for a drag-and-drop gesture.
//!
//! # Invariants
//! - Everything here is synchronous and pure: no I/O, no clock reads, no
//!   mutation of caller-owned collections.
//! - Time-sensitive functions take the reference instant as a parameter.

pub mod events;
pub mod filter;
pub mod metrics;
pub mod ordering;
pub mod planner;
