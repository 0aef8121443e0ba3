//! Domain model for triage board items.
//!
//! # Responsibility
//! - Define canonical data structures used by board logic.
//! - Own the adapters that translate external tag and timestamp shapes.
//!
//! # Invariants
//! - Board logic reads `TriageStatus`, never raw column tag strings.
//! - Timestamps reaching board logic are epoch milliseconds.

pub mod item;
pub mod record;
pub mod status;
pub mod timestamp;
