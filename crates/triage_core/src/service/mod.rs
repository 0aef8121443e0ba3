//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and the pure board engine.
//! - Keep host/CLI layers decoupled from storage details.

pub mod board_service;
