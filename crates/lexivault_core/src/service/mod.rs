//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, conflict analysis and repository calls into
//!   use-case level APIs.
//! - Keep transport layers decoupled from storage details.

pub mod query_service;
pub mod word_service;
