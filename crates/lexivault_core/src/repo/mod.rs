//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for word storage.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateLemma`)
//!   in addition to DB transport errors.
//! - Lemmas are stored lower-cased; lookups fold case on the stored side.

pub mod word_repo;
