//! Domain model for word submissions and persisted records.
//!
//! # Responsibility
//! - Define the transient parsed document shape used by validation/diffing.
//! - Define canonical persisted record structures for the parent word and
//!   its owned child collections.
//!
//! # Invariants
//! - A `WordRecord` keeps the submitted document text verbatim for future
//!   structural diffing.
//! - Child records carry no identity of their own; they are addressed only
//!   through their owning word.

pub mod document;
pub mod word;
