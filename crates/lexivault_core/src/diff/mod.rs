//! Structural document comparison entry points.
//!
//! # Responsibility
//! - Expose the pure conflict analysis API used to gate updates.
//! - Keep diff output deterministic so previews and gating agree.

pub mod analyzer;
