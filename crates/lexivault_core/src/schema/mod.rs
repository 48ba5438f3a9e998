//! Word-document schema validation entry points.
//!
//! # Responsibility
//! - Expose the pure validation API gating every write path.
//! - Keep the field-shape contract declarative and testable in isolation.

pub mod validator;
