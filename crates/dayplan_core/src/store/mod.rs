//! In-memory record store layer.
//!
//! # Responsibility
//! - Own all live date-scoped state behind the boundary operations.

pub mod date_record_store;
