//! Domain model layer.
//!
//! # Responsibility
//! - Define the canonical per-date record types shared by store and
//!   persistence.

pub mod bucket;
