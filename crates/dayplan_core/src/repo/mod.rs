//! Persistence layer.
//!
//! # Responsibility
//! - Keep SQL details behind repository contracts.

pub mod state_repo;
