//! Use-case service layer.
//!
//! # Responsibility
//! - Provide the facade that UI and fetcher collaborators call.

pub mod planner_service;
