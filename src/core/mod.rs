//! Core types: errors, configuration, the persisted quiz key.

pub mod config;
pub mod errors;
pub mod progress_store;
