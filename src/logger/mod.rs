//! Activity logging: JSONL writer fed by a background logger thread.

pub mod activity;
pub mod jsonl;
