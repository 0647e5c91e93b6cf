//! Task ingestion and productivity metrics engine.
//!
//! One spreadsheet upload at a time is decoded, normalized into canonical
//! tasks, aggregated into dashboard metrics, and held in a file-backed
//! snapshot store. An optional Gemini-backed insight engine answers
//! questions about the current dataset.

pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

pub use store::{Snapshot, SnapshotStore};

/// Reads `.env` and wires up env_logger. Call once at startup.
pub fn init() {
    utils::config::load_dotenv();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
