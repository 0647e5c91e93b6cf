pub mod filter_engine;
pub mod ingest;
pub mod insight_engine;
pub mod metrics_engine;
pub mod workbook;
