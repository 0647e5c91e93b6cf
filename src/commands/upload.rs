use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::models::Metrics;
use crate::services::ingest::TaskNormalizer;
use crate::services::metrics_engine::compute_metrics;
use crate::services::workbook::decode_workbook;
use crate::store::SnapshotStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    pub message: String,
    pub total: u32,
    pub metrics: Metrics,
    pub uploaded_at: i64,
}

/// Ingests one spreadsheet and replaces the current dataset with it.
///
/// A file that cannot be decoded leaves the existing snapshot untouched.
pub async fn upload_workbook(
    store: &SnapshotStore,
    bytes: &[u8],
) -> Result<UploadResult, String> {
    let rows = decode_workbook(bytes).map_err(|e| {
        log::error!("workbook decode failed: {}", e);
        "Failed to parse file. Please ensure it is a valid Excel file.".to_string()
    })?;

    let tasks = TaskNormalizer::new().normalize_rows(&rows);
    let metrics = compute_metrics(&tasks, Local::now().date_naive());
    let message = format!(
        "Uploaded {} tasks. Open: {}, Completed: {}, Closed today: {}.",
        metrics.total, metrics.open, metrics.completed, metrics.closed_today
    );

    let snapshot = store.replace(tasks, metrics.clone())?;
    log::info!(
        "snapshot replaced: {} tasks, completion {}%",
        metrics.total,
        metrics.completion
    );
    Ok(UploadResult {
        message,
        total: metrics.total,
        metrics,
        uploaded_at: snapshot.uploaded_at.unwrap_or_default(),
    })
}

/// Removes the uploaded dataset entirely.
pub async fn clear_upload(store: &SnapshotStore) -> Result<(), String> {
    store.clear()
}
