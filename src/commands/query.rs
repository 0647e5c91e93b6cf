use serde_json::json;

use crate::models::Settings;
use crate::services::insight_engine::{metrics_summary, GeminiClient, InsightEngine};
use crate::store::SnapshotStore;

/// How many tasks ride along as query context.
const MAX_CONTEXT_TASKS: usize = 100;

/// Answers a free-form question about the uploaded data.
pub async fn answer_query(
    store: &SnapshotStore,
    settings: &Settings,
    question: &str,
) -> Result<String, String> {
    let Some(client) = GeminiClient::from_settings(&settings.ai) else {
        return Ok("AI is not configured. Please set your API key in Settings.".to_string());
    };
    let snapshot = store.read();
    let sample = &snapshot.tasks[..snapshot.tasks.len().min(MAX_CONTEXT_TASKS)];
    let context = json!({
        "summary": metrics_summary(&snapshot.metrics),
        "metrics": snapshot.metrics,
        "tasks": sample,
    });
    let engine = InsightEngine::new(Box::new(client));
    Ok(engine.answer_query(question, &context).await)
}
