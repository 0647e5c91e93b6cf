use crate::models::Settings;
use crate::services::insight_engine::{GeminiClient, InsightEngine};
use crate::store::SnapshotStore;

/// Markdown insight report over the current dataset.
pub async fn generate_insights(
    store: &SnapshotStore,
    settings: &Settings,
) -> Result<String, String> {
    let Some(client) = GeminiClient::from_settings(&settings.ai) else {
        return Ok("AI is not configured. Please set your API key in Settings.".to_string());
    };
    let snapshot = store.read();
    let engine = InsightEngine::new(Box::new(client));
    Ok(engine.generate_insights(&snapshot.tasks).await)
}
