use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GenerationError;
use crate::models::{AiSettings, Metrics, Task};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// At most this many tasks are serialized into a prompt.
const MAX_PROMPT_TASKS: usize = 100;

// ─── Types ───

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

// ─── Text Generation ───

/// Seam between the insight engine and whatever model backs it. Tests
/// plug in a canned generator, production uses [`GeminiClient`].
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    pub fn from_settings(ai: &AiSettings) -> Option<Self> {
        let api_key = crate::utils::config::resolve_api_key(&ai.api_key);
        if !ai.enabled || api_key.is_empty() {
            return None;
        }
        Some(Self::new(api_key, ai.model.clone()))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, self.model, self.api_key
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed
            .candidates
            .and_then(|mut c| c.drain(..).next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|mut p| p.drain(..).next())
            .and_then(|p| p.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyContent)
    }
}

// ─── Insight Engine ───

pub struct InsightEngine {
    generator: Box<dyn TextGenerator>,
}

impl InsightEngine {
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Markdown insight report over the uploaded tasks. Degrades to a
    /// canned sentence instead of surfacing transport errors.
    pub async fn generate_insights(&self, tasks: &[Task]) -> String {
        if tasks.is_empty() {
            return "No task data available to generate insights.".to_string();
        }
        let prompt = insights_prompt(tasks);
        match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("insight generation failed: {}", e);
                "Failed to generate insights. Please try again later.".to_string()
            }
        }
    }

    /// Free-form question over the current snapshot context.
    pub async fn answer_query(&self, question: &str, context: &Value) -> String {
        if question.trim().is_empty() {
            return "Please provide a question.".to_string();
        }
        let prompt = query_prompt(question, context);
        match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("query answering failed: {}", e);
                "Sorry, I encountered an error processing your request.".to_string()
            }
        }
    }
}

/// The slice of a task worth sending to the model.
#[derive(Serialize)]
struct TaskDigest<'a> {
    title: Option<&'a str>,
    status: &'a str,
    priority: &'a str,
    project: &'a str,
    assignee: &'a str,
    due_date: Option<String>,
}

impl<'a> From<&'a Task> for TaskDigest<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            title: task.title.as_deref(),
            status: &task.status,
            priority: &task.priority,
            project: &task.project,
            assignee: &task.assignee,
            due_date: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

pub fn insights_prompt(tasks: &[Task]) -> String {
    let sample: Vec<TaskDigest> = tasks
        .iter()
        .take(MAX_PROMPT_TASKS)
        .map(TaskDigest::from)
        .collect();
    let data = serde_json::to_string_pretty(&sample).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Analyze the following task data and provide key insights and trends.\n\
         Focus on completion rates, common issues, and team performance. Be concise and data-driven.\n\
         Here's the data: {}\n\n\
         Provide the response in markdown format with appropriate headings.",
        data
    )
}

pub fn query_prompt(question: &str, context: &Value) -> String {
    let data = serde_json::to_string_pretty(context).unwrap_or_else(|_| "{}".to_string());
    format!(
        "You are a helpful assistant analyzing task management data.\n\
         Answer the following question based on the provided data. If you don't know the answer, say so.\n\n\
         Question: {}\n\n\
         Data Context: {}\n\n\
         Provide a clear, concise response.",
        question, data
    )
}

/// One-line summary of the current snapshot used as query context when a
/// full task dump would be too heavy.
pub fn metrics_summary(metrics: &Metrics) -> String {
    format!(
        "Uploaded data: {} tasks closed today, {} open. Completion {}%.",
        metrics.closed_today, metrics.open, metrics.completion
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusClass;

    struct Canned(Result<String, ()>);

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(GenerationError::EmptyContent),
            }
        }
    }

    fn sample_task() -> Task {
        Task {
            title: Some("Ship release".to_string()),
            status: "Done".to_string(),
            status_class: StatusClass::Completed,
            completed_flag: true,
            ..Task::default()
        }
    }

    #[tokio::test]
    async fn empty_task_set_short_circuits() {
        let engine = InsightEngine::new(Box::new(Canned(Ok("unused".to_string()))));
        assert_eq!(
            engine.generate_insights(&[]).await,
            "No task data available to generate insights."
        );
    }

    #[tokio::test]
    async fn generation_failure_degrades_to_fallback() {
        let engine = InsightEngine::new(Box::new(Canned(Err(()))));
        assert_eq!(
            engine.generate_insights(&[sample_task()]).await,
            "Failed to generate insights. Please try again later."
        );
    }

    #[tokio::test]
    async fn blank_question_is_rejected() {
        let engine = InsightEngine::new(Box::new(Canned(Ok("unused".to_string()))));
        assert_eq!(
            engine.answer_query("   ", &Value::Null).await,
            "Please provide a question."
        );
    }

    #[tokio::test]
    async fn query_failure_degrades_to_fallback() {
        let engine = InsightEngine::new(Box::new(Canned(Err(()))));
        assert_eq!(
            engine.answer_query("how many open?", &Value::Null).await,
            "Sorry, I encountered an error processing your request."
        );
    }

    #[test]
    fn prompt_truncates_to_one_hundred_tasks() {
        let tasks: Vec<Task> = (0..150)
            .map(|i| Task {
                title: Some(format!("T-{i}")),
                ..Task::default()
            })
            .collect();
        let prompt = insights_prompt(&tasks);
        assert!(prompt.contains("T-99"));
        assert!(!prompt.contains("T-100"));
    }

    #[test]
    fn metrics_summary_wording() {
        let metrics = Metrics {
            total: 10,
            open: 4,
            completed: 6,
            completion: 60,
            closed_today: 2,
            ..Metrics::default()
        };
        assert_eq!(
            metrics_summary(&metrics),
            "Uploaded data: 2 tasks closed today, 4 open. Completion 60%."
        );
    }
}
