use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Four-way classification of a task's free-text status.
///
/// Precedence is fixed: Completed > InProgress > Blocked > Open. A status
/// matching several patterns resolves to the first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusClass {
    Completed,
    InProgress,
    Blocked,
    #[default]
    Open,
}

impl StatusClass {
    pub fn label(&self) -> &'static str {
        match self {
            StatusClass::Completed => "Completed",
            StatusClass::InProgress => "In Progress",
            StatusClass::Blocked => "Blocked",
            StatusClass::Open => "Open",
        }
    }
}

pub const DEFAULT_PROJECT: &str = "Other";
pub const DEFAULT_ASSIGNEE: &str = "Unassigned";
pub const DEFAULT_PRIORITY: &str = "Medium";

/// Canonical task record, one per uploaded spreadsheet row.
///
/// `id` comes straight from the source and is neither unique nor required.
/// Unparseable dates are absent, never a placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub project: String,
    pub assignee: String,
    pub status: String,
    pub status_class: StatusClass,
    pub priority: String,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub completed_flag: bool,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: None,
            title: None,
            description: None,
            project: DEFAULT_PROJECT.to_string(),
            assignee: DEFAULT_ASSIGNEE.to_string(),
            status: String::new(),
            status_class: StatusClass::Open,
            priority: DEFAULT_PRIORITY.to_string(),
            due_date: None,
            created_at: None,
            completed_at: None,
            completed_flag: false,
        }
    }
}

impl Task {
    /// The date a range filter matches against: due date first, then
    /// creation date, then the resolved completion date.
    pub fn filter_date(&self) -> Option<NaiveDateTime> {
        self.due_date.or(self.created_at).or(self.completed_at)
    }
}
