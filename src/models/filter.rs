use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Task;

/// Inclusive date range; `end` is treated as end-of-day when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Ephemeral per-view filter state. All active parts must match (AND).
///
/// Match semantics are deliberately uneven: `project` is a case-insensitive
/// substring match, while `status` and `assignee` are case-insensitive
/// exact matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    pub query: String,
    pub project: String,
    pub status: String,
    pub assignee: String,
    pub date_range: Option<DateRange>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
            && self.project.trim().is_empty()
            && self.status.trim().is_empty()
            && self.assignee.trim().is_empty()
            && self.date_range.is_none()
    }
}

/// One page of filtered tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Task>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}
