use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{Page, TaskFilter};
use crate::services::filter_engine::{apply_filter, paginate};
use crate::store::SnapshotStore;

pub const DEFAULT_PER_PAGE: usize = 10;

/// Distinct filter options harvested from the current dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskFacets {
    pub projects: Vec<String>,
    pub statuses: Vec<String>,
    pub assignees: Vec<String>,
}

/// Filtered, paginated view over the uploaded tasks. Callers are expected
/// to request page 1 again whenever the filter or page size changes.
pub async fn list_tasks(
    store: &SnapshotStore,
    filter: &TaskFilter,
    page: usize,
    per_page: usize,
) -> Result<Page, String> {
    let snapshot = store.read();
    let filtered = apply_filter(&snapshot.tasks, filter);
    Ok(paginate(filtered, page, per_page))
}

/// Distinct projects, statuses and assignees for the filter dropdowns,
/// in first-seen order with empties skipped.
pub async fn task_facets(store: &SnapshotStore) -> Result<TaskFacets, String> {
    let snapshot = store.read();
    Ok(TaskFacets {
        projects: distinct(snapshot.tasks.iter().map(|t| t.project.as_str())),
        statuses: distinct(snapshot.tasks.iter().map(|t| t.status.as_str())),
        assignees: distinct(snapshot.tasks.iter().map(|t| t.assignee.as_str())),
    })
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.trim().is_empty())
        .filter(|v| seen.insert(v.to_string()))
        .map(str::to_string)
        .collect()
}
