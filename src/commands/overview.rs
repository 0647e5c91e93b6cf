use serde::{Deserialize, Serialize};

use crate::models::{AssigneeRollup, Metrics, ProjectRollup, StatusBreakdown};
use crate::services::metrics_engine::{assignee_rollups, project_rollups, status_breakdown};
use crate::store::SnapshotStore;

/// Everything the overview screen needs in one read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewData {
    pub metrics: Metrics,
    pub status: StatusBreakdown,
    pub projects: Vec<ProjectRollup>,
    pub assignees: Vec<AssigneeRollup>,
    pub uploaded_at: Option<i64>,
}

pub async fn get_metrics(store: &SnapshotStore) -> Result<Metrics, String> {
    Ok(store.read().metrics)
}

pub async fn get_status_breakdown(store: &SnapshotStore) -> Result<StatusBreakdown, String> {
    Ok(status_breakdown(&store.read().metrics))
}

/// Daily completed-task counts for the last seven days, oldest first.
pub async fn get_trend(store: &SnapshotStore) -> Result<[u32; 7], String> {
    Ok(store.read().metrics.trend)
}

pub async fn get_overview(store: &SnapshotStore) -> Result<OverviewData, String> {
    let snapshot = store.read();
    Ok(OverviewData {
        status: status_breakdown(&snapshot.metrics),
        projects: project_rollups(&snapshot.tasks),
        assignees: assignee_rollups(&snapshot.tasks),
        metrics: snapshot.metrics,
        uploaded_at: snapshot.uploaded_at,
    })
}

/// The five busiest assignees, names shortened for the team bar chart.
pub async fn get_team_rollups(store: &SnapshotStore) -> Result<Vec<AssigneeRollup>, String> {
    let snapshot = store.read();
    let mut rollups = assignee_rollups(&snapshot.tasks);
    rollups.sort_by(|a, b| b.assigned.cmp(&a.assigned).then(a.name.cmp(&b.name)));
    rollups.truncate(5);
    for rollup in &mut rollups {
        rollup.name = shorten(&rollup.name, 10);
    }
    Ok(rollups)
}

fn shorten(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let end = name
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(name.len());
    format!("{}...", &name[..end])
}
