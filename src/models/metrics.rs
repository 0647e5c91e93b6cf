use serde::{Deserialize, Serialize};

/// Aggregate metrics for one uploaded task set.
///
/// `trend` is a fixed 7-element series of daily completed-task counts,
/// oldest day first, today last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub total: u32,
    pub open: u32,
    pub completed: u32,
    pub in_progress: u32,
    pub blocked: u32,
    pub completion: u32,
    pub closed_today: u32,
    pub trend: [u32; 7],
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            total: 0,
            open: 0,
            completed: 0,
            in_progress: 0,
            blocked: 0,
            completion: 0,
            closed_today: 0,
            trend: [0; 7],
        }
    }
}

/// Per-project counts for the project donuts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRollup {
    pub name: String,
    pub total: u32,
    pub open: u32,
}

/// Per-assignee counts for the team table and bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeRollup {
    pub name: String,
    pub initials: String,
    pub assigned: u32,
    pub completed: u32,
    pub ongoing: u32,
    pub open: u32,
    /// `round(completed / assigned * 100)`, 0 when nothing is assigned.
    pub completion_rate: u32,
}

/// Counts per status class (the overview donut).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub open: u32,
    pub in_progress: u32,
    pub completed: u32,
    pub blocked: u32,
}
