use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{AssigneeRollup, Metrics, ProjectRollup, StatusBreakdown, StatusClass, Task};

// ─── Aggregator ───

/// Computes the headline metrics for a normalized task set. Pure over its
/// inputs; `today` anchors the closed-today count and the trend window.
pub fn compute_metrics(tasks: &[Task], today: NaiveDate) -> Metrics {
    let total = tasks.len() as u32;
    if total == 0 {
        return Metrics::default();
    }

    let mut metrics = Metrics {
        total,
        ..Metrics::default()
    };

    for task in tasks {
        // A task lands in exactly one bucket. The completed flag wins
        // so that raw truthy markers and completed statuses agree.
        if task.completed_flag {
            metrics.completed += 1;
        } else {
            match task.status_class {
                StatusClass::InProgress => metrics.in_progress += 1,
                StatusClass::Blocked => metrics.blocked += 1,
                _ => metrics.open += 1,
            }
        }

        if let Some(done) = task.completed_at {
            if task.completed_flag {
                let done_day = done.date();
                if done_day == today {
                    metrics.closed_today += 1;
                }
                let diff = (today - done_day).num_days();
                if (0..=6).contains(&diff) {
                    metrics.trend[(6 - diff) as usize] += 1;
                }
            }
        }
    }

    metrics.completion =
        (metrics.completed as f64 / metrics.total as f64 * 100.0).round() as u32;
    metrics
}

// ─── Rollups ───

/// Per-project totals keyed by project name, alphabetical. `open` counts
/// every task not yet completed, in-progress and blocked included.
pub fn project_rollups(tasks: &[Task]) -> Vec<ProjectRollup> {
    let mut by_project: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
    for task in tasks {
        let entry = by_project.entry(task.project.as_str()).or_default();
        entry.0 += 1;
        if !task.completed_flag {
            entry.1 += 1;
        }
    }
    by_project
        .into_iter()
        .map(|(name, (total, open))| ProjectRollup {
            name: name.to_string(),
            total,
            open,
        })
        .collect()
}

/// Per-assignee workload and completion rate, alphabetical.
pub fn assignee_rollups(tasks: &[Task]) -> Vec<AssigneeRollup> {
    let mut by_assignee: BTreeMap<&str, (u32, u32, u32, u32)> = BTreeMap::new();
    for task in tasks {
        let entry = by_assignee.entry(task.assignee.as_str()).or_default();
        entry.0 += 1;
        if task.completed_flag {
            entry.1 += 1;
        } else {
            match task.status_class {
                StatusClass::InProgress => entry.2 += 1,
                _ => entry.3 += 1,
            }
        }
    }
    by_assignee
        .into_iter()
        .map(|(name, (assigned, completed, ongoing, open))| AssigneeRollup {
            name: name.to_string(),
            initials: initials(name),
            assigned,
            completed,
            ongoing,
            open,
            completion_rate: if assigned == 0 {
                0
            } else {
                (completed as f64 / assigned as f64 * 100.0).round() as u32
            },
        })
        .collect()
}

pub fn status_breakdown(metrics: &Metrics) -> StatusBreakdown {
    StatusBreakdown {
        open: metrics.open,
        in_progress: metrics.in_progress,
        completed: metrics.completed,
        blocked: metrics.blocked,
    }
}

/// First letters of the first two name tokens, uppercased.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|token| token.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRow;
    use crate::services::ingest::TaskNormalizer;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    fn task(status: &str, completed_at: Option<NaiveDate>) -> Task {
        let classifier = crate::services::ingest::StatusClassifier::new();
        let class = classifier.classify(status);
        Task {
            status: status.to_string(),
            status_class: class,
            completed_flag: class == StatusClass::Completed,
            completed_at: completed_at.and_then(|d| d.and_hms_opt(12, 0, 0)),
            ..Task::default()
        }
    }

    #[test]
    fn empty_set_yields_all_zeros() {
        let metrics = compute_metrics(&[], today());
        assert_eq!(metrics.total, 0);
        assert_eq!(metrics.completion, 0);
        assert_eq!(metrics.trend, [0; 7]);
    }

    #[test]
    fn buckets_partition_the_task_set() {
        let tasks = vec![
            task("To Do", None),
            task("In Progress", None),
            task("Blocked", None),
            task("Done", Some(today())),
            task("Done", Some(today())),
        ];
        let metrics = compute_metrics(&tasks, today());
        assert_eq!(metrics.total, 5);
        assert_eq!(
            metrics.open + metrics.in_progress + metrics.blocked + metrics.completed,
            metrics.total
        );
        assert_eq!(metrics.completed, 2);
        assert_eq!(metrics.closed_today, 2);
        assert_eq!(metrics.completion, 40);
    }

    #[test]
    fn completed_flag_overrides_status_bucket() {
        let mut blocked_but_done = task("Blocked", Some(today()));
        blocked_but_done.completed_flag = true;
        let metrics = compute_metrics(&[blocked_but_done], today());
        assert_eq!(metrics.completed, 1);
        assert_eq!(metrics.blocked, 0);
    }

    #[test]
    fn trend_is_oldest_first_over_seven_days() {
        let tasks = vec![
            task("Done", Some(today())),
            task("Done", Some(today() - chrono::Duration::days(3))),
            task("Done", Some(today() - chrono::Duration::days(6))),
            // Outside the window, ignored.
            task("Done", Some(today() - chrono::Duration::days(7))),
        ];
        let metrics = compute_metrics(&tasks, today());
        assert_eq!(metrics.trend, [1, 0, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn future_closures_do_not_enter_the_trend() {
        let tasks = vec![task("Done", Some(today() + chrono::Duration::days(1)))];
        let metrics = compute_metrics(&tasks, today());
        assert_eq!(metrics.trend, [0; 7]);
        assert_eq!(metrics.closed_today, 0);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let tasks = vec![task("Done", Some(today())), task("Open", None)];
        let first = compute_metrics(&tasks, today());
        let second = compute_metrics(&tasks, today());
        assert_eq!(first, second);
    }

    #[test]
    fn end_to_end_three_rows() {
        fn cell(s: &str) -> crate::models::CellValue {
            crate::models::CellValue::Text(s.to_string())
        }
        let rows: Vec<RawRow> = vec![
            vec![
                ("Title".to_string(), cell("Ship it")),
                ("Status".to_string(), cell("Done")),
                ("Completed At".to_string(), cell("2026-08-30")),
            ],
            vec![
                ("Title".to_string(), cell("Review")),
                ("Status".to_string(), cell("In Progress")),
            ],
            vec![("Title".to_string(), cell("Plan"))],
        ];
        let tasks = TaskNormalizer::new().normalize_rows(&rows);
        let metrics = compute_metrics(&tasks, today());
        assert_eq!(metrics.total, 3);
        assert_eq!(metrics.completed, 1);
        assert_eq!(metrics.in_progress, 1);
        assert_eq!(metrics.open, 1);
        assert_eq!(metrics.blocked, 0);
        assert_eq!(metrics.completion, 33);
        assert_eq!(metrics.closed_today, 1);
    }

    #[test]
    fn project_rollup_counts_open_tasks() {
        let mut a = task("Open", None);
        a.project = "Alpha".to_string();
        let mut b = task("Done", Some(today()));
        b.project = "Alpha".to_string();
        let mut c = task("Open", None);
        c.project = "Beta".to_string();
        let rollups = project_rollups(&[a, b, c]);
        assert_eq!(rollups.len(), 2);
        assert_eq!(rollups[0].name, "Alpha");
        assert_eq!(rollups[0].total, 2);
        assert_eq!(rollups[0].open, 1);
        assert_eq!(rollups[1].name, "Beta");
        assert_eq!(rollups[1].open, 1);
    }

    #[test]
    fn project_rollup_open_includes_in_progress_and_blocked() {
        let mut a = task("In Progress", None);
        a.project = "Alpha".to_string();
        let mut b = task("Blocked", None);
        b.project = "Alpha".to_string();
        let mut c = task("Done", Some(today()));
        c.project = "Alpha".to_string();
        let rollups = project_rollups(&[a, b, c]);
        assert_eq!(rollups[0].total, 3);
        // Anything not completed still counts as open work.
        assert_eq!(rollups[0].open, 2);
    }

    #[test]
    fn assignee_rollup_completion_rate() {
        let mut done = task("Done", Some(today()));
        done.assignee = "Ada Lovelace".to_string();
        let mut open = task("Open", None);
        open.assignee = "Ada Lovelace".to_string();
        let rollups = assignee_rollups(&[done, open]);
        assert_eq!(rollups.len(), 1);
        let ada = &rollups[0];
        assert_eq!(ada.initials, "AL");
        assert_eq!(ada.assigned, 2);
        assert_eq!(ada.completed, 1);
        assert_eq!(ada.completion_rate, 50);
    }

    #[test]
    fn initials_take_first_two_tokens() {
        assert_eq!(initials("Ada Lovelace"), "AL");
        assert_eq!(initials("Plato"), "P");
        assert_eq!(initials("jean luc picard"), "JL");
        assert_eq!(initials(""), "");
    }
}
