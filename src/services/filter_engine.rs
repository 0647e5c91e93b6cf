use crate::models::{Page, Task, TaskFilter};

// ─── Filter Engine ───

/// Applies every active criterion conjunctively. Inactive criteria
/// (empty strings, no date range) match everything.
pub fn apply_filter(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| matches(task, filter))
        .cloned()
        .collect()
}

fn matches(task: &Task, filter: &TaskFilter) -> bool {
    if !filter.query.is_empty() {
        let needle = filter.query.to_lowercase();
        let hit = task
            .title
            .as_deref()
            .map(|t| contains(t, &needle))
            .unwrap_or(false)
            || task
                .description
                .as_deref()
                .map(|d| contains(d, &needle))
                .unwrap_or(false)
            || task
                .id
                .as_deref()
                .map(|id| contains(id, &needle))
                .unwrap_or(false)
            || contains(&task.project, &needle)
            || contains(&task.assignee, &needle)
            || contains(&task.status, &needle);
        if !hit {
            return false;
        }
    }

    // Project matches by substring, status and assignee exactly, all
    // case-insensitive.
    if !filter.project.is_empty() && !contains(&task.project, &filter.project.to_lowercase()) {
        return false;
    }
    if !filter.status.is_empty() && task.status.to_lowercase() != filter.status.to_lowercase() {
        return false;
    }
    if !filter.assignee.is_empty()
        && task.assignee.to_lowercase() != filter.assignee.to_lowercase()
    {
        return false;
    }

    if let Some(range) = &filter.date_range {
        // Tasks with no date at all never match a date range.
        let Some(date) = task.filter_date() else {
            return false;
        };
        let start = range.start.and_hms_opt(0, 0, 0).expect("valid midnight");
        let end = range.end.and_hms_opt(23, 59, 59).expect("valid end of day");
        if date < start || date > end {
            return false;
        }
    }

    true
}

fn contains(haystack: &str, lowercase_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_needle)
}

// ─── Pagination ───

/// One-based page slicing. An out-of-range page clamps to the nearest
/// valid page rather than returning an empty slice.
pub fn paginate(tasks: Vec<Task>, page: usize, per_page: usize) -> Page {
    let per_page = per_page.max(1);
    let total_items = tasks.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * per_page;
    let items = tasks
        .into_iter()
        .skip(start)
        .take(per_page)
        .collect();
    Page {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}
