use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::models::{CellValue, RawRow, StatusClass, Task};

// ─── Header Normalizer ───

/// Lowercase a column header and collapse every whitespace run into a
/// single underscore. `"Due  Date"` becomes `"due_date"`.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

// ─── Field Interpreters ───

const TRUTHY_TOKENS: &[&str] = &["true", "yes", "y", "1", "done", "completed", "closed"];

/// Total boolean coercion: native `true`, or a display form in the truthy
/// token set. Everything else, including empty cells, is false.
pub fn detect_bool(value: &CellValue) -> bool {
    match value {
        CellValue::Bool(b) => *b,
        other => match other.as_text() {
            Some(text) => TRUTHY_TOKENS.contains(&text.to_lowercase().as_str()),
            None => false,
        },
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
];

/// Total date parsing: native date values pass through, strings go through
/// a generic format ladder, everything else is "no date". Never fails.
pub fn parse_date(value: &CellValue) -> Option<NaiveDateTime> {
    match value {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Text(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Ordered (pattern, class) table evaluated in fixed precedence order.
/// The first matching pattern wins; no match means Open.
pub struct StatusClassifier {
    table: Vec<(Regex, StatusClass)>,
}

impl StatusClassifier {
    pub fn new() -> Self {
        let table = vec![
            (
                Regex::new(r"done|complete|resolved").expect("valid completed pattern"),
                StatusClass::Completed,
            ),
            (
                Regex::new(r"in.?progress|in.?review|testing").expect("valid in-progress pattern"),
                StatusClass::InProgress,
            ),
            (
                Regex::new(r"blocked|waiting|on.?hold").expect("valid blocked pattern"),
                StatusClass::Blocked,
            ),
        ];
        Self { table }
    }

    pub fn classify(&self, status: &str) -> StatusClass {
        let lower = status.to_lowercase();
        for (pattern, class) in &self.table {
            if pattern.is_match(&lower) {
                return *class;
            }
        }
        StatusClass::Open
    }
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Task Normalizer ───

const ID_KEYS: &[&str] = &["id", "task_id", "key"];
const STATUS_KEYS: &[&str] = &["status", "state", "stage", "progress"];
const COMPLETED_FLAG_KEYS: &[&str] = &["completed", "done"];
const DUE_DATE_KEYS: &[&str] = &["due_date", "deadline", "duedate", "due"];
const CREATED_KEYS: &[&str] = &["created_at", "createdat", "created", "start_date"];
const COMPLETED_DATE_KEYS: &[&str] =
    &["completed_date", "completed_at", "closed_at", "done_at", "updated", "date"];

/// Turns one raw row into exactly one canonical [`Task`]. Rows are never
/// dropped or merged; an all-empty row becomes an all-default Task
/// classified Open.
pub struct TaskNormalizer {
    classifier: StatusClassifier,
}

impl TaskNormalizer {
    pub fn new() -> Self {
        Self {
            classifier: StatusClassifier::new(),
        }
    }

    pub fn normalize_row(&self, row: &RawRow) -> Task {
        // Header collisions resolve last-write-wins in column order.
        let mut fields: HashMap<String, CellValue> = HashMap::new();
        for (header, value) in row {
            fields.insert(normalize_header(header), value.clone());
        }

        let status = first_text(&fields, STATUS_KEYS).unwrap_or_default();
        let status_class = self.classifier.classify(&status);
        let completed_flag = COMPLETED_FLAG_KEYS
            .iter()
            .filter_map(|key| fields.get(*key))
            .any(detect_bool)
            || status_class == StatusClass::Completed;

        let mut task = Task {
            id: first_text(&fields, ID_KEYS),
            title: text(&fields, "title"),
            description: text(&fields, "description"),
            status,
            status_class,
            due_date: first_date(&fields, DUE_DATE_KEYS),
            created_at: first_date(&fields, CREATED_KEYS),
            completed_at: first_date(&fields, COMPLETED_DATE_KEYS),
            completed_flag,
            ..Task::default()
        };
        if let Some(project) = text(&fields, "project") {
            task.project = project;
        }
        if let Some(assignee) = text(&fields, "assignee") {
            task.assignee = assignee;
        }
        if let Some(priority) = text(&fields, "priority") {
            task.priority = priority;
        }
        task
    }

    pub fn normalize_rows(&self, rows: &[RawRow]) -> Vec<Task> {
        rows.iter().map(|row| self.normalize_row(row)).collect()
    }
}

impl Default for TaskNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn text(fields: &HashMap<String, CellValue>, key: &str) -> Option<String> {
    fields.get(key).and_then(|v| v.as_text())
}

fn first_text(fields: &HashMap<String, CellValue>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(fields, key))
}

fn first_date(fields: &HashMap<String, CellValue>, keys: &[&str]) -> Option<NaiveDateTime> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find_map(parse_date)
}
