use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A raw spreadsheet cell as produced by the workbook decoder.
///
/// Every field interpreter downstream is total over this union: malformed
/// input degrades into a default, it never aborts ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    DateTime(NaiveDateTime),
    Text(String),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Display form of a cell, `None` for empty cells. Whole numbers render
    /// without a trailing `.0` so numeric IDs keep their original shape.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::DateTime(dt) => Some(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

/// One decoded row: original header strings paired with cell values,
/// in sheet column order.
pub type RawRow = Vec<(String, CellValue)>;
