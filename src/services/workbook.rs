use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::WorkbookError;
use crate::models::{CellValue, RawRow};

// ─── Workbook Decoder ───

/// Decodes spreadsheet bytes into raw header/value rows.
///
/// The first sheet's first row supplies the headers; every later
/// non-empty row becomes one raw row. Header text is passed through
/// untouched, normalization happens downstream.
pub fn decode_workbook(bytes: &[u8]) -> Result<Vec<RawRow>, WorkbookError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| WorkbookError::Decode(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(WorkbookError::NoSheet)?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| WorkbookError::Decode(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(header_text).collect();

    let mut raw_rows = Vec::new();
    for row in rows {
        let raw: RawRow = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), convert_cell(cell)))
            .collect();
        if raw.iter().all(|(_, value)| value.is_empty()) {
            continue;
        }
        raw_rows.push(raw);
    }
    Ok(raw_rows)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::DateTime(naive),
            None => CellValue::Empty,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let result = decode_workbook(b"this is not a spreadsheet");
        assert!(matches!(result, Err(WorkbookError::Decode(_))));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(decode_workbook(&[]).is_err());
    }

    #[test]
    fn numeric_cells_render_without_trailing_zero() {
        assert_eq!(
            convert_cell(&Data::Float(42.0)),
            CellValue::Number(42.0)
        );
        assert_eq!(CellValue::Number(42.0).as_text().as_deref(), Some("42"));
        assert_eq!(CellValue::Number(2.5).as_text().as_deref(), Some("2.5"));
    }

    #[test]
    fn blank_strings_become_empty_cells() {
        assert_eq!(convert_cell(&Data::String("   ".to_string())), CellValue::Empty);
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(
            convert_cell(&Data::String(" Done ".to_string())),
            CellValue::Text("Done".to_string())
        );
    }
}
