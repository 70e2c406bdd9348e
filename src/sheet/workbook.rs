// src/sheet/workbook.rs

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use tracing::{debug, instrument, warn};

use super::cell::{Cell, Row};
use crate::error::{PipelineError, Result};

/// All rows of one worksheet, addressed from A1 regardless of where the used
/// range starts.
#[derive(Debug, Clone)]
pub struct SheetRows {
    pub name: String,
    pub rows: Vec<Row>,
}

/// Parse an in-memory workbook (xls, xlsx, xlsb or ods) into row arrays.
/// `file` is only used for diagnostics.
#[instrument(level = "debug", skip(bytes), fields(len = bytes.len()))]
pub fn load_workbook(bytes: Vec<u8>, file: &str) -> Result<Vec<SheetRows>> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|source| PipelineError::Workbook {
            file: file.to_string(),
            source,
        })?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let rows = range_to_rows(&range);
                debug!(sheet = %name, rows = rows.len(), "loaded sheet");
                sheets.push(SheetRows { name, rows });
            }
            Err(e) => warn!(sheet = %name, error = %e, "skipping unreadable sheet"),
        }
    }

    if sheets.is_empty() {
        return Err(PipelineError::NoSheets {
            file: file.to_string(),
        });
    }
    Ok(sheets)
}

fn range_to_rows(range: &Range<Data>) -> Vec<Row> {
    let (row_offset, col_offset) = match range.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return Vec::new(),
    };

    let mut rows: Vec<Row> = vec![Vec::new(); row_offset];
    for source in range.rows() {
        let mut row = Vec::with_capacity(col_offset + source.len());
        row.resize(col_offset, Cell::Empty);
        row.extend(source.iter().map(to_cell));
        rows.push(row);
    }
    rows
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use rust_xlsxwriter::Workbook;

    #[test]
    fn loads_sheets_with_absolute_columns() -> Result<()> {
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        ws.set_name("NEFT")?;
        // used range starts at B3
        ws.write_string(2, 1, "Bank Name")?;
        ws.write_number(3, 1, 42.0)?;
        let ws2 = wb.add_worksheet();
        ws2.set_name("RTGS")?;
        ws2.write_string(0, 0, "x")?;
        let bytes = wb.save_to_buffer()?;

        let sheets = load_workbook(bytes, "fixture.xlsx")?;
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].name, "NEFT");
        assert_eq!(sheets[0].rows.len(), 4);
        assert_eq!(sheets[0].rows[2][1], Cell::text("Bank Name"));
        assert_eq!(sheets[0].rows[3][1], Cell::Number(42.0));
        assert_eq!(sheets[0].rows[3][0], Cell::Empty);
        Ok(())
    }

    #[test]
    fn garbage_bytes_are_a_workbook_error() {
        let err = load_workbook(b"not a workbook".to_vec(), "junk.xlsx").unwrap_err();
        assert!(matches!(err, PipelineError::Workbook { .. }));
    }
}
