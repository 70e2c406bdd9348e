// src/process/header.rs

use tracing::trace;

use super::sentinel::is_sentinel;
use super::utils::{clean_str, strip_index_suffix};
use crate::sheet::{cell_at, Row};

/// Header labels for one column, outermost first. Empty means "ignore this column".
pub type ColumnPath = Vec<String>;

/// Collapse a multi-row header block into one path per column.
///
/// Each header row is forward-filled left to right, so a merged label
/// covers every column to its right until the next label in that row.
/// The column's path is then read top to bottom, dropping blanks and
/// sector/bank-type labels and stripping `| N` index suffixes.
pub fn flatten(header_rows: &[Row], width: usize) -> Vec<ColumnPath> {
    // 1) forward-fill every header row across the full width
    let filled: Vec<Vec<String>> = header_rows
        .iter()
        .map(|row| {
            let mut last = String::new();
            (0..width)
                .map(|col| {
                    let label = clean_str(&cell_at(row, col).label());
                    if !label.is_empty() {
                        last = label;
                    }
                    last.clone()
                })
                .collect()
        })
        .collect();

    // 2) read each column top to bottom
    (0..width)
        .map(|col| {
            let path: ColumnPath = filled
                .iter()
                .map(|row| row[col].as_str())
                .filter(|label| !label.is_empty() && !is_sentinel(label))
                .map(|label| strip_index_suffix(label).trim().to_string())
                .filter(|label| !label.is_empty())
                .collect();
            trace!(col, path = ?path, "flattened header column");
            path
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Cell;

    fn row(cells: &[&str]) -> Row {
        cells
            .iter()
            .map(|s| if s.is_empty() { Cell::Empty } else { Cell::text(*s) })
            .collect()
    }

    #[test]
    fn nested_infrastructure_header() {
        let header = vec![
            row(&["Sr. No.", "Name of the Bank", "Infrastructure", "", "", ""]),
            row(&["", "", "Number - Outstanding", "", "", ""]),
            row(&["", "", "ATMs & CRMs", "", "PoS", "Micro ATMs"]),
            row(&["", "", "On-site", "Off-site", "", ""]),
        ];
        let paths = flatten(&header, 6);
        assert_eq!(
            paths[2],
            vec!["Infrastructure", "Number - Outstanding", "ATMs & CRMs", "On-site"]
        );
        assert_eq!(
            paths[3],
            vec!["Infrastructure", "Number - Outstanding", "ATMs & CRMs", "Off-site"]
        );
        // row-wise fill carries "Off-site" into later columns of the same row
        assert_eq!(
            paths[4],
            vec!["Infrastructure", "Number - Outstanding", "PoS", "Off-site"]
        );
        assert_eq!(paths[0], vec!["Sr. No."]);
        assert_eq!(paths[1], vec!["Name of the Bank"]);
    }

    #[test]
    fn fill_runs_across_not_down() {
        let header = vec![row(&["A", "", "B"]), row(&["", "x", ""])];
        let paths = flatten(&header, 3);
        assert_eq!(paths[0], vec!["A"]);
        assert_eq!(paths[1], vec!["A", "x"]);
        assert_eq!(paths[2], vec!["B", "x"]);
    }

    #[test]
    fn drops_sentinels_and_index_suffixes() {
        let header = vec![
            row(&["Public Sector Banks", "NEFT"]),
            row(&["Amount | 2", "No. of Transactions | 13"]),
        ];
        let paths = flatten(&header, 3);
        assert_eq!(paths[0], vec!["Amount"]);
        assert_eq!(paths[1], vec!["NEFT", "No. of Transactions"]);
        assert_eq!(paths[2], vec!["NEFT", "No. of Transactions"]);
    }

    #[test]
    fn empty_header_gives_empty_paths() {
        let paths = flatten(&[], 4);
        assert_eq!(paths.len(), 4);
        assert!(paths.iter().all(|p| p.is_empty()));
    }
}
