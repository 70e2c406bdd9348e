// src/process/assemble.rs

use serde::Serialize;
use tracing::{debug, warn};

use super::classify::{Classifier, RowKind};
use super::mapper::{resolve_identity, Mapped};
use crate::identity::ReferenceTable;
use crate::record::BankRecord;
use crate::sheet::{cell_at, Cell, Row};

/// Row-level outcomes of one section, for the per-file summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyStats {
    pub rows_seen: usize,
    pub banks: usize,
    pub skipped_rows: usize,
    pub unresolved_names: usize,
    pub zero_filled: usize,
    pub total_seen: bool,
}

impl AssemblyStats {
    pub fn merge(&mut self, other: &AssemblyStats) {
        self.rows_seen += other.rows_seen;
        self.banks += other.banks;
        self.skipped_rows += other.skipped_rows;
        self.unresolved_names += other.unresolved_names;
        self.zero_filled += other.zero_filled;
        self.total_seen |= other.total_seen;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assembled<M> {
    pub banks: Vec<BankRecord<M>>,
    pub total: Option<M>,
    pub stats: AssemblyStats,
}

/// Classify `rows` in order and collect bank records until a total row.
///
/// `map_fields` turns a data or total row (with its positional shift) into
/// the feed's metric block. Records keep source row order.
pub fn assemble<M, F>(
    rows: &[Row],
    mut classifier: Classifier,
    table: &ReferenceTable,
    mut map_fields: F,
) -> Assembled<M>
where
    F: FnMut(&[Cell], usize) -> Mapped<M>,
{
    let mut banks = Vec::new();
    let mut total = None;
    let mut stats = AssemblyStats::default();

    for row in rows {
        stats.rows_seen += 1;
        match classifier.next_row(row) {
            RowKind::BankData => {
                let shape = *classifier.shape();
                let shift = shape.shift(row);
                let (identity, matched) =
                    resolve_identity(row, &shape, shift, classifier.context(), table);
                let Mapped {
                    metrics,
                    zero_filled,
                } = map_fields(row, shift);
                if !matched {
                    stats.unresolved_names += 1;
                }
                stats.zero_filled += zero_filled;
                banks.push(BankRecord { identity, metrics });
            }
            RowKind::Total => {
                let shift = classifier.shape().shift(row);
                total = Some(map_fields(row, shift).metrics);
                stats.total_seen = true;
                debug!(row = stats.rows_seen, "total row closes section");
                break;
            }
            RowKind::Ignore => {
                if cell_at(row, classifier.shape().serial_column).is_numeric() {
                    stats.skipped_rows += 1;
                }
            }
            RowKind::SectorHeader | RowKind::BankTypeHeader => {}
        }
    }

    stats.banks = banks.len();
    if stats.unresolved_names > 0 {
        warn!(
            unresolved = stats.unresolved_names,
            banks = stats.banks,
            "bank names not in the reference table"
        );
    }
    Assembled {
        banks,
        total,
        stats,
    }
}
