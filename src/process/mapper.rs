// src/process/mapper.rs
//
// Fixed-column-index field mapping for the infrastructure feed, plus the
// identity columns shared by every feed.

use tracing::debug;

use super::classify::{RowContext, RowShape};
use crate::identity::{infer_bank_type, BankType, ReferenceTable};
use crate::layout::{Epoch, INFRA_LAYOUT};
use crate::record::{BankIdentity, BankRecord, InfraMetrics, Metric};
use crate::sheet::{cell_at, coerce, Cell, Coerced};

/// A mapped metric block plus how many of its fields were zero-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapped<M> {
    pub metrics: M,
    pub zero_filled: usize,
}

/// Bank-type fallback chain: reference table, sheet bank-type header,
/// sheet sector header, name keywords.
fn bank_type_for(resolved: Option<BankType>, context: &RowContext, raw_name: &str) -> BankType {
    resolved
        .or_else(|| context.bank_type.as_deref().and_then(BankType::from_label))
        .or_else(|| context.sector.as_deref().and_then(BankType::from_label))
        .or_else(|| infer_bank_type(raw_name))
        .unwrap_or(BankType::Unclassified)
}

/// Identity fields of a data row. The flag is `false` when the name was
/// not found in the reference table.
pub fn resolve_identity(
    row: &[Cell],
    shape: &RowShape,
    shift: usize,
    context: &RowContext,
    table: &ReferenceTable,
) -> (BankIdentity, bool) {
    let name_cell = cell_at(row, shape.name_column + shift);
    let resolution = table.resolve_cell(name_cell);
    let raw_name = name_cell.label();
    if !resolution.matched {
        debug!(name = %raw_name, "unresolved bank identity");
    }
    let identity = BankIdentity {
        serial_number: Metric::from(coerce(cell_at(row, shape.serial_column))),
        bank_type: bank_type_for(resolution.bank_type, context, &raw_name),
        bank_name: resolution.full_name,
        bank_short_name: resolution.short_name,
    };
    (identity, resolution.matched)
}

/// Read every infrastructure field from the column its epoch assigns,
/// moved right by `shift`. Absent columns and blank cells become 0.
pub fn map_infra_metrics(row: &[Cell], epoch: Epoch, shift: usize) -> Mapped<InfraMetrics> {
    let mut metrics = InfraMetrics::default();
    let mut zero_filled = 0;
    for fc in INFRA_LAYOUT {
        let value = match fc.column(epoch) {
            Some(col) => coerce(cell_at(row, col + shift)),
            None => Coerced::Missing,
        };
        if value == Coerced::Missing {
            zero_filled += 1;
        }
        *metrics.slot_mut(fc.field) = Metric::from(value);
    }
    Mapped {
        metrics,
        zero_filled,
    }
}

/// A data row turned into its canonical record.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow<M> {
    pub record: BankRecord<M>,
    pub zero_filled: usize,
    pub matched: bool,
}

/// One infrastructure bank row to its canonical record.
pub fn map_row(
    row: &[Cell],
    shape: &RowShape,
    context: &RowContext,
    table: &ReferenceTable,
) -> MappedRow<InfraMetrics> {
    let shift = shape.shift(row);
    let (identity, matched) = resolve_identity(row, shape, shift, context, table);
    let Mapped {
        metrics,
        zero_filled,
    } = map_infra_metrics(row, shape.epoch, shift);
    MappedRow {
        record: BankRecord { identity, metrics },
        zero_filled,
        matched,
    }
}
