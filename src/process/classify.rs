// src/process/classify.rs

use tracing::{debug, trace};

use super::sentinel::{is_bank_type_label, is_sector_label, is_sentinel};
use crate::layout::{column_shift, Epoch};
use crate::sheet::{cell_at, Cell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    SectorHeader,
    BankTypeHeader,
    Total,
    BankData,
    Ignore,
}

/// Where identity columns sit and how wide a usable data row must be.
#[derive(Debug, Clone, Copy)]
pub struct RowShape {
    pub serial_column: usize,
    pub name_column: usize,
    pub min_columns: usize,
    pub epoch: Epoch,
}

impl RowShape {
    pub fn shift(&self, row: &[Cell]) -> usize {
        column_shift(row, self.epoch, self.name_column)
    }
}

/// Group label a header row carries: the first cell when the name column
/// is blank, or the name column when the serial column is blank.
fn header_label<'a>(row: &'a [Cell], shape: &RowShape) -> Option<&'a str> {
    let first = cell_at(row, shape.serial_column);
    let name = cell_at(row, shape.name_column);
    if name.is_blank() {
        first.trimmed()
    } else if first.is_blank() {
        name.trimmed()
    } else {
        None
    }
}

fn is_total_label(cell: &Cell) -> bool {
    cell.trimmed()
        .map(|t| {
            let t = t.to_lowercase();
            t == "total" || t == "grand total"
        })
        .unwrap_or(false)
}

/// Stateless rules, first match wins.
pub fn classify(row: &[Cell], shape: &RowShape) -> RowKind {
    // 1) + 2) group headers; sectors checked first
    if let Some(label) = header_label(row, shape) {
        if is_sector_label(label) {
            return RowKind::SectorHeader;
        }
        if is_bank_type_label(label) {
            return RowKind::BankTypeHeader;
        }
    }

    // 3) totals
    if is_total_label(cell_at(row, shape.serial_column)) || is_total_label(cell_at(row, shape.name_column)) {
        return RowKind::Total;
    }

    // 4) bank rows
    let shift = shape.shift(row);
    if cell_at(row, shape.serial_column).is_numeric() {
        let name = cell_at(row, shape.name_column + shift);
        let usable_name = !name.is_numeric() && name.trimmed().map(|n| !is_sentinel(n)).unwrap_or(false);
        if usable_name && row.len() >= shape.min_columns + shift {
            return RowKind::BankData;
        }
        debug!(name = ?name, width = row.len(), "row skipped: numeric serial without a usable bank row");
    }

    // 5) everything else
    RowKind::Ignore
}

/// Sector / bank-type labels in force for a data row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowContext {
    pub sector: Option<String>,
    pub bank_type: Option<String>,
}

/// Walks a sheet top to bottom carrying the current sector and bank type.
/// Once a total row is seen the classifier is closed and every later row
/// is `Ignore`.
#[derive(Debug, Clone)]
pub struct Classifier {
    shape: RowShape,
    context: RowContext,
    closed: bool,
}

impl Classifier {
    pub fn new(shape: RowShape) -> Self {
        Self {
            shape,
            context: RowContext::default(),
            closed: false,
        }
    }

    pub fn shape(&self) -> &RowShape {
        &self.shape
    }

    pub fn context(&self) -> &RowContext {
        &self.context
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn next_row(&mut self, row: &[Cell]) -> RowKind {
        if self.closed {
            return RowKind::Ignore;
        }
        let kind = classify(row, &self.shape);
        match kind {
            RowKind::SectorHeader => {
                let label = header_label(row, &self.shape).map(str::to_string);
                // "Foreign Banks" and friends name the bank type too
                self.context.bank_type = label.clone().filter(|l| is_bank_type_label(l));
                self.context.sector = label;
                trace!(sector = ?self.context.sector, "sector header");
            }
            RowKind::BankTypeHeader => {
                self.context.bank_type = header_label(row, &self.shape).map(str::to_string);
                trace!(bank_type = ?self.context.bank_type, "bank-type header");
            }
            RowKind::Total => self.closed = true,
            RowKind::BankData | RowKind::Ignore => {}
        }
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::infra::{MIN_COLUMNS, NAME_COLUMN, SERIAL_COLUMN};

    fn shape(epoch: Epoch) -> RowShape {
        RowShape {
            serial_column: SERIAL_COLUMN,
            name_column: NAME_COLUMN,
            min_columns: MIN_COLUMNS,
            epoch,
        }
    }

    fn bank(serial: f64, name: &str) -> Vec<Cell> {
        vec![Cell::Number(serial), Cell::text(name), Cell::Number(10.0), Cell::Number(20.0)]
    }

    #[test]
    fn total_closes_the_sheet() {
        let mut c = Classifier::new(shape(Epoch::Current));
        assert_eq!(c.next_row(&bank(1.0, "State Bank of India")), RowKind::BankData);
        let total = vec![Cell::Number(1.0), Cell::text("Total"), Cell::Number(500.0), Cell::Number(1000.0)];
        assert_eq!(c.next_row(&total), RowKind::Total);
        assert!(c.is_closed());
        assert_eq!(c.next_row(&bank(2.0, "Bank of Baroda")), RowKind::Ignore);
        assert_eq!(c.next_row(&bank(3.0, "Canara Bank")), RowKind::Ignore);
    }

    #[test]
    fn grand_total_in_first_cell() {
        let row = vec![Cell::text("GRAND TOTAL"), Cell::Empty, Cell::Number(1.0)];
        assert_eq!(classify(&row, &shape(Epoch::Current)), RowKind::Total);
    }

    #[test]
    fn headers_carry_context() {
        let mut c = Classifier::new(shape(Epoch::Current));
        let sector = vec![Cell::text("Scheduled Commercial Banks"), Cell::Empty];
        let psb = vec![Cell::text("Public Sector Banks"), Cell::Empty];
        let pvt = vec![Cell::Empty, Cell::text("Private Sector Banks")];
        // sectors win over bank types for labels in both sets
        assert_eq!(c.next_row(&sector), RowKind::SectorHeader);
        assert_eq!(c.next_row(&psb), RowKind::SectorHeader);
        assert_eq!(c.context().bank_type.as_deref(), Some("Public Sector Banks"));

        assert_eq!(c.next_row(&sector), RowKind::SectorHeader);
        assert_eq!(c.context().bank_type, None);
        let nationalised = vec![Cell::text("Nationalised Banks"), Cell::Empty];
        assert_eq!(c.next_row(&nationalised), RowKind::BankTypeHeader);
        assert_eq!(c.context().sector.as_deref(), Some("Scheduled Commercial Banks"));
        assert_eq!(c.context().bank_type.as_deref(), Some("Nationalised Banks"));

        assert_eq!(c.next_row(&pvt), RowKind::SectorHeader);
        assert_eq!(c.context().sector.as_deref(), Some("Private Sector Banks"));
    }

    #[test]
    fn malformed_rows_are_ignored() {
        let s = shape(Epoch::Current);
        assert_eq!(classify(&[], &s), RowKind::Ignore);
        assert_eq!(classify(&[Cell::Number(1.0), Cell::text("Short Bank")], &s), RowKind::Ignore);
        assert_eq!(classify(&[Cell::Number(1.0), Cell::Number(2.0), Cell::Number(3.0)], &s), RowKind::Ignore);
        assert_eq!(
            classify(&[Cell::Number(1.0), Cell::text("Foreign Banks"), Cell::Number(3.0)], &s),
            RowKind::Ignore
        );
        assert_eq!(
            classify(&[Cell::text("Sr. No."), Cell::text("Name of the Bank"), Cell::text("ATMs")], &s),
            RowKind::Ignore
        );
    }

    #[test]
    fn shifted_rows_still_classify_in_oldest_epoch() {
        let row = vec![
            Cell::Number(4.0),
            Cell::Number(4001.0),
            Cell::text("Some Bank"),
            Cell::Number(1.0),
        ];
        assert_eq!(classify(&row, &shape(Epoch::Pre2020_05)), RowKind::BankData);
        assert_eq!(classify(&row, &shape(Epoch::Current)), RowKind::Ignore);
    }

    #[test]
    fn each_row_gets_exactly_one_kind() {
        let labels = ["Foreign Banks", "Payments Banks", "Small Finance Banks", "Development Banks"];
        let s = shape(Epoch::Current);
        for label in labels {
            let row = vec![Cell::text(label), Cell::Empty];
            let kind = classify(&row, &s);
            let header_kinds = [RowKind::SectorHeader, RowKind::BankTypeHeader];
            assert!(header_kinds.contains(&kind), "{label}");
            let expected = if is_sector_label(label) { RowKind::SectorHeader } else { RowKind::BankTypeHeader };
            assert_eq!(kind, expected, "{label}");
        }
    }
}
