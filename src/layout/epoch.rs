// src/layout/epoch.rs

use serde::Serialize;
use std::fmt;

use super::period::Period;
use crate::sheet::{cell_at, Cell};

/// A span of months during which a source file kept one column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Epoch {
    #[serde(rename = "PRE_2020_05")]
    Pre2020_05,
    #[serde(rename = "PRE_2022_03")]
    Pre2022_03,
    #[serde(rename = "CURRENT")]
    Current,
}

/// Exclusive upper bounds, oldest first. Anything after the last bound is `Current`.
pub static EPOCH_BOUNDARIES: &[(Epoch, Period)] = &[
    (Epoch::Pre2020_05, Period { year: 2020, month: 5 }),
    (Epoch::Pre2022_03, Period { year: 2022, month: 3 }),
];

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Epoch::Pre2020_05 => "PRE_2020_05",
            Epoch::Pre2022_03 => "PRE_2022_03",
            Epoch::Current => "CURRENT",
        })
    }
}

/// Lexicographic `(year, month)` comparison against the declared boundaries.
pub fn select_epoch(year: i32, month: u32) -> Epoch {
    let period = (year, month);
    EPOCH_BOUNDARIES
        .iter()
        .find(|(_, bound)| period < (bound.year, bound.month))
        .map(|(epoch, _)| *epoch)
        .unwrap_or(Epoch::Current)
}

impl Period {
    pub fn epoch(&self) -> Epoch {
        select_epoch(self.year, self.month)
    }
}

/// Older files sometimes carry a numeric code in the bank-name column with
/// the name one cell to the right; every read for such a row moves right by one.
pub fn column_shift(row: &[Cell], epoch: Epoch, name_column: usize) -> usize {
    if epoch != Epoch::Pre2020_05 {
        return 0;
    }
    let here = cell_at(row, name_column);
    let next = cell_at(row, name_column + 1);
    if here.is_numeric() && next.trimmed().is_some() && !next.is_numeric() {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_exclusive() {
        assert_eq!(select_epoch(2019, 12), Epoch::Pre2020_05);
        assert_eq!(select_epoch(2020, 4), Epoch::Pre2020_05);
        assert_eq!(select_epoch(2020, 5), Epoch::Pre2022_03);
        assert_eq!(select_epoch(2022, 2), Epoch::Pre2022_03);
        assert_eq!(select_epoch(2022, 3), Epoch::Current);
        assert_eq!(select_epoch(2031, 1), Epoch::Current);
    }

    #[test]
    fn period_delegates_to_selector() {
        assert_eq!(Period { year: 2019, month: 12 }.epoch(), Epoch::Pre2020_05);
        assert_ne!(Period { year: 2020, month: 5 }.epoch(), Epoch::Pre2020_05);
    }

    #[test]
    fn shift_applies_only_to_oldest_epoch() {
        let row = vec![
            Cell::Number(1.0),
            Cell::Number(4001.0),
            Cell::text("Some Bank"),
            Cell::Number(10.0),
        ];
        assert_eq!(column_shift(&row, Epoch::Pre2020_05, 1), 1);
        assert_eq!(column_shift(&row, Epoch::Current, 1), 0);

        let normal = vec![Cell::Number(1.0), Cell::text("Some Bank"), Cell::Number(10.0)];
        assert_eq!(column_shift(&normal, Epoch::Pre2020_05, 1), 0);
    }
}
