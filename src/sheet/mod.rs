pub mod cell;
pub mod workbook;

pub use cell::{cell_at, coerce, Cell, Coerced, Row};
pub use workbook::{load_workbook, SheetRows};
