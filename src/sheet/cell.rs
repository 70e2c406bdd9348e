// src/sheet/cell.rs

/// One spreadsheet cell after leaving the workbook reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

pub type Row = Vec<Cell>;

static EMPTY: Cell = Cell::Empty;

/// Cell at `idx`, or `Cell::Empty` when the row is shorter.
pub fn cell_at(row: &[Cell], idx: usize) -> &Cell {
    row.get(idx).unwrap_or(&EMPTY)
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Trimmed text content; `None` for non-text or whitespace-only cells.
    pub fn trimmed(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => {
                let t = s.trim();
                (!t.is_empty()).then_some(t)
            }
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(coerce(self), Coerced::Numeric(_))
    }

    /// Header-style rendering: trimmed text, integral numbers without a fraction.
    pub fn label(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Result of the explicit numeric coercion applied to every mapped cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Numeric(f64),
    Text(String),
    Missing,
}

/// Numbers stay numbers, numeric-looking strings (thousands separators allowed)
/// become numbers, blank cells are `Missing`, everything else is kept as text.
pub fn coerce(cell: &Cell) -> Coerced {
    match cell {
        Cell::Empty => Coerced::Missing,
        Cell::Number(n) if n.is_finite() => Coerced::Numeric(*n),
        Cell::Number(_) => Coerced::Missing,
        Cell::Bool(b) => Coerced::Text(b.to_string()),
        Cell::Text(s) => {
            let t = s.trim();
            if t.is_empty() {
                return Coerced::Missing;
            }
            match parse_number(t) {
                Some(n) => Coerced::Numeric(n),
                None => Coerced::Text(t.to_string()),
            }
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    // f64::from_str accepts "inf"/"nan"; only plain numerals count here
    if !cleaned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}
