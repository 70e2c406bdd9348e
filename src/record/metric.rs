// src/record/metric.rs

use serde::{Serialize, Serializer};

use crate::sheet::Coerced;

/// A finalized output leaf. Never null: missing cells become `Number(0)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Metric {
    Number(f64),
    Text(String),
}

impl Default for Metric {
    fn default() -> Self {
        Metric::Number(0.0)
    }
}

impl Metric {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Metric::Number(n) => Some(*n),
            Metric::Text(_) => None,
        }
    }
}

impl From<Coerced> for Metric {
    fn from(value: Coerced) -> Self {
        match value {
            Coerced::Numeric(n) => Metric::Number(n),
            Coerced::Text(s) => Metric::Text(s),
            Coerced::Missing => Metric::Number(0.0),
        }
    }
}

// integral values go out as JSON integers
impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Metric::Number(n) => serializer.serialize_f64(*n),
            Metric::Text(s) => serializer.serialize_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_becomes_zero() {
        assert_eq!(Metric::from(Coerced::Missing), Metric::Number(0.0));
        assert_eq!(Metric::default().as_f64(), Some(0.0));
    }

    #[test]
    fn serializes_integers_without_fraction() {
        assert_eq!(serde_json::to_string(&Metric::Number(12.0)).unwrap(), "12");
        assert_eq!(serde_json::to_string(&Metric::Number(12.25)).unwrap(), "12.25");
        assert_eq!(
            serde_json::to_string(&Metric::Text("NA".into())).unwrap(),
            "\"NA\""
        );
    }
}
