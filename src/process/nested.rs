// src/process/nested.rs
//
// Header-driven field mapping: each metric column's flattened header path
// becomes a key path into an ordered `Node` tree.

use tracing::trace;

use super::header::ColumnPath;
use super::mapper::Mapped;
use super::utils::canonical_key;
use crate::record::{Metric, Node};
use crate::sheet::{cell_at, coerce, Cell, Coerced};

const INFRASTRUCTURE: &str = "Infrastructure";

/// "Number - Outstanding" style grouping rows above the infrastructure metrics.
fn is_measure_group(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.starts_with("number") || key.starts_with("no_")
}

fn is_atm_metric(key: &str) -> bool {
    key.to_ascii_lowercase().starts_with("atm")
}

fn is_site(key: &str) -> bool {
    key == "OnSite" || key == "OffSite"
}

/// Output key path for one column.
///
/// Under `Infrastructure` only ATM/CRM counts keep an on-site/off-site
/// level; every other metric is a direct leaf of the section whatever
/// the header depth. Other sections keep the full path.
pub fn output_path(path: &ColumnPath) -> Vec<String> {
    let keys: Vec<String> = path
        .iter()
        .map(|segment| canonical_key(segment))
        .filter(|key| !key.is_empty())
        .collect();

    let Some((section, rest)) = keys.split_first() else {
        return keys;
    };
    if section != INFRASTRUCTURE {
        return keys;
    }

    let rest = match rest {
        [group, tail @ ..] if !tail.is_empty() && is_measure_group(group) => tail,
        _ => rest,
    };
    let mut out = vec![section.clone()];
    match rest {
        [] => {}
        [metric, tail @ ..] if is_atm_metric(metric) => {
            out.push(metric.clone());
            if let Some(site) = tail.first().filter(|t| is_site(t)) {
                out.push(site.clone());
            }
        }
        [metric, ..] => out.push(metric.clone()),
    }
    out
}

/// Column → key path table for one sheet, built once from its header block.
#[derive(Debug, Clone)]
pub struct NestedLayout {
    columns: Vec<(usize, Vec<String>)>,
}

impl NestedLayout {
    /// Columns before `first_metric_column` hold identity fields and are
    /// never mapped. Columns with an empty path are ignored. `root`, when
    /// given, prefixes every key path.
    pub fn new(column_paths: &[ColumnPath], first_metric_column: usize, root: Option<&str>) -> Self {
        let columns = column_paths
            .iter()
            .enumerate()
            .skip(first_metric_column)
            .filter_map(|(col, path)| {
                let mut keys = output_path(path);
                if keys.is_empty() {
                    return None;
                }
                if let Some(root) = root {
                    keys.insert(0, root.to_string());
                }
                trace!(col, keys = ?keys, "metric column");
                Some((col, keys))
            })
            .collect();
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Walk every mapped column of `row` into a fresh tree. Blank cells
    /// zero-fill; header-path collisions are kept via promotion.
    pub fn map_metrics(&self, row: &[Cell], shift: usize) -> Mapped<Node> {
        let mut metrics = Node::branch();
        let mut zero_filled = 0;
        for (col, keys) in &self.columns {
            let value = coerce(cell_at(row, col + shift));
            if value == Coerced::Missing {
                zero_filled += 1;
            }
            metrics.insert(keys, Metric::from(value));
        }
        Mapped {
            metrics,
            zero_filled,
        }
    }
}
