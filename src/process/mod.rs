// src/process/mod.rs
//
// Workbook → canonical document. One call handles one source file; all
// state lives on the stack of that call.

pub mod assemble;
pub mod classify;
pub mod header;
pub mod mapper;
pub mod nested;
pub mod sentinel;
pub mod utils;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument, warn};

use crate::error::{PipelineError, Result};
use crate::identity::ReferenceTable;
use crate::layout::infra::{MIN_COLUMNS, NAME_COLUMN, SERIAL_COLUMN};
use crate::layout::{Epoch, Period};
use crate::record::{Document, InfraDocument, Section, SectionedDocument};
use crate::sheet::{cell_at, load_workbook, Row, SheetRows};

use assemble::{assemble, AssemblyStats};
use classify::{classify, Classifier, RowKind, RowShape};
use header::flatten;
use mapper::map_infra_metrics;
use nested::NestedLayout;

/// Which publication a workbook belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    /// Bank-wise ATM, acceptance infrastructure and card statistics.
    AtmPosCard,
    /// Bank-wise NEFT, RTGS, mobile and internet banking statistics.
    FundsTransfer,
}

impl FeedKind {
    pub fn slug(&self) -> &'static str {
        match self {
            FeedKind::AtmPosCard => "atm_pos_card",
            FeedKind::FundsTransfer => "funds_transfer",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Funds-transfer sections in output order: (sheet-name needle, section key).
pub const FUNDS_TRANSFER_SECTIONS: &[(&str, &str)] = &[
    ("neft", "NEFT"),
    ("rtgs", "RTGS"),
    ("mobile", "Mobile_Banking"),
    ("internet", "Internet_Banking"),
];

/// Key every funds-transfer record's metrics hang under.
pub const DIGITAL_METRICS_ROOT: &str = "DigitalBankingMetrics";

/// Deepest header block read above the data boundary.
pub const MAX_HEADER_DEPTH: usize = 4;

pub fn section_for_sheet(sheet_name: &str) -> Option<&'static str> {
    let name = sheet_name.to_lowercase();
    FUNDS_TRANSFER_SECTIONS
        .iter()
        .find(|(needle, _)| name.contains(needle))
        .map(|(_, key)| *key)
}

pub fn row_shape(epoch: Epoch) -> RowShape {
    RowShape {
        serial_column: SERIAL_COLUMN,
        name_column: NAME_COLUMN,
        min_columns: MIN_COLUMNS,
        epoch,
    }
}

/// First row that is a sector/bank-type header or starts with a number.
pub fn find_data_start(rows: &[Row], shape: &RowShape) -> Option<usize> {
    rows.iter().position(|row| {
        matches!(
            classify(row, shape),
            RowKind::SectorHeader | RowKind::BankTypeHeader
        ) || cell_at(row, shape.serial_column).is_numeric()
    })
}

/// Header rows directly above `data_start`: contiguous rows with a label
/// somewhere right of the name column, at most `MAX_HEADER_DEPTH` of them.
pub fn header_block<'a>(rows: &'a [Row], data_start: usize, shape: &RowShape) -> &'a [Row] {
    let mut top = data_start;
    while top > 0 && data_start - top < MAX_HEADER_DEPTH {
        let candidate = &rows[top - 1];
        let labelled = candidate
            .iter()
            .skip(shape.name_column + 1)
            .any(|cell| !cell.is_blank());
        if !labelled {
            break;
        }
        top -= 1;
    }
    &rows[top..data_start]
}

/// One processed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedWorkbook {
    pub feed: FeedKind,
    pub period: Period,
    pub epoch: Epoch,
    pub document: Document,
    pub stats: AssemblyStats,
}

/// Decode workbook bytes and normalize them into the feed's document.
#[instrument(level = "info", skip(bytes, table), fields(file = %file_name, feed = %feed, period = %period))]
pub fn process_workbook(
    bytes: Vec<u8>,
    file_name: &str,
    feed: FeedKind,
    period: Period,
    table: &ReferenceTable,
) -> Result<ProcessedWorkbook> {
    let sheets = load_workbook(bytes, file_name)?;
    process_sheets(&sheets, file_name, feed, period, table)
}

/// Same as [`process_workbook`] for sheets already in memory.
pub fn process_sheets(
    sheets: &[SheetRows],
    file_name: &str,
    feed: FeedKind,
    period: Period,
    table: &ReferenceTable,
) -> Result<ProcessedWorkbook> {
    // 1) one epoch for the whole file
    let epoch = period.epoch();
    let shape = row_shape(epoch);
    debug!(%epoch, sheets = sheets.len(), "selected layout epoch");

    // 2) feed-specific assembly
    let (document, stats) = match feed {
        FeedKind::AtmPosCard => infra_document(sheets, file_name, &shape, table)?,
        FeedKind::FundsTransfer => sectioned_document(sheets, file_name, &shape, table)?,
    };

    info!(
        banks = stats.banks,
        total = stats.total_seen,
        skipped = stats.skipped_rows,
        unresolved = stats.unresolved_names,
        zero_filled = stats.zero_filled,
        "workbook processed"
    );
    Ok(ProcessedWorkbook {
        feed,
        period,
        epoch,
        document,
        stats,
    })
}

fn infra_document(
    sheets: &[SheetRows],
    file_name: &str,
    shape: &RowShape,
    table: &ReferenceTable,
) -> Result<(Document, AssemblyStats)> {
    // the data sheet is the first one with a recognisable boundary
    let (sheet, start) = sheets
        .iter()
        .find_map(|s| find_data_start(&s.rows, shape).map(|start| (s, start)))
        .ok_or_else(|| PipelineError::Structural {
            file: file_name.to_string(),
        })?;
    debug!(sheet = %sheet.name, data_start = start, "infrastructure sheet");

    let epoch = shape.epoch;
    let assembled = assemble(&sheet.rows[start..], Classifier::new(*shape), table, |row, shift| {
        map_infra_metrics(row, epoch, shift)
    });
    let doc = InfraDocument {
        banks: assembled.banks,
        total: assembled.total,
    };
    Ok((Document::Infra(doc), assembled.stats))
}

fn sectioned_document(
    sheets: &[SheetRows],
    file_name: &str,
    shape: &RowShape,
    table: &ReferenceTable,
) -> Result<(Document, AssemblyStats)> {
    let mut sections: Vec<Section> = Vec::new();
    let mut stats = AssemblyStats::default();

    for sheet in sheets {
        let Some(key) = section_for_sheet(&sheet.name) else {
            warn!(sheet = %sheet.name, "sheet matches no section, skipping");
            continue;
        };

        // 1) boundary and header block
        let start = find_data_start(&sheet.rows, shape).ok_or_else(|| PipelineError::Structural {
            file: format!("{file_name} [{}]", sheet.name),
        })?;
        let header = header_block(&sheet.rows, start, shape);
        if header.is_empty() {
            return Err(PipelineError::MissingHeader {
                file: file_name.to_string(),
                sheet: sheet.name.clone(),
            });
        }

        // 2) column paths → key paths
        let width = sheet.rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let layout = NestedLayout::new(
            &flatten(header, width),
            shape.name_column + 1,
            Some(DIGITAL_METRICS_ROOT),
        );
        debug!(sheet = %sheet.name, section = key, header_rows = header.len(), columns = layout.len(), "section layout");

        // 3) rows
        let assembled = assemble(&sheet.rows[start..], Classifier::new(*shape), table, |row, shift| {
            layout.map_metrics(row, shift)
        });
        stats.merge(&assembled.stats);

        match sections.iter_mut().find(|s| s.name == key) {
            Some(existing) => {
                // continuation sheets append to the section already seen
                existing.banks.extend(assembled.banks);
                if existing.total.is_none() {
                    existing.total = assembled.total;
                }
            }
            None => sections.push(Section {
                name: key.to_string(),
                banks: assembled.banks,
                total: assembled.total,
            }),
        }
    }

    if sections.is_empty() {
        return Err(PipelineError::NoSheets {
            file: file_name.to_string(),
        });
    }
    sections.sort_by_key(|s| {
        FUNDS_TRANSFER_SECTIONS
            .iter()
            .position(|(_, key)| *key == s.name)
            .unwrap_or(usize::MAX)
    });
    Ok((Document::Sections(SectionedDocument { sections }), stats))
}
