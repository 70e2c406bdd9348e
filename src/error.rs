use thiserror::Error;

/// File-level failures. Anything row-level is recovered in place and only logged.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no data boundary in `{file}`: expected a sector/bank-type header row or a numeric serial number in the first column")]
    Structural { file: String },

    #[error("no header rows above the data boundary in sheet `{sheet}` of `{file}`")]
    MissingHeader { file: String, sheet: String },

    #[error("cannot determine reporting period from `{0}`")]
    UnknownPeriod(String),

    #[error("invalid reporting period {year}-{month}: month must be between 1 and 12")]
    InvalidPeriod { year: i32, month: u32 },

    #[error("workbook `{file}` has no usable sheets")]
    NoSheets { file: String },

    #[error("failed to read workbook `{file}`: {source}")]
    Workbook {
        file: String,
        #[source]
        source: calamine::Error,
    },

    #[error("invalid bank reference table: {0}")]
    ReferenceTable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
