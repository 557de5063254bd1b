use thiserror::Error;

/// Fatal input problems. No partial pipeline run follows any of these.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported input format '{extension}' for {path}; expected csv, tsv, txt, xlsx, xlsm, xls, xlsb, or ods")]
    UnsupportedFormat { path: String, extension: String },

    #[error("input has no header row")]
    EmptyFile,

    #[error("delimited text parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("no recognizable columns in input (headers: {})", .headers.join(", "))]
    NoRecognizedColumns { headers: Vec<String> },

    #[error("input has no column for required field '{field}'")]
    MissingColumn { field: &'static str },
}

impl IngestError {
    /// Pipeline stage that failed, for user-facing messages.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            IngestError::Io { .. }
            | IngestError::UnsupportedFormat { .. }
            | IngestError::EmptyFile
            | IngestError::Csv(_)
            | IngestError::Spreadsheet(_) => "read",
            IngestError::NoRecognizedColumns { .. } | IngestError::MissingColumn { .. } => {
                "normalize"
            }
        }
    }
}
