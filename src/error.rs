use thiserror::Error;
use uuid::Uuid;

/// Reasons a task or work report is left out of a layout pass.
///
/// None of these abort the pass; the offending row or marker is omitted and
/// the reason is kept in `ChartGeometry::skipped`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("work report {report_id} has no task row for vegetable {vegetable_id}")]
    UnresolvedReportPlacement { report_id: Uuid, vegetable_id: Uuid },
}

/// Errors raised while loading, saving, importing or exporting farm data.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("io error on {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid farm data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns (found: {found:?}, need: {need})")]
    MissingColumns { found: Vec<String>, need: &'static str },

    #[error("no valid rows found ({skipped} rows skipped)")]
    Empty { skipped: usize },
}

impl DataError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
