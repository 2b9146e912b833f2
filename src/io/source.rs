use std::path::PathBuf;

use crate::error::DataError;
use crate::model::FarmData;

/// Where farm data is loaded from and saved to.
///
/// The app is handed one at start-up instead of reaching for a global client.
pub trait FarmDataSource {
    fn load(&self) -> Result<FarmData, DataError>;
    fn save(&self, data: &FarmData) -> Result<(), DataError>;
    /// Human-readable location for the status bar.
    fn describe(&self) -> String;
}

/// A farm stored as one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FarmDataSource for JsonFileSource {
    fn load(&self) -> Result<FarmData, DataError> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| DataError::io(&self.path, e))?;
        let mut data: FarmData = serde_json::from_str(&json)?;
        data.register_task_vegetables();
        tracing::info!(
            path = %self.path.display(),
            vegetables = data.vegetables.len(),
            tasks = data.tasks.len(),
            reports = data.work_reports.len(),
            "farm data loaded"
        );
        Ok(data)
    }

    fn save(&self, data: &FarmData) -> Result<(), DataError> {
        let json = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, json).map_err(|e| DataError::io(&self.path, e))?;
        tracing::info!(path = %self.path.display(), "farm data saved");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
