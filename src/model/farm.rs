use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::Task;
use super::vegetable::Vegetable;
use super::work_report::WorkReport;

/// One snapshot of a farm's vegetables, planned tasks and work reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmData {
    pub name: String,
    #[serde(default)]
    pub vegetables: Vec<Vegetable>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub work_reports: Vec<WorkReport>,
    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,
}

impl Default for FarmData {
    fn default() -> Self {
        Self {
            name: "Untitled Farm".to_string(),
            vegetables: Vec::new(),
            tasks: Vec::new(),
            work_reports: Vec::new(),
            modified: Utc::now(),
        }
    }
}

impl FarmData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn vegetable(&self, id: Uuid) -> Option<&Vegetable> {
        self.vegetables.iter().find(|v| v.id == id)
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Vegetables referenced by tasks but missing from the vegetable list are
    /// added from the tasks' embedded copies, so filters can offer them.
    pub fn register_task_vegetables(&mut self) {
        for task in &self.tasks {
            if !self.vegetables.iter().any(|v| v.id == task.vegetable.id) {
                self.vegetables.push(Vegetable {
                    id: task.vegetable.id,
                    name: task.vegetable.name.clone(),
                    variety: task.vegetable.variety.clone(),
                    plot_name: None,
                    notes: None,
                });
            }
        }
    }
}
