use chrono::NaiveDate;
use egui::Color32;
use egui_phosphor::regular as icons;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LayoutError;
use crate::layout::dates;

/// Kind of field work recorded in a work report.
///
/// Each variant carries its own display data and the task-name keywords used
/// to find the row a report belongs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    Seeding,
    Planting,
    Fertilizing,
    Watering,
    Weeding,
    Pruning,
    Harvesting,
    #[default]
    #[serde(other)]
    Other,
}

impl WorkType {
    pub const ALL: [WorkType; 8] = [
        WorkType::Seeding,
        WorkType::Planting,
        WorkType::Fertilizing,
        WorkType::Watering,
        WorkType::Weeding,
        WorkType::Pruning,
        WorkType::Harvesting,
        WorkType::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WorkType::Seeding => "Seeding",
            WorkType::Planting => "Planting",
            WorkType::Fertilizing => "Fertilizing",
            WorkType::Watering => "Watering",
            WorkType::Weeding => "Weeding",
            WorkType::Pruning => "Pruning",
            WorkType::Harvesting => "Harvesting",
            WorkType::Other => "Other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            WorkType::Seeding => icons::PLANT,
            WorkType::Planting => icons::POTTED_PLANT,
            WorkType::Fertilizing => icons::FLASK,
            WorkType::Watering => icons::DROP,
            WorkType::Weeding => icons::LEAF,
            WorkType::Pruning => icons::SCISSORS,
            WorkType::Harvesting => icons::BASKET,
            WorkType::Other => icons::DOTS_THREE,
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            WorkType::Seeding => Color32::from_rgb(139, 195, 74),
            WorkType::Planting => Color32::from_rgb(76, 175, 80),
            WorkType::Fertilizing => Color32::from_rgb(255, 152, 0),
            WorkType::Watering => Color32::from_rgb(33, 150, 243),
            WorkType::Weeding => Color32::from_rgb(121, 85, 72),
            WorkType::Pruning => Color32::from_rgb(156, 39, 176),
            WorkType::Harvesting => Color32::from_rgb(244, 67, 54),
            WorkType::Other => Color32::from_rgb(158, 158, 158),
        }
    }

    /// Substrings of a task name that mark it as the home row for this work.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            WorkType::Seeding => &["播種", "種まき", "種蒔き", "seed", "sow"],
            WorkType::Planting => &["定植", "植え付け", "植付", "plant", "transplant"],
            WorkType::Fertilizing => &["施肥", "追肥", "元肥", "fertiliz"],
            WorkType::Watering => &["水やり", "灌水", "潅水", "water", "irrigat"],
            WorkType::Weeding => &["除草", "草取り", "weed"],
            WorkType::Pruning => &["剪定", "整枝", "摘心", "芽かき", "prun"],
            WorkType::Harvesting => &["収穫", "harvest"],
            WorkType::Other => &[],
        }
    }

    /// True when `task_name` mentions one of this work type's keywords.
    pub fn matches_task_name(self, task_name: &str) -> bool {
        let lowered = task_name.to_lowercase();
        self.keywords().iter().any(|k| lowered.contains(k))
    }

    pub fn parse(s: &str) -> Self {
        let lowered = s.trim().to_lowercase();
        WorkType::ALL
            .into_iter()
            .find(|w| {
                w.label().to_lowercase() == lowered
                    || w.keywords().first().is_some_and(|k| *k == lowered)
            })
            .unwrap_or_else(|| {
                tracing::debug!(work_type = %s, "unknown work type, recorded as other");
                WorkType::Other
            })
    }
}

/// A dated record of work actually performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkReport {
    pub id: Uuid,
    pub work_date: String,
    #[serde(default)]
    pub work_type: WorkType,
    pub vegetable_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_notes: Option<String>,
    /// Harvested amount in kg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harvest_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_revenue: Option<f64>,
}

impl WorkReport {
    pub fn new(vegetable_id: Uuid, work_type: WorkType, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            work_date: date.format("%Y-%m-%d").to_string(),
            work_type,
            vegetable_id,
            work_notes: None,
            harvest_amount: None,
            expected_revenue: None,
        }
    }

    pub fn date(&self) -> Result<NaiveDate, LayoutError> {
        dates::resolve(&self.work_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_work_type_deserializes_as_other() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "work_date": "2025-01-01",
            "work_type": "spraying",
            "vegetable_id": "00000000-0000-0000-0000-0000000000aa"
        }"#;
        let report: WorkReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.work_type, WorkType::Other);
    }

    #[test]
    fn keyword_matching_covers_both_scripts() {
        assert!(WorkType::Harvesting.matches_task_name("トマト収穫"));
        assert!(WorkType::Harvesting.matches_task_name("Harvest tomatoes"));
        assert!(!WorkType::Harvesting.matches_task_name("定植"));
        assert!(!WorkType::Other.matches_task_name("anything"));
    }

    #[test]
    fn parse_accepts_labels_and_primary_keyword() {
        assert_eq!(WorkType::parse("Watering"), WorkType::Watering);
        assert_eq!(WorkType::parse("収穫"), WorkType::Harvesting);
        assert_eq!(WorkType::parse("播種"), WorkType::Seeding);
        assert_eq!(WorkType::parse("??"), WorkType::Other);
    }
}
