use chrono::NaiveDate;
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LayoutError;
use crate::layout::dates;

/// Lifecycle state of a planned task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(alias = "in-progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::High, TaskPriority::Medium, TaskPriority::Low];

    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "低" => Some(TaskPriority::Low),
            "medium" | "med" | "normal" | "中" => Some(TaskPriority::Medium),
            "high" | "高" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

/// The person a task is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: Uuid,
    pub name: String,
}

/// The vegetable a task belongs to, embedded in the task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VegetableRef {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub variety: String,
}

impl VegetableRef {
    /// Same label as [`Vegetable::display_name`](super::Vegetable::display_name).
    pub fn display_name(&self) -> String {
        super::vegetable::display_name(&self.name, &self.variety)
    }
}

/// A planned unit of work on one vegetable.
///
/// Dates are kept exactly as received so a single malformed record only drops
/// its own row from the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub start: String,
    pub end: String,
    /// Percentage, 0 to 100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    pub vegetable: VegetableRef,
    #[serde(default, rename = "assignedUser", skip_serializing_if = "Option::is_none")]
    pub assigned_user: Option<Assignee>,
    #[serde(default, with = "hex_color_opt", skip_serializing_if = "Option::is_none")]
    pub color: Option<Color32>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        vegetable: VegetableRef,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start: start.format("%Y-%m-%d").to_string(),
            end: end.format("%Y-%m-%d").to_string(),
            progress: 0,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            vegetable,
            assigned_user: None,
            color: None,
        }
    }

    pub fn start_date(&self) -> Result<NaiveDate, LayoutError> {
        dates::resolve(&self.start)
    }

    pub fn end_date(&self) -> Result<NaiveDate, LayoutError> {
        dates::resolve(&self.end)
    }

    /// Progress clamped into 0..=100.
    pub fn progress_percent(&self) -> u8 {
        self.progress.min(100)
    }
}

/// Serde helper for an optional `#RRGGBB` colour string.
mod hex_color_opt {
    use egui::Color32;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(color: &Option<Color32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match color {
            Some(c) => serializer.serialize_str(&format!("#{:02X}{:02X}{:02X}", c.r(), c.g(), c.b())),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Color32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        // An unreadable colour falls back to the default palette instead of
        // rejecting the whole task.
        Ok(raw.as_deref().and_then(parse_hex))
    }

    pub fn parse_hex(s: &str) -> Option<Color32> {
        let s = s.trim().trim_start_matches('#');
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Color32::from_rgb(r, g, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vegetable_ref_label_matches_vegetable() {
        let tomato = crate::model::Vegetable::new("トマト", "桃太郎");
        assert_eq!(tomato.to_ref().display_name(), "トマト (桃太郎)");
        assert_eq!(tomato.to_ref().display_name(), tomato.display_name());

        let eggplant = crate::model::Vegetable::new("なす", "");
        assert_eq!(eggplant.to_ref().display_name(), "なす");
    }

    #[test]
    fn deserializes_external_shape() {
        let json = r##"{
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "トマト収穫",
            "start": "2025-01-03",
            "end": "2025-01-05",
            "progress": 40,
            "status": "in-progress",
            "priority": "high",
            "vegetable": {"id": "00000000-0000-0000-0000-0000000000aa", "name": "トマト", "variety": "桃太郎"},
            "assignedUser": {"id": "00000000-0000-0000-0000-0000000000bb", "name": "Sato"},
            "color": "#FF8800"
        }"##;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.assigned_user.as_ref().map(|a| a.name.as_str()), Some("Sato"));
        assert_eq!(task.color, Some(Color32::from_rgb(0xFF, 0x88, 0x00)));
        assert_eq!(
            task.start_date(),
            Ok(NaiveDate::from_ymd_opt(2025, 1, 3).unwrap())
        );
    }

    #[test]
    fn bad_colour_is_ignored() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "x", "start": "2025-01-03", "end": "2025-01-05",
            "vegetable": {"id": "00000000-0000-0000-0000-0000000000aa", "name": "なす"},
            "color": "not-a-colour"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.color, None);
        assert_eq!(task.priority, TaskPriority::Medium);
    }

    #[test]
    fn malformed_date_surfaces_as_layout_error() {
        let veg = VegetableRef {
            id: Uuid::nil(),
            name: "なす".into(),
            variety: String::new(),
        };
        let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut task = Task::new("x", veg, d, d);
        task.end = "soon".into();
        assert_eq!(task.end_date(), Err(LayoutError::InvalidDate("soon".into())));
    }
}
