use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::VegetableRef;

/// A crop tracked on the farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vegetable {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub variety: String,
    /// Plot or bed the crop is grown in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Vegetable {
    pub fn new(name: impl Into<String>, variety: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            variety: variety.into(),
            plot_name: None,
            notes: None,
        }
    }

    /// The embedded form tasks carry.
    pub fn to_ref(&self) -> VegetableRef {
        VegetableRef {
            id: self.id,
            name: self.name.clone(),
            variety: self.variety.clone(),
        }
    }

    /// "name (variety)", or just the name when no variety is recorded.
    pub fn display_name(&self) -> String {
        display_name(&self.name, &self.variety)
    }
}

pub(crate) fn display_name(name: &str, variety: &str) -> String {
    if variety.is_empty() {
        name.to_string()
    } else {
        format!("{name} ({variety})")
    }
}
