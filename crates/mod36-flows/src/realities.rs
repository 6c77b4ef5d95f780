//! The 36 Realities, bundled with the crate

use mod36_core::FlowError;
use serde::{Deserialize, Serialize};

const REALITIES_JSON: &str = include_str!("../data/realities.json");

/// One topic card a user can select for an insight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reality {
    pub id: String,
    pub title: String,
    pub one_liner: String,
    pub icon_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RealityCatalog {
    realities: Vec<Reality>,
}

impl RealityCatalog {
    /// Parse the bundled catalog.
    pub fn load() -> Result<Self, FlowError> {
        Self::from_json(REALITIES_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, FlowError> {
        let realities: Vec<Reality> = serde_json::from_str(json)
            .map_err(|e| FlowError::Data(format!("realities catalog: {}", e)))?;
        Ok(Self { realities })
    }

    pub fn all(&self) -> &[Reality] {
        &self.realities
    }

    pub fn len(&self) -> usize {
        self.realities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.realities.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Reality> {
        self.realities.iter().find(|r| r.id == id)
    }

    pub fn find_by_title(&self, title: &str) -> Option<&Reality> {
        self.realities.iter().find(|r| r.title == title)
    }

    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Reality> + 'a {
        self.realities
            .iter()
            .filter(move |r| r.tags.iter().any(|t| t == tag))
    }
}
