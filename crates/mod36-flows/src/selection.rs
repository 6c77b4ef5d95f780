//! Selection state kept by the insight generator while the user picks Realities

use mod36_core::FlowError;

use crate::reality_insight::{self, GenerateRealityInsightInput, MIN_SELECTED, SELECTION_MESSAGE};

/// Titles the user has checked, in the order they were checked.
///
/// Scoped to one view/session; nothing here is global.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RealitySelection {
    titles: Vec<String>,
}

impl RealitySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check or uncheck a title. Checking an already selected title is a no-op.
    pub fn toggle(&mut self, title: &str, checked: bool) {
        if checked {
            if !self.is_selected(title) {
                self.titles.push(title.to_string());
            }
        } else {
            self.titles.retain(|t| t != title);
        }
    }

    pub fn is_selected(&self, title: &str) -> bool {
        self.titles.iter().any(|t| t == title)
    }

    /// Reset, as when the modal closes.
    pub fn clear(&mut self) {
        self.titles.clear();
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn can_generate(&self) -> bool {
        self.titles.len() >= MIN_SELECTED
    }

    /// Build the flow input, refusing with the same message the input schema uses.
    pub fn to_input(&self) -> Result<GenerateRealityInsightInput, FlowError> {
        if !self.can_generate() {
            return Err(FlowError::invalid_input(
                reality_insight::FLOW_NAME,
                SELECTION_MESSAGE,
                Vec::new(),
            ));
        }
        Ok(GenerateRealityInsightInput {
            selected_realities: self.titles.clone(),
        })
    }
}
