//! generateRealityInsight: a title, a systems insight and a speculative scenario
//! synthesised from two or more selected Realities

use std::ops::RangeInclusive;

use mod36_core::{FlowDefinition, FlowError};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const FLOW_NAME: &str = "generateRealityInsight";

/// Fewest Realities an insight can be generated from.
pub const MIN_SELECTED: usize = 2;

pub const SELECTION_MESSAGE: &str = "Please select at least two Realities.";

pub const BLANK_TITLE_MESSAGE: &str = "Reality titles must not be blank.";

/// Advisory length of `systemInsight`, in words. Requested in the prompt, never enforced.
pub const SYSTEM_INSIGHT_WORDS: RangeInclusive<usize> = 50..=100;

/// Advisory length of `speculativeScenario`, in words.
pub const SPECULATIVE_SCENARIO_WORDS: RangeInclusive<usize> = 100..=150;

const PROMPT: &str = r#"You are the modular intelligence engine for Mod36, a framework designed around 36 Realities shaping life on Earth. Your purpose is to generate systems-level insights and speculative design scenarios based on user-selected Realities.

The user has selected the following Realities:
{{#each selectedRealities}}
- {{{this}}}
{{/each}}

Based on these selected Realities, you must:
1. Generate a "System Insight": A brief paragraph (around 50-100 words) explaining the deep relationship and systemic dynamics between these chosen Realities. Focus on interconnections, feedback loops, and underlying patterns.
2. Generate a "Speculative Scenario / Future Design Idea": A micro-story, concept, or design provocation (around 100-150 words) that vividly illustrates how these Realities intersect. This scenario should be:
    - Culturally rich, drawing inspiration particularly from African or indigenous contexts where appropriate and respectful.
    - Future-oriented and imaginative.
    - Design-relevant, suggesting potential areas for innovation or intervention.
    - Reflective of Mod36's core values: modularity, systems thinking, cultural grounding, and imagination.
3. Generate a "Title": A concise, evocative title for the insight and scenario (e.g., "Faithful Infrastructures" or "The Media of Memory").

Adopt a tone that blends strategic design thinking with speculative storytelling. Ensure the total output is concise, ideally between 150-250 words for the insight and scenario combined.
Strictly adhere to the output schema provided.
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRealityInsightInput {
    /// Titles of the selected Realities, e.g. ["Housing", "Climate"]
    pub selected_realities: Vec<String>,
}

impl GenerateRealityInsightInput {
    pub fn new<S: Into<String>>(titles: impl IntoIterator<Item = S>) -> Self {
        Self {
            selected_realities: titles.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRealityInsightOutput {
    pub title: String,
    pub system_insight: String,
    pub speculative_scenario: String,
}

impl GenerateRealityInsightOutput {
    /// Word counts of (`system_insight`, `speculative_scenario`).
    pub fn word_counts(&self) -> (usize, usize) {
        (
            word_count(&self.system_insight),
            word_count(&self.speculative_scenario),
        )
    }

    /// Describe every field whose length misses its advisory range. Empty when all are in range.
    pub fn advisory_length_notes(&self) -> Vec<String> {
        let (insight, scenario) = self.word_counts();
        let mut notes = Vec::new();
        if !SYSTEM_INSIGHT_WORDS.contains(&insight) {
            notes.push(format!(
                "systemInsight has {} words, expected {}-{}",
                insight,
                SYSTEM_INSIGHT_WORDS.start(),
                SYSTEM_INSIGHT_WORDS.end()
            ));
        }
        if !SPECULATIVE_SCENARIO_WORDS.contains(&scenario) {
            notes.push(format!(
                "speculativeScenario has {} words, expected {}-{}",
                scenario,
                SPECULATIVE_SCENARIO_WORDS.start(),
                SPECULATIVE_SCENARIO_WORDS.end()
            ));
        }
        notes
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub type RealityInsightFlow = FlowDefinition<GenerateRealityInsightInput, GenerateRealityInsightOutput>;

pub fn definition() -> Result<RealityInsightFlow, FlowError> {
    FlowDefinition::new(
        FLOW_NAME,
        json!({
            "type": "object",
            "required": ["selectedRealities"],
            "properties": {
                "selectedRealities": {
                    "type": "array",
                    "description": "An array of 2 or more selected Reality titles (e.g., [\"Housing\", \"Climate\", \"Technology\"]).",
                    "items": {
                        "type": "string",
                        "pattern": "\\S",
                        "errorMessage": { "pattern": BLANK_TITLE_MESSAGE }
                    },
                    "minItems": MIN_SELECTED,
                    "errorMessage": { "minItems": SELECTION_MESSAGE }
                }
            }
        }),
        json!({
            "type": "object",
            "required": ["title", "systemInsight", "speculativeScenario"],
            "properties": {
                "title": {
                    "type": "string",
                    "minLength": 1,
                    "pattern": "\\S",
                    "description": "A concise, evocative title for the generated insight and scenario."
                },
                "systemInsight": {
                    "type": "string",
                    "minLength": 1,
                    "pattern": "\\S",
                    "description": "A brief paragraph (around 50-100 words) explaining the relationship between the chosen Realities and the systemic dynamics at play."
                },
                "speculativeScenario": {
                    "type": "string",
                    "minLength": 1,
                    "pattern": "\\S",
                    "description": "A micro-story, concept, or design provocation (around 100-150 words) showing the selected Realities in action in a culturally rich, future-oriented, design-relevant way."
                }
            }
        }),
        PROMPT,
    )
}
