//! poeticizeText: rewrite a passage in a poetic register

use mod36_core::{FlowDefinition, FlowError};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const FLOW_NAME: &str = "poeticizeText";

pub const EMPTY_TEXT_MESSAGE: &str = "Please provide some text to poeticize.";

const PROMPT: &str = "Rewrite the following text in a poetic and artistic style, using evocative language and imagery. \
Maintain the original text's core meaning and intent, but feel free to reorder words and phrases to enhance the poetic effect. \
Consider different poetic devices, such as metaphor, simile, alliteration, and assonance, to enrich the text. \
The goal is to transform the text into a more artistic and engaging piece.

Original Text: {{{text}}}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoeticizeTextInput {
    /// The text to rewrite in a poetic style
    pub text: String,
}

impl PoeticizeTextInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoeticizeTextOutput {
    /// The text rewritten in a poetic style
    pub poetic_text: String,
}

pub type PoeticizeTextFlow = FlowDefinition<PoeticizeTextInput, PoeticizeTextOutput>;

pub fn definition() -> Result<PoeticizeTextFlow, FlowError> {
    FlowDefinition::new(
        FLOW_NAME,
        json!({
            "type": "object",
            "required": ["text"],
            "properties": {
                "text": {
                    "type": "string",
                    "description": "The text to rewrite in a poetic style.",
                    "pattern": "\\S",
                    "errorMessage": { "pattern": EMPTY_TEXT_MESSAGE }
                }
            }
        }),
        // An empty or blank rewrite is treated as a failed generation, not a success
        json!({
            "type": "object",
            "required": ["poeticText"],
            "properties": {
                "poeticText": {
                    "type": "string",
                    "description": "The text rewritten in a poetic style.",
                    "minLength": 1,
                    "pattern": "\\S"
                }
            }
        }),
        PROMPT,
    )
}
