//! Prompt templates rendered with handlebars

use handlebars::Handlebars;
use serde::Serialize;

const TEMPLATE_NAME: &str = "prompt";

/// A registered prompt template.
///
/// Supports scalar placeholders (`{{{text}}}`) and iteration over sequences
/// (`{{#each items}}- {{{this}}}{{/each}}`). Output is plain text, so nothing is escaped.
/// Strict mode is on: a placeholder naming a field the input does not have fails to render.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    source: String,
    engine: Handlebars<'static>,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Result<Self, String> {
        let source = source.into();
        let mut engine = Handlebars::new();
        engine.set_strict_mode(true);
        engine.register_escape_fn(handlebars::no_escape);
        engine
            .register_template_string(TEMPLATE_NAME, &source)
            .map_err(|e| e.to_string())?;
        Ok(Self { source, engine })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn render<T: Serialize>(&self, data: &T) -> Result<String, String> {
        self.engine
            .render(TEMPLATE_NAME, data)
            .map_err(|e| e.to_string())
    }
}
