//! Flow definitions: a named template bound to input and output schemas

use std::fmt;
use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::backend::GenerationOptions;
use crate::error::FlowError;
use crate::schema::JsonSchema;
use crate::template::PromptTemplate;

/// An immutable flow, built once at startup.
///
/// `I` is the typed input the template is rendered from, `O` the typed output
/// the validated backend payload is deserialised into.
pub struct FlowDefinition<I, O> {
    name: String,
    input_schema: JsonSchema,
    output_schema: JsonSchema,
    template: PromptTemplate,
    options: GenerationOptions,
    _types: PhantomData<fn(&I) -> O>,
}

impl<I, O> FlowDefinition<I, O>
where
    I: Serialize,
    O: DeserializeOwned,
{
    /// Compile both schemas and register the template.
    pub fn new(
        name: impl Into<String>,
        input_schema: Value,
        output_schema: Value,
        template: &str,
    ) -> Result<Self, FlowError> {
        let name = name.into();

        let input_schema = JsonSchema::compile(input_schema).map_err(|message| FlowError::Schema {
            flow: name.clone(),
            message: format!("input schema: {}", message),
        })?;
        let output_schema = JsonSchema::compile(output_schema).map_err(|message| FlowError::Schema {
            flow: name.clone(),
            message: format!("output schema: {}", message),
        })?;
        let template = PromptTemplate::new(template).map_err(|message| FlowError::Template {
            flow: name.clone(),
            message,
        })?;

        Ok(Self {
            name,
            input_schema,
            output_schema,
            template,
            options: GenerationOptions::default(),
            _types: PhantomData,
        })
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

impl<I, O> FlowDefinition<I, O> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_schema(&self) -> &JsonSchema {
        &self.input_schema
    }

    pub fn output_schema(&self) -> &JsonSchema {
        &self.output_schema
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }
}

impl<I, O> fmt::Debug for FlowDefinition<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowDefinition")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish()
    }
}
