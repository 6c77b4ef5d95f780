//! Mod36 prompt flow core
//!
//! A flow is a prompt template bound to an input schema and an output schema.
//! [`FlowRunner`] validates the input, renders the template, makes exactly one
//! call to a [`GenerationBackend`] and returns the output only when it satisfies
//! the output schema.

pub mod backend;
pub mod error;
pub mod flow;
pub mod runner;
pub mod schema;
pub mod template;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export key types for convenient usage
pub use backend::{BackendRequest, BackendResponse, GenerationBackend, GenerationOptions};
pub use error::{BackendError, ErrorKind, FlowError};
pub use flow::FlowDefinition;
pub use runner::FlowRunner;
pub use schema::{JsonSchema, SchemaViolation};
pub use template::PromptTemplate;
