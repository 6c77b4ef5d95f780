//! Mod36 flow definitions
//!
//! Two flows run through [`mod36_core::FlowRunner`]:
//! - `poeticizeText`: free-form text to a poetic rewrite
//! - `generateRealityInsight`: two or more Reality titles to a title, a systems insight and a scenario

use std::sync::Arc;

use mod36_core::{FlowError, FlowRunner, GenerationBackend};
use tracing::{info, instrument, warn};

pub mod poeticize;
pub mod realities;
pub mod reality_insight;
pub mod selection;

pub use poeticize::{PoeticizeTextFlow, PoeticizeTextInput, PoeticizeTextOutput};
pub use realities::{Reality, RealityCatalog};
pub use reality_insight::{
    GenerateRealityInsightInput, GenerateRealityInsightOutput, RealityInsightFlow,
};
pub use selection::RealitySelection;

/// Every flow definition, compiled once at startup.
#[derive(Debug)]
pub struct FlowCatalog {
    pub poeticize_text: PoeticizeTextFlow,
    pub reality_insight: RealityInsightFlow,
}

impl FlowCatalog {
    pub fn new() -> Result<Self, FlowError> {
        Ok(Self {
            poeticize_text: poeticize::definition()?,
            reality_insight: reality_insight::definition()?,
        })
    }
}

/// Typed entry points for both flows over one backend.
#[derive(Debug, Clone)]
pub struct Mod36Flows {
    runner: FlowRunner,
    catalog: Arc<FlowCatalog>,
}

impl Mod36Flows {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Result<Self, FlowError> {
        Ok(Self {
            runner: FlowRunner::new(backend),
            catalog: Arc::new(FlowCatalog::new()?),
        })
    }

    pub fn catalog(&self) -> &FlowCatalog {
        &self.catalog
    }

    /// Rewrite `input.text` in a poetic register.
    #[instrument(skip_all)]
    pub async fn poeticize_text(
        &self,
        input: &PoeticizeTextInput,
    ) -> Result<PoeticizeTextOutput, FlowError> {
        let output = self.runner.run(&self.catalog.poeticize_text, input).await?;
        info!(chars = output.poetic_text.chars().count(), "Poetic rewrite generated");
        Ok(output)
    }

    /// Generate an insight from the selected Realities.
    ///
    /// Fewer than two selections fail with `InvalidInput` before the backend is called.
    /// Word counts outside the advisory ranges are logged, not rejected.
    #[instrument(skip_all, fields(selected = input.selected_realities.len()))]
    pub async fn generate_reality_insight(
        &self,
        input: &GenerateRealityInsightInput,
    ) -> Result<GenerateRealityInsightOutput, FlowError> {
        let output = self.runner.run(&self.catalog.reality_insight, input).await?;
        for note in output.advisory_length_notes() {
            warn!(%note, "Reality insight outside advisory length");
        }
        info!(title = %output.title, "Reality insight generated");
        Ok(output)
    }
}
