use std::sync::Arc;

use tracing::info;

use super::client::TextGenerator;
use crate::errors::BotError;

/// Turns raw article text into a summary using a fixed system instruction.
#[derive(Clone)]
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    system_prompt: String,
    model: String,
}

impl Summarizer {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, system_prompt: String, model: String) -> Self {
        Self {
            generator,
            system_prompt,
            model,
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the generator's first completion verbatim.
    ///
    /// # Errors
    ///
    /// Every generator failure surfaces as `GenerationError`.
    pub async fn summarize(&self, content: &str) -> Result<String, BotError> {
        let text = self
            .generator
            .complete(&self.system_prompt, content, &self.model)
            .await
            .map_err(|e| match e {
                BotError::GenerationError(_) => e,
                other => BotError::GenerationError(other.to_string()),
            })?;

        info!(
            model = %self.model,
            input_chars = content.len(),
            output_chars = text.len(),
            "Summary generated"
        );
        Ok(text)
    }
}
