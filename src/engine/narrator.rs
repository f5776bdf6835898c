use std::fmt;

use thiserror::Error;
use tracing::{error, info};

use crate::engine::llm_client::{CompletionProvider, CompletionRequest};
use crate::engine::prompt_builder::PromptBuilder;
use crate::model::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Opening,
    Continuation,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationStage::Opening => f.write_str("generate story"),
            GenerationStage::Continuation => f.write_str("continue the story"),
        }
    }
}

/// The provider could not produce text. The cause is logged, not carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Failed to {stage}. Please try again.")]
pub struct GenerationFailed {
    pub stage: GenerationStage,
}

/// Stateless narrator: builds prompts and forwards them to a provider.
pub struct NarrativeGenerator<P> {
    provider: P,
    model: String,
}

impl<P: CompletionProvider> NarrativeGenerator<P> {
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self { provider, model: model.into() }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn generate_opening(&self, world_description: &str) -> Result<String, GenerationFailed> {
        let system = PromptBuilder::opening_persona();
        let prompt = PromptBuilder::opening_prompt(world_description);

        self.call(GenerationStage::Opening, &system, &prompt)
    }

    pub fn continue_narrative(&self, transcript: &[Message]) -> Result<String, GenerationFailed> {
        let system = PromptBuilder::continuation_persona(PromptBuilder::world_of(transcript));
        let prompt = PromptBuilder::continuation_prompt(&PromptBuilder::render_history(transcript));

        self.call(GenerationStage::Continuation, &system, &prompt)
    }

    fn call(&self, stage: GenerationStage, system: &str, prompt: &str) -> Result<String, GenerationFailed> {
        let request = CompletionRequest { system, prompt, model: &self.model };

        match self.provider.complete(request) {
            Ok(text) => {
                info!(%stage, chars = text.len(), "narrative generated");
                Ok(text)
            }
            Err(e) => {
                error!(%stage, error = ?e, "completion provider failed");
                Err(GenerationFailed { stage })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::ScriptedProvider;

    #[test]
    fn opening_returns_provider_text_verbatim() {
        let provider = ScriptedProvider::replying(["  Rain hammers neon-lit canals... What do you do?\n"]);
        let generator = NarrativeGenerator::new(provider.clone(), "gpt-4o");

        let text = generator.generate_opening("a flooded cyberpunk city").unwrap();
        assert_eq!(text, "  Rain hammers neon-lit canals... What do you do?\n");

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "gpt-4o");
        assert!(calls[0].system.starts_with("You are the Game Master of a solo RPG."));
        assert!(calls[0].prompt.contains("a flooded cyberpunk city"));
    }

    #[test]
    fn continuation_uses_world_and_history() {
        let provider = ScriptedProvider::replying(["The water is cold."]);
        let generator = NarrativeGenerator::new(provider.clone(), "gpt-4o");
        let transcript = vec![
            Message::world("a flooded cyberpunk city"),
            Message::assistant("Rain hammers neon-lit canals."),
            Message::user("I dive into the water"),
        ];

        assert_eq!(generator.continue_narrative(&transcript).unwrap(), "The water is cold.");

        let call = &provider.calls()[0];
        assert!(call.system.contains("The world is described as: World: a flooded cyberpunk city"));
        assert!(call
            .prompt
            .contains("Game Master: Rain hammers neon-lit canals.\n\nPlayer: I dive into the water"));
        assert!(!call.prompt.contains("World:"));
    }

    #[test]
    fn missing_world_is_not_an_error() {
        let provider = ScriptedProvider::replying(["ok"]);
        let generator = NarrativeGenerator::new(provider.clone(), "m");

        assert!(generator.continue_narrative(&[Message::user("look around")]).is_ok());
        assert!(provider.calls()[0].system.contains("The world is described as: \n"));
    }

    #[test]
    fn provider_errors_become_generation_failed() {
        let generator = NarrativeGenerator::new(ScriptedProvider::failing(), "m");

        let err = generator.generate_opening("x").unwrap_err();
        assert_eq!(err, GenerationFailed { stage: GenerationStage::Opening });
        assert_eq!(err.to_string(), "Failed to generate story. Please try again.");

        let err = generator.continue_narrative(&[]).unwrap_err();
        assert_eq!(err.stage, GenerationStage::Continuation);
        assert!(!err.to_string().contains("quota"));
    }
}
