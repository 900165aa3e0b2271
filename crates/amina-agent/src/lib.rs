//! Hosted-model client and the chatbot orchestrator that falls back to the
//! intent pipeline.

pub mod chatbot;
pub mod client;
pub mod openai;
pub mod prompt;
pub mod provider;

pub use chatbot::{ChatMode, Chatbot, ChatbotFactory, ChatbotStatus, QuickAction};
pub use client::{ChatFailure, ChatOutcome, ClientStats, HostedModelClient};
pub use openai::OpenAiProvider;
pub use provider::{ChatRequest, ChatResponse, LlmProvider, Message, ProviderError, Role};

use amina_context::ContextError;
use amina_intent::IntentError;

/// Failures while assembling a [`ChatbotFactory`]. Request handling itself
/// never returns an error.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("context encoding failed: {0}")]
    Context(#[from] ContextError),

    #[error("intent taxonomy invalid: {0}")]
    Intent(#[from] IntentError),

    #[error("provider setup failed: {0}")]
    Provider(#[from] ProviderError),
}
