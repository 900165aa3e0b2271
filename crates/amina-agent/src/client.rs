//! Hosted-model client with a rolling conversation window.
//!
//! `chat` never returns an error: every failure is folded into
//! [`ChatOutcome::Failed`] with a user-facing apology, and the caller decides
//! whether to fall back.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::provider::{ChatRequest, LlmProvider, Message, ProviderError, Role};

pub const EMPTY_REPLY: &str =
    "I'm having trouble generating a response. Please try again or contact our team.";

/// Sampling and transport settings sent with every request.
#[derive(Debug, Clone)]
pub struct HostedSettings {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    /// History cap in user/assistant exchanges.
    pub max_history_exchanges: usize,
}

impl From<&amina_core::config::HostedModelConfig> for HostedSettings {
    fn from(cfg: &amina_core::config::HostedModelConfig) -> Self {
        Self {
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_tokens: cfg.max_tokens,
            timeout: Duration::from_millis(cfg.timeout_ms),
            max_history_exchanges: cfg.max_history_exchanges,
        }
    }
}

impl Default for HostedSettings {
    fn default() -> Self {
        Self::from(&amina_core::config::HostedModelConfig::default())
    }
}

/// Where apologies point the user.
#[derive(Debug, Clone)]
pub struct SupportContacts {
    pub email: String,
    pub calendly: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatFailure {
    #[error("hosted model not initialized")]
    NotInitialized,
    #[error("Invalid API key")]
    Authentication,
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

impl From<ProviderError> for ChatFailure {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Authentication { .. } => ChatFailure::Authentication,
            ProviderError::RateLimited { .. } => ChatFailure::RateLimited,
            ProviderError::Timeout { .. } => ChatFailure::Timeout,
            other => ChatFailure::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    Reply {
        message: String,
        tokens_used: Option<u32>,
    },
    Failed {
        apology: String,
        error: ChatFailure,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientStats {
    pub context_tokens: usize,
    pub conversation_length: usize,
    pub is_available: bool,
}

pub struct HostedModelClient {
    provider: Option<Arc<dyn LlmProvider>>,
    system_prompt: Arc<str>,
    context_tokens: usize,
    settings: HostedSettings,
    contacts: SupportContacts,
    history: Vec<Message>,
}

impl HostedModelClient {
    /// `provider` is `None` when no credential was configured; the client then
    /// reports itself unavailable for its whole lifetime.
    pub fn new(
        provider: Option<Arc<dyn LlmProvider>>,
        system_prompt: Arc<str>,
        context_tokens: usize,
        settings: HostedSettings,
        contacts: SupportContacts,
    ) -> Self {
        Self {
            provider,
            system_prompt,
            context_tokens,
            settings,
            contacts,
            history: Vec::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    fn history_cap(&self) -> usize {
        self.settings.max_history_exchanges.max(1) * 2
    }

    #[instrument(skip(self, user_text), fields(history = self.history.len()))]
    pub async fn chat(&mut self, user_text: &str) -> ChatOutcome {
        let Some(provider) = self.provider.clone() else {
            return self.failed(ChatFailure::NotInitialized);
        };

        self.history.push(Message::user(user_text));
        self.trim_history();

        let req = ChatRequest {
            model: self.settings.model.clone(),
            system: self.system_prompt.to_string(),
            messages: self.history.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
        };

        let result = tokio::time::timeout(self.settings.timeout, provider.send(&req)).await;
        let resp = match result {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                warn!(provider = provider.name(), error = %e, "hosted model request failed");
                return self.failed(ChatFailure::from(e));
            }
            Err(_) => {
                warn!(
                    provider = provider.name(),
                    timeout_ms = self.settings.timeout.as_millis() as u64,
                    "hosted model request timed out"
                );
                return self.failed(ChatFailure::Timeout);
            }
        };

        let message = if resp.content.trim().is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            resp.content.clone()
        };
        self.history.push(Message::assistant(message.clone()));
        self.trim_history();

        let tokens = resp.total_tokens();
        info!(tokens, model = %resp.model, "hosted model replied");
        ChatOutcome::Reply {
            message,
            tokens_used: (tokens > 0).then_some(tokens),
        }
    }

    pub fn reset_conversation(&mut self) {
        self.history.clear();
        info!("conversation history reset");
    }

    pub fn stats(&self) -> ClientStats {
        ClientStats {
            context_tokens: self.context_tokens,
            conversation_length: self.history.len(),
            is_available: self.is_available(),
        }
    }

    fn failed(&self, error: ChatFailure) -> ChatOutcome {
        ChatOutcome::Failed {
            apology: self.apology(&error),
            error,
        }
    }

    fn apology(&self, failure: &ChatFailure) -> String {
        let SupportContacts { email, calendly } = &self.contacts;
        match failure {
            ChatFailure::NotInitialized => format!(
                "I apologize, but I'm currently unable to connect to my AI brain. \
                 Please contact our team directly at {email} or book a meeting: {calendly}"
            ),
            ChatFailure::Authentication => {
                format!("Authentication error. Please contact our team at {email}")
            }
            ChatFailure::RateLimited => format!(
                "I'm currently experiencing high demand. Please try again in a moment \
                 or contact us directly: {calendly}"
            ),
            ChatFailure::Timeout | ChatFailure::Other(_) => format!(
                "I encountered an error while processing your message. Please try again \
                 or reach out to our team at {email}"
            ),
        }
    }

    /// Drop the oldest messages beyond the cap, then any assistant message
    /// left at the front so the window opens on a user turn.
    fn trim_history(&mut self) {
        let cap = self.history_cap();
        if self.history.len() > cap {
            let excess = self.history.len() - cap;
            self.history.drain(..excess);
        }
        while self
            .history
            .first()
            .is_some_and(|m| m.role == Role::Assistant)
        {
            self.history.remove(0);
        }
    }
}
