use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use amina_context::{encode_knowledge_base, EncodedContext};
use amina_core::config::AminaConfig;
use amina_core::KnowledgeStore;
use amina_intent::{IntentResponder, RandomSource, ThreadRandom};
use futures_util::FutureExt;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::client::{ChatOutcome, ClientStats, HostedModelClient, HostedSettings, SupportContacts};
use crate::openai::OpenAiProvider;
use crate::prompt::build_system_prompt;
use crate::provider::{LlmProvider, Message};
use crate::AgentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChatMode {
    #[serde(rename = "Hosted-model")]
    Hosted,
    #[serde(rename = "Intent-based")]
    IntentBased,
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatMode::Hosted => f.write_str("Hosted-model"),
            ChatMode::IntentBased => f.write_str("Intent-based"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChatbotStatus {
    pub mode: ChatMode,
    pub hosted_available: bool,
    pub stats: ClientStats,
}

/// Preset message offered as a one-click button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub label: &'static str,
    pub message: &'static str,
}

pub const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction {
        label: "📅 Book a Meeting",
        message: "I'd like to schedule a consultation",
    },
    QuickAction {
        label: "💼 Our Services",
        message: "What services do you offer?",
    },
    QuickAction {
        label: "💰 Pricing",
        message: "How much does it cost?",
    },
    QuickAction {
        label: "📞 Contact",
        message: "How can I contact you?",
    },
];

pub const SUGGESTED_QUESTIONS: &[&str] = &[
    "What services do you offer?",
    "Tell me about AI automation",
    "How much does a website cost?",
    "How can I contact you?",
    "What is your development process?",
    "Do you offer support after launch?",
];

/// One conversation: hosted-model client plus the shared fallback pipeline.
pub struct Chatbot {
    client: HostedModelClient,
    responder: Arc<IntentResponder>,
    mode: ChatMode,
}

impl Chatbot {
    /// Starts in hosted mode only when asked to and the client is available.
    pub fn new(
        client: HostedModelClient,
        responder: Arc<IntentResponder>,
        prefer_hosted: bool,
    ) -> Self {
        let mode = if prefer_hosted && client.is_available() {
            ChatMode::Hosted
        } else {
            ChatMode::IntentBased
        };
        Self {
            client,
            responder,
            mode,
        }
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    /// Exactly one reply per message. Hosted failures and panics fall back to
    /// the intent pipeline; the hosted error text is never returned.
    #[instrument(skip(self, text), fields(mode = %self.mode))]
    pub async fn get_response(&mut self, text: &str) -> String {
        if self.mode == ChatMode::Hosted && self.client.is_available() {
            let attempt = AssertUnwindSafe(self.client.chat(text)).catch_unwind().await;
            match attempt {
                Ok(ChatOutcome::Reply {
                    message,
                    tokens_used,
                }) => {
                    debug!(?tokens_used, "hosted reply");
                    return message;
                }
                Ok(ChatOutcome::Failed { error, .. }) => {
                    warn!(%error, "hosted model failed, falling back to intent pipeline");
                }
                Err(_) => {
                    warn!("hosted model panicked, falling back to intent pipeline");
                }
            }
        }
        self.responder.respond(text)
    }

    /// Enabling hosted mode while the client is unavailable is a no-op.
    pub fn toggle_mode(&mut self, enable: bool) -> ChatMode {
        if enable && !self.client.is_available() {
            warn!("cannot enable hosted mode: hosted model unavailable");
            return self.mode;
        }
        self.mode = if enable {
            ChatMode::Hosted
        } else {
            ChatMode::IntentBased
        };
        info!(mode = %self.mode, "chat mode switched");
        self.mode
    }

    pub fn reset_conversation(&mut self) {
        self.client.reset_conversation();
    }

    /// Hosted-model conversation so far (empty in intent-based mode).
    pub fn history(&self) -> &[Message] {
        self.client.history()
    }

    pub fn status(&self) -> ChatbotStatus {
        ChatbotStatus {
            mode: self.mode,
            hosted_available: self.client.is_available(),
            stats: self.client.stats(),
        }
    }

    pub fn quick_actions() -> &'static [QuickAction] {
        QUICK_ACTIONS
    }

    pub fn suggested_questions() -> &'static [&'static str] {
        SUGGESTED_QUESTIONS
    }
}

/// Shared pieces every session needs; builds one [`Chatbot`] per session.
pub struct ChatbotFactory {
    responder: Arc<IntentResponder>,
    provider: Option<Arc<dyn LlmProvider>>,
    context: Arc<EncodedContext>,
    system_prompt: Arc<str>,
    settings: HostedSettings,
    contacts: SupportContacts,
    prefer_hosted: bool,
}

impl ChatbotFactory {
    /// Wire everything from config. A missing credential or a client that
    /// fails to build leaves the hosted model unavailable for the process.
    pub fn from_config(
        config: &AminaConfig,
        store: Arc<KnowledgeStore>,
    ) -> Result<Self, AgentError> {
        let hosted = &config.hosted_model;
        let provider: Option<Arc<dyn LlmProvider>> = if !hosted.enabled {
            info!("hosted model disabled by config");
            None
        } else if let Some(key) = hosted.resolve_api_key() {
            match OpenAiProvider::new(
                key,
                Some(hosted.base_url.clone()),
                Duration::from_millis(hosted.timeout_ms),
            ) {
                Ok(p) => Some(Arc::new(p) as Arc<dyn LlmProvider>),
                Err(e) => {
                    warn!(error = %e, "hosted model client could not be built");
                    None
                }
            }
        } else {
            warn!("no hosted model API key configured, using intent-based responses");
            None
        };

        Self::new(store, config, provider, Arc::new(ThreadRandom))
    }

    pub fn new(
        store: Arc<KnowledgeStore>,
        config: &AminaConfig,
        provider: Option<Arc<dyn LlmProvider>>,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, AgentError> {
        let responder = IntentResponder::new(store.clone(), &config.knowledge.brand_tokens, random)?;
        let context = encode_knowledge_base(&store)?;
        let company = &store.knowledge.company;
        let system_prompt: Arc<str> = Arc::from(build_system_prompt(company, &context));

        info!(
            context_tokens = context.token_estimate,
            hosted = provider.is_some(),
            "chatbot factory ready"
        );

        Ok(Self {
            responder: Arc::new(responder),
            provider,
            context: Arc::new(context),
            system_prompt,
            settings: HostedSettings::from(&config.hosted_model),
            contacts: SupportContacts {
                email: company.contact.email.clone(),
                calendly: company.contact.calendly.clone(),
            },
            prefer_hosted: config.hosted_model.enabled,
        })
    }

    pub fn build(&self) -> Chatbot {
        let client = HostedModelClient::new(
            self.provider.clone(),
            self.system_prompt.clone(),
            self.context.token_estimate,
            self.settings.clone(),
            self.contacts.clone(),
        );
        Chatbot::new(client, self.responder.clone(), self.prefer_hosted)
    }

    pub fn hosted_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn context(&self) -> &EncodedContext {
        &self.context
    }

    pub fn responder(&self) -> &Arc<IntentResponder> {
        &self.responder
    }
}
