use std::collections::HashMap;

use amina_core::types::{Intent, KnowledgeBase};
use tracing::debug;

use crate::error::IntentError;

/// Templated answer kinds, resolved from intent ids once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentHandler {
    ServicesOverview,
    ServiceDetail,
    Pricing,
    Contact,
    Booking,
    Process,
    Company,
    Payment,
    Contract,
    Support,
    ProblemSolution,
}

const HANDLER_IDS: &[(&str, IntentHandler)] = &[
    ("services_general", IntentHandler::ServicesOverview),
    ("web_development", IntentHandler::ServiceDetail),
    ("mobile_development", IntentHandler::ServiceDetail),
    ("ai_chatbot", IntentHandler::ServiceDetail),
    ("data_analytics", IntentHandler::ServiceDetail),
    ("cloud_services", IntentHandler::ServiceDetail),
    ("custom_solution", IntentHandler::ServiceDetail),
    ("security", IntentHandler::ServiceDetail),
    ("pricing", IntentHandler::Pricing),
    ("contact", IntentHandler::Contact),
    ("booking", IntentHandler::Booking),
    ("process", IntentHandler::Process),
    ("timeline", IntentHandler::Process),
    ("portfolio", IntentHandler::Company),
    ("location", IntentHandler::Company),
    ("company_info", IntentHandler::Company),
    ("experience", IntentHandler::Company),
    ("payment", IntentHandler::Payment),
    ("contract", IntentHandler::Contract),
    ("support", IntentHandler::Support),
    ("problem_online_presence", IntentHandler::ProblemSolution),
    ("problem_lead_generation", IntentHandler::ProblemSolution),
    ("problem_customer_engagement", IntentHandler::ProblemSolution),
    ("problem_automation", IntentHandler::ProblemSolution),
    ("problem_scalability", IntentHandler::ProblemSolution),
    ("problem_legacy_systems", IntentHandler::ProblemSolution),
];

impl IntentHandler {
    pub fn for_id(id: &str) -> Option<Self> {
        HANDLER_IDS
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, handler)| *handler)
    }
}

/// Intent id → handler, checked against the knowledge base.
#[derive(Debug, Clone, Default)]
pub struct HandlerTable {
    handlers: HashMap<String, IntentHandler>,
}

impl HandlerTable {
    /// Intents with a canned-response pool need no handler. Every other
    /// intent must map to one, and service-detail intents must name a
    /// service that exists.
    pub fn build(intents: &[Intent], kb: &KnowledgeBase) -> Result<Self, IntentError> {
        let mut handlers = HashMap::new();
        for intent in intents {
            let Some(handler) = IntentHandler::for_id(&intent.id) else {
                if intent.responses.is_empty() {
                    return Err(IntentError::MissingHandler {
                        id: intent.id.clone(),
                    });
                }
                continue;
            };

            if handler == IntentHandler::ServiceDetail {
                let context = intent
                    .context
                    .as_deref()
                    .ok_or_else(|| IntentError::MissingContext {
                        id: intent.id.clone(),
                    })?;
                if kb.service(context).is_none() {
                    return Err(IntentError::UnknownServiceContext {
                        id: intent.id.clone(),
                        context: context.to_string(),
                    });
                }
            }
            handlers.insert(intent.id.clone(), handler);
        }
        debug!(handlers = handlers.len(), "intent handlers resolved");
        Ok(Self { handlers })
    }

    pub fn get(&self, id: &str) -> Option<IntentHandler> {
        self.handlers.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
