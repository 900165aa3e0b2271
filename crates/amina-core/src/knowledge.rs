//! Knowledge Store: the static company/service/pricing/intent dataset.
//!
//! Loaded once at startup, validated, then shared read-only behind an `Arc`.
//! The raw JSON documents are kept next to the typed records so the context
//! encoder sees every field exactly as authored (including audit metadata it
//! chooses to drop).

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use crate::config::KnowledgeConfig;
use crate::types::{Intent, IntentsFile, KnowledgeBase, PricingDetails, ServicesProblemsMap};

pub const KNOWLEDGE_BASE_FILE: &str = "knowledge-base.json";
pub const INTENTS_FILE: &str = "intents.json";
pub const PRICING_FILE: &str = "pricing-details.json";
pub const SERVICES_PROBLEMS_FILE: &str = "services-problems.json";

const EMBEDDED_KNOWLEDGE_BASE: &str = include_str!("../../../data/chatbot/knowledge-base.json");
const EMBEDDED_INTENTS: &str = include_str!("../../../data/chatbot/intents.json");
const EMBEDDED_PRICING: &str = include_str!("../../../data/chatbot/pricing-details.json");
const EMBEDDED_SERVICES_PROBLEMS: &str =
    include_str!("../../../data/chatbot/services-problems.json");

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid intent '{id}': {reason}")]
    InvalidIntent { id: String, reason: String },
}

/// Untyped copies of the source documents, used for context encoding.
#[derive(Debug, Clone)]
pub struct RawKnowledge {
    pub knowledge_base: serde_json::Value,
    pub pricing: serde_json::Value,
    pub services_problems: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    pub knowledge: KnowledgeBase,
    pub intents: Vec<Intent>,
    pub pricing: PricingDetails,
    pub problems: ServicesProblemsMap,
    pub raw: RawKnowledge,
}

struct Sources<'a> {
    knowledge_base: &'a str,
    intents: &'a str,
    pricing: &'a str,
    services_problems: &'a str,
}

impl KnowledgeStore {
    /// Build from the JSON compiled into the binary.
    pub fn embedded() -> Result<Self, KnowledgeError> {
        Self::from_sources(Sources {
            knowledge_base: EMBEDDED_KNOWLEDGE_BASE,
            intents: EMBEDDED_INTENTS,
            pricing: EMBEDDED_PRICING,
            services_problems: EMBEDDED_SERVICES_PROBLEMS,
        })
    }

    /// Build from the four JSON files in `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, KnowledgeError> {
        let knowledge_base = read_file(&dir.join(KNOWLEDGE_BASE_FILE))?;
        let intents = read_file(&dir.join(INTENTS_FILE))?;
        let pricing = read_file(&dir.join(PRICING_FILE))?;
        let services_problems = read_file(&dir.join(SERVICES_PROBLEMS_FILE))?;
        Self::from_sources(Sources {
            knowledge_base: &knowledge_base,
            intents: &intents,
            pricing: &pricing,
            services_problems: &services_problems,
        })
    }

    /// Load according to config: `data_dir` when set, embedded data otherwise.
    pub fn load(config: &KnowledgeConfig) -> Result<Self, KnowledgeError> {
        let store = match config.data_dir.as_deref() {
            Some(dir) => Self::from_dir(Path::new(dir))?,
            None => Self::embedded()?,
        };
        info!(
            intents = store.intents.len(),
            services = store.knowledge.services.len(),
            source = config.data_dir.as_deref().unwrap_or("embedded"),
            "knowledge store loaded"
        );
        Ok(store)
    }

    fn from_sources(src: Sources<'_>) -> Result<Self, KnowledgeError> {
        let kb_raw: serde_json::Value = parse(KNOWLEDGE_BASE_FILE, src.knowledge_base)?;
        let pricing_raw: serde_json::Value = parse(PRICING_FILE, src.pricing)?;
        let problems_raw: serde_json::Value = parse(SERVICES_PROBLEMS_FILE, src.services_problems)?;

        let knowledge: KnowledgeBase = from_value(KNOWLEDGE_BASE_FILE, kb_raw.clone())?;
        let pricing: PricingDetails = from_value(PRICING_FILE, pricing_raw.clone())?;
        let problems: ServicesProblemsMap = from_value(SERVICES_PROBLEMS_FILE, problems_raw.clone())?;
        let intents: IntentsFile = parse(INTENTS_FILE, src.intents)?;

        for intent in &intents.intents {
            validate_intent(intent)?;
        }

        Ok(Self {
            knowledge,
            intents: intents.intents,
            pricing,
            problems,
            raw: RawKnowledge {
                knowledge_base: kb_raw,
                pricing: pricing_raw,
                services_problems: problems_raw,
            },
        })
    }
}

/// Keyword sets must be non-empty with positive weights and the threshold
/// must be reachable (`threshold <= sum(weights)`).
pub fn validate_intent(intent: &Intent) -> Result<(), KnowledgeError> {
    let invalid = |reason: String| KnowledgeError::InvalidIntent {
        id: intent.id.clone(),
        reason,
    };

    if intent.keywords.is_empty() {
        return Err(invalid("keyword set is empty".to_string()));
    }
    if let Some(k) = intent.keywords.iter().find(|k| k.weight.is_nan() || k.weight <= 0.0) {
        return Err(invalid(format!(
            "keyword '{}' has non-positive weight {}",
            k.word, k.weight
        )));
    }
    let max = intent.max_score();
    if intent.threshold > max {
        return Err(invalid(format!(
            "threshold {} exceeds total keyword weight {}",
            intent.threshold, max
        )));
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String, KnowledgeError> {
    std::fs::read_to_string(path).map_err(|source| KnowledgeError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: DeserializeOwned>(file: &str, text: &str) -> Result<T, KnowledgeError> {
    serde_json::from_str(text).map_err(|source| KnowledgeError::Parse {
        file: file.to_string(),
        source,
    })
}

fn from_value<T: DeserializeOwned>(file: &str, value: serde_json::Value) -> Result<T, KnowledgeError> {
    serde_json::from_value(value).map_err(|source| KnowledgeError::Parse {
        file: file.to_string(),
        source,
    })
}
