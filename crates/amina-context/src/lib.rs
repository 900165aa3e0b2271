//! Context Encoder: compact knowledge encoding for model prompts.

pub mod knowledge;
pub mod toon;

use serde::Serialize;
use thiserror::Error;

pub use knowledge::{
    encode_company_context, encode_knowledge_base, encode_pricing_context,
    encode_process_context, encode_service_context, encode_services_problems_context,
};
pub use toon::{elide_keys, encode_value, AUDIT_KEYS};

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to serialize context input: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("TOON encoding failed: {0}")]
    Encode(String),
}

/// Encoded text plus a rough size estimate.
///
/// `token_estimate` uses a four-characters-per-token heuristic. It is not a
/// tokenizer count and must not be used for billing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedContext {
    pub text: String,
    pub token_estimate: usize,
}

impl EncodedContext {
    pub fn from_text(text: String) -> Self {
        let token_estimate = estimate_tokens(&text);
        Self {
            text,
            token_estimate,
        }
    }
}

/// `ceil(chars / 4)`.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Encode any serializable value with the default options.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<EncodedContext, ContextError> {
    let value = serde_json::to_value(value)?;
    Ok(EncodedContext::from_text(encode_value(&value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens("ééééé"), 2);
    }

    #[test]
    fn encode_is_deterministic() {
        let value = json!({ "a": [1, 2], "b": { "c": "d" } });
        let first = encode(&value).unwrap();
        let second = encode(&value).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.token_estimate, estimate_tokens(&first.text));
    }

    #[test]
    fn encode_accepts_typed_structs() {
        #[derive(Serialize)]
        struct Step {
            step: u32,
            name: &'static str,
        }
        let steps = vec![
            Step { step: 1, name: "Discovery" },
            Step { step: 2, name: "Build" },
        ];
        let out = encode(&steps).unwrap();
        assert!(out.text.starts_with("[2]{step,name}:"));
        assert!(out.text.lines().any(|l| l.trim() == "1,Discovery"));
        assert!(out.text.lines().any(|l| l.trim() == "2,Build"));
    }
}
