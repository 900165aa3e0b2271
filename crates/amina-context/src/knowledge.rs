//! Knowledge-store specific encoders.
//!
//! `encode_knowledge_base` produces the system context sent with every hosted
//! model request. The narrower helpers encode a single section for callers
//! that want a smaller prompt.

use amina_core::KnowledgeStore;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::{encode, encode_value, ContextError, EncodedContext};

/// Company profile, services, process, booking, pricing and the
/// problem-to-service map in one document.
pub fn encode_knowledge_base(store: &KnowledgeStore) -> Result<EncodedContext, ContextError> {
    let kb = &store.raw.knowledge_base;
    let combined = json!({
        "company": kb["company"],
        "services": kb["services"],
        "process": kb["process"],
        "booking": kb["booking"],
        "pricing": store.raw.pricing,
        "servicesProblems": store.raw.services_problems["services_solutions_map"],
    });

    let encoded = EncodedContext::from_text(encode_value(&combined)?);
    let json_chars = serde_json::to_string(&combined)?.chars().count();
    debug!(
        toon_chars = encoded.text.chars().count(),
        json_chars,
        token_estimate = encoded.token_estimate,
        "knowledge base encoded"
    );
    Ok(encoded)
}

/// One service by key; `None` when the key is unknown.
pub fn encode_service_context(
    store: &KnowledgeStore,
    service_key: &str,
) -> Result<Option<String>, ContextError> {
    match store.knowledge.service(service_key) {
        Some(service) => Ok(Some(encode(service)?.text)),
        None => Ok(None),
    }
}

/// Pricing tables for the named categories (e.g. `mobile_apps`). An empty
/// list selects everything; unknown names are skipped.
pub fn encode_pricing_context(
    store: &KnowledgeStore,
    categories: &[&str],
) -> Result<String, ContextError> {
    let pricing = &store.raw.pricing;
    if categories.is_empty() {
        return Ok(encode(pricing)?.text);
    }

    let mut selected = Map::new();
    for category in categories {
        if let Some(table) = pricing.get(*category) {
            selected.insert(category.to_string(), table.clone());
        }
    }
    Ok(encode(&Value::Object(selected))?.text)
}

pub fn encode_company_context(store: &KnowledgeStore) -> Result<String, ContextError> {
    Ok(encode(&json!({ "company": store.raw.knowledge_base["company"] }))?.text)
}

pub fn encode_process_context(store: &KnowledgeStore) -> Result<String, ContextError> {
    let kb = &store.raw.knowledge_base;
    Ok(encode(&json!({ "process": kb["process"], "booking": kb["booking"] }))?.text)
}

pub fn encode_services_problems_context(store: &KnowledgeStore) -> Result<String, ContextError> {
    let map = &store.raw.services_problems["services_solutions_map"];
    Ok(encode(&json!({ "servicesProblems": map }))?.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> KnowledgeStore {
        KnowledgeStore::embedded().expect("embedded knowledge")
    }

    #[test]
    fn knowledge_base_context_covers_every_section() {
        let store = store();
        let ctx = encode_knowledge_base(&store).unwrap();
        for section in ["company:", "services[", "process[", "booking:", "pricing:", "servicesProblems["] {
            assert!(ctx.text.contains(section), "missing section {section}");
        }
        for service in &store.knowledge.services {
            assert!(ctx.text.contains(&service.name), "missing service {}", service.name);
        }
        assert!(ctx.text.contains(&store.knowledge.company.contact.calendly));
    }

    #[test]
    fn knowledge_base_context_drops_audit_fields() {
        let ctx = encode_knowledge_base(&store()).unwrap();
        assert!(!ctx.text.contains("createdAt"));
        assert!(!ctx.text.contains("updatedAt"));
    }

    #[test]
    fn knowledge_base_context_is_smaller_than_json() {
        let store = store();
        let ctx = encode_knowledge_base(&store).unwrap();
        let json = serde_json::to_string_pretty(&store.raw.knowledge_base).unwrap()
            + &serde_json::to_string_pretty(&store.raw.pricing).unwrap()
            + &serde_json::to_string_pretty(&store.raw.services_problems).unwrap();
        assert!(ctx.text.len() < json.len());
        assert_eq!(ctx.token_estimate, ctx.text.chars().count().div_ceil(4));
    }

    #[test]
    fn pricing_selects_requested_categories() {
        let text = encode_pricing_context(&store(), &["mobile_apps"]).unwrap();
        assert!(text.starts_with("mobile_apps[3]"));
        assert!(!text.contains("website_development"));
    }

    #[test]
    fn pricing_skips_unknown_categories() {
        let text = encode_pricing_context(&store(), &["nope", "packages"]).unwrap();
        assert!(text.starts_with("packages[3]"));
        assert!(!text.contains("nope"));
    }

    #[test]
    fn unknown_service_encodes_to_none() {
        assert!(encode_service_context(&store(), "teleportation").unwrap().is_none());
        let web = encode_service_context(&store(), "web_development").unwrap().unwrap();
        assert!(web.contains("name: Web Development"));
    }

    #[test]
    fn section_helpers_name_their_roots() {
        let store = store();
        assert!(encode_company_context(&store).unwrap().starts_with("company:"));
        assert!(encode_process_context(&store).unwrap().starts_with("process[5]"));
        assert!(encode_services_problems_context(&store)
            .unwrap()
            .starts_with("servicesProblems[3]"));
    }
}
