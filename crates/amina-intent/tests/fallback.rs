use std::sync::Arc;

use amina_core::config::KnowledgeConfig;
use amina_core::KnowledgeStore;
use amina_intent::{FixedIndex, IntentResponder};

fn responder() -> IntentResponder {
    let store = Arc::new(KnowledgeStore::embedded().expect("embedded knowledge"));
    let brands = KnowledgeConfig::default().brand_tokens;
    IntentResponder::new(store, &brands, Arc::new(FixedIndex(0))).expect("responder")
}

fn detected(r: &IntentResponder, text: &str) -> Option<String> {
    r.classifier()
        .detect_intent(text)
        .map(|m| m.intent.id.clone())
}

#[test]
fn services_question_lists_every_service() {
    let r = responder();
    assert_eq!(
        detected(&r, "What services do you offer?").as_deref(),
        Some("services_general")
    );

    let reply = r.respond("What services do you offer?");
    let store = KnowledgeStore::embedded().unwrap();
    for service in &store.knowledge.services {
        assert!(
            reply.contains(&format!("• **{}**", service.name)),
            "missing {}",
            service.name
        );
    }
    assert!(reply.contains("/solutions"));
}

#[test]
fn empty_input_gets_the_default_response() {
    let r = responder();
    for text in ["", "   ", "xyzzy", "qwerty plugh"] {
        assert!(detected(&r, text).is_none(), "{text:?} matched");
        let reply = r.respond(text);
        for link in ["/solutions", "/about", "/realisation", "/contact"] {
            assert!(reply.contains(link), "{text:?} reply lacks {link}");
        }
        assert_eq!(reply, r.generator().default_response());
    }
}

#[test]
fn common_questions_route_to_their_intents() {
    let r = responder();
    let cases = [
        ("hello", "greeting"),
        ("How much does it cost?", "pricing"),
        ("Tell me about AI automation", "ai_chatbot"),
        ("What is your development process?", "process"),
        ("Do you offer support after launch?", "support"),
        ("Tell me about your packages", "packages"),
        ("Can you help me understand your cloud migration services?", "cloud_services"),
        ("Where are you located?", "location"),
        ("What are your payment terms?", "payment"),
        ("Tell me about mobile app development", "mobile_development"),
        ("Tell me about cybersecurity compliance", "security"),
        ("we need to scale for peak loads", "problem_scalability"),
        ("How can I contact you?", "contact"),
        ("How do I get in touch?", "contact"),
        ("How long does a project take?", "timeline"),
        ("I'd like to schedule a consultation", "booking"),
        ("How much does a website cost?", "pricing"),
        ("Do you build chatbots?", "ai_chatbot"),
        ("I need a mobile app", "mobile_development"),
    ];
    for (text, expected) in cases {
        assert_eq!(detected(&r, text).as_deref(), Some(expected), "for {text:?}");
    }
}

#[test]
fn single_letters_never_reach_the_ai_intent() {
    let r = responder();
    for text in ["a", "i", "a i", "I a"] {
        assert_ne!(detected(&r, text).as_deref(), Some("ai_chatbot"), "for {text:?}");
    }
}

#[test]
fn canned_pools_are_returned_verbatim() {
    let r = responder();
    let store = KnowledgeStore::embedded().unwrap();
    let greeting = store.intents.iter().find(|i| i.id == "greeting").unwrap();
    assert_eq!(r.respond("hello"), greeting.responses[0]);
}

#[test]
fn pricing_reply_covers_all_tables() {
    let reply = responder().respond("How much does it cost?");
    assert!(reply.contains("**Website Development:**"));
    assert!(reply.contains("**Mobile Apps:**"));
    assert!(reply.contains("**AI Chatbots:**"));
    assert!(reply.contains("/contact"));
}

#[test]
fn mobile_questions_get_the_mobile_service_card() {
    let reply = responder().respond("Tell me about mobile app development");
    assert!(reply.starts_with("**Mobile App Development**"));
}

#[test]
fn problem_intents_recommend_services() {
    let r = responder();
    let reply = r.respond("qwerty visibility");
    assert_eq!(
        detected(&r, "qwerty visibility").as_deref(),
        Some("problem_online_presence")
    );
    assert!(reply.contains("**Business Website** (Web & Digital Presence)"));

    let reply = r.respond("we need to scale for peak loads");
    assert!(reply.contains("**Cloud Migration**"));
    assert_eq!(reply.matches("• Solves:").count(), 1);
}

#[test]
fn replies_are_never_empty() {
    let r = responder();
    let inputs = [
        "",
        "?",
        "hello",
        "How can I contact you?",
        "we have a legacy system",
        "SarayaTech",
        "🤖🤖🤖",
        "a",
        "I want to book a meeting",
    ];
    for text in inputs {
        assert!(!r.respond(text).trim().is_empty(), "empty reply for {text:?}");
    }
}
