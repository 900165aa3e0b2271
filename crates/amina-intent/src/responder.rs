use std::sync::Arc;

use amina_core::KnowledgeStore;
use tracing::{debug, instrument};

use crate::classifier::IntentClassifier;
use crate::error::IntentError;
use crate::generator::ResponseGenerator;
use crate::normalize::Normalizer;
use crate::random::RandomSource;

/// The intent-based pipeline: classify, then render. Never fails at
/// request time.
pub struct IntentResponder {
    classifier: IntentClassifier,
    generator: ResponseGenerator,
}

impl IntentResponder {
    pub fn new(
        store: Arc<KnowledgeStore>,
        brand_tokens: &[String],
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, IntentError> {
        let normalizer = Normalizer::new(brand_tokens);
        let classifier = IntentClassifier::new(&store.intents, normalizer.clone());
        let generator = ResponseGenerator::new(store, normalizer, random)?;
        Ok(Self {
            classifier,
            generator,
        })
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn generator(&self) -> &ResponseGenerator {
        &self.generator
    }

    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub fn respond(&self, text: &str) -> String {
        let matched = self.classifier.detect_intent(text);
        match &matched {
            Some(m) => debug!(intent = %m.intent.id, confidence = m.confidence, "responding"),
            None => debug!("no intent matched"),
        }
        self.generator.generate(matched.map(|m| m.intent), text)
    }
}
