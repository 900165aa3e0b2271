use amina_core::types::Intent;
use tracing::debug;

use crate::normalize::Normalizer;

/// Best-scoring intent for a message.
#[derive(Debug, Clone, Copy)]
pub struct IntentMatch<'a> {
    pub intent: &'a Intent,
    pub score: f64,
    /// `score / max_score * 100`, capped at 100. Logged, never used to gate.
    pub confidence: f64,
}

struct PreparedKeyword {
    phrase: String,
    tokens: Vec<String>,
    weight: f64,
}

struct PreparedIntent {
    intent: Intent,
    keywords: Vec<PreparedKeyword>,
    max_score: f64,
}

/// Weighted keyword classifier over a fixed intent list.
///
/// Keywords are normalized once at construction. Intents keep their
/// declaration order, which decides ties.
pub struct IntentClassifier {
    normalizer: Normalizer,
    intents: Vec<PreparedIntent>,
}

impl IntentClassifier {
    pub fn new(intents: &[Intent], normalizer: Normalizer) -> Self {
        let intents = intents
            .iter()
            .map(|intent| {
                let keywords = intent
                    .keywords
                    .iter()
                    .map(|k| {
                        let phrase = normalizer.normalize(&k.word);
                        let tokens = phrase.split_whitespace().map(str::to_string).collect();
                        PreparedKeyword {
                            phrase,
                            tokens,
                            weight: k.weight,
                        }
                    })
                    .collect();
                PreparedIntent {
                    intent: intent.clone(),
                    keywords,
                    max_score: intent.max_score(),
                }
            })
            .collect();
        Self {
            normalizer,
            intents,
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn intents(&self) -> impl Iterator<Item = &Intent> {
        self.intents.iter().map(|p| &p.intent)
    }

    /// Highest-scoring intent whose score reaches its threshold. Equal scores
    /// resolve to the intent declared first.
    pub fn detect_intent(&self, text: &str) -> Option<IntentMatch<'_>> {
        let message = self.normalizer.normalize(text);
        let mut best: Option<IntentMatch<'_>> = None;

        for prepared in &self.intents {
            let score = score_prepared(&message, prepared);
            if score < prepared.intent.threshold {
                continue;
            }
            let confidence = if prepared.max_score > 0.0 {
                (score / prepared.max_score * 100.0).min(100.0)
            } else {
                0.0
            };
            debug!(intent = %prepared.intent.id, score, confidence, "intent candidate");
            if best.map_or(true, |b| score > b.score) {
                best = Some(IntentMatch {
                    intent: &prepared.intent,
                    score,
                    confidence,
                });
            }
        }

        if let Some(m) = &best {
            debug!(intent = %m.intent.id, score = m.score, "intent selected");
        }
        best
    }

    /// Raw score of `text` against the intent with `id`; `None` for unknown ids.
    pub fn score(&self, text: &str, id: &str) -> Option<f64> {
        let message = self.normalizer.normalize(text);
        self.intents
            .iter()
            .find(|p| p.intent.id == id)
            .map(|p| score_prepared(&message, p))
    }
}

/// Full weight for a phrase contained in the message, otherwise half weight
/// for every keyword token that overlaps some message token.
fn score_prepared(message: &str, prepared: &PreparedIntent) -> f64 {
    let words: Vec<&str> = message.split_whitespace().collect();
    let mut total = 0.0;

    for keyword in &prepared.keywords {
        if keyword.phrase.is_empty() {
            continue;
        }
        if message.contains(keyword.phrase.as_str()) {
            total += keyword.weight;
            continue;
        }
        for token in &keyword.tokens {
            if words
                .iter()
                .any(|w| w.contains(token.as_str()) || token.contains(*w))
            {
                total += keyword.weight * 0.5;
            }
        }
    }
    total
}
