//! Intent-based fallback pipeline: keyword classifier plus templated answers.

pub mod classifier;
pub mod error;
pub mod generator;
pub mod handler;
pub mod normalize;
pub mod problems;
pub mod random;
pub mod responder;

pub use classifier::{IntentClassifier, IntentMatch};
pub use error::IntentError;
pub use generator::ResponseGenerator;
pub use handler::{HandlerTable, IntentHandler};
pub use normalize::Normalizer;
pub use problems::{ProblemMatcher, Recommendation};
pub use random::{FixedIndex, RandomSource, ThreadRandom};
pub use responder::IntentResponder;
