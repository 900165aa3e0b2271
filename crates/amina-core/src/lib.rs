pub mod config;
pub mod error;
pub mod knowledge;
pub mod types;

pub use error::{AminaError, Result};
pub use knowledge::{KnowledgeError, KnowledgeStore};
