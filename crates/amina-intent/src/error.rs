use thiserror::Error;

/// Startup-time problems with the intent taxonomy. Classification itself
/// never fails.
#[derive(Debug, Error)]
pub enum IntentError {
    #[error("intent '{id}' has no canned responses and no handler")]
    MissingHandler { id: String },

    #[error("intent '{id}' needs a service context")]
    MissingContext { id: String },

    #[error("intent '{id}' references unknown service '{context}'")]
    UnknownServiceContext { id: String, context: String },
}
