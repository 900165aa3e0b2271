use thiserror::Error;

#[derive(Debug, Error)]
pub enum AminaError {
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AminaError {
    /// Short error code string used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            AminaError::Config(_) => "CONFIG_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, AminaError>;
