use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60; // idle chat sessions are evicted after 30 min
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_HISTORY_EXCHANGES: usize = 10; // 10 user/assistant pairs
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Env var consulted for the hosted-model credential when the config has none.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const CONFIG_PATH_ENV: &str = "AMINA_CONFIG";

/// Top-level config (amina.toml + AMINA_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AminaConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub hosted_model: HostedModelConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Seconds a chat session may stay idle before its history is dropped.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
    /// Live sessions kept at once; the least recently used one is evicted
    /// to make room for a new session.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// Hosted conversational model (OpenAI chat-completions compatible).
///
/// The model is only reachable when `enabled` is set and `api_key` resolves
/// to a value; otherwise the chatbot runs in intent-based mode for the whole
/// process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedModelConfig {
    /// `false` disables the hosted model for the whole process: no client is
    /// built and sessions cannot be switched to hosted mode.
    #[serde(default = "bool_true")]
    pub enabled: bool,
    pub api_key: Option<String>,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Rolling window size in user/assistant exchanges (history cap = 2x).
    #[serde(default = "default_max_history")]
    pub max_history_exchanges: usize,
}

impl Default for HostedModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: default_openai_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_history_exchanges: DEFAULT_MAX_HISTORY_EXCHANGES,
        }
    }
}

impl HostedModelConfig {
    /// Credential from config, falling back to `OPENAI_API_KEY`.
    /// Blank values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Directory holding the four knowledge JSON files. When unset the copies
    /// compiled into the binary are used.
    pub data_dir: Option<String>,
    /// Brand names stripped from user input before intent scoring.
    #[serde(default = "default_brand_tokens")]
    pub brand_tokens: Vec<String>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            brand_tokens: default_brand_tokens(),
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_session_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}
fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}
fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_top_p() -> f32 {
    0.9
}
fn default_max_tokens() -> u32 {
    500
}
fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}
fn default_max_history() -> usize {
    DEFAULT_MAX_HISTORY_EXCHANGES
}
fn default_brand_tokens() -> Vec<String> {
    vec!["sarayatech".to_string(), "saraya tech".to_string()]
}

impl AminaConfig {
    /// Load config from a TOML file with AMINA_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. `AMINA_CONFIG`
    ///   3. ~/.amina/amina.toml
    ///
    /// A missing file is not an error; defaults fill every field.
    /// Nested keys use a double underscore: `AMINA_HOSTED_MODEL__API_KEY`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
            .unwrap_or_else(default_config_path);

        let config: AminaConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("AMINA_").split("__"))
            .extract()
            .map_err(|e| crate::error::AminaError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.amina/amina.toml", home)
}
