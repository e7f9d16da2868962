use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub embedding: EmbeddingConfig,
    pub similarity: SimilarityConfig,
    pub ask: AskConfig,
    pub messages: MessageConfig,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a multipart upload body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Remote Gemini embedding model, requires `api_keys`.
    Gemini,
    /// Offline feature-hashed bag of words.
    Hashed,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub api_keys: Vec<String>,
    pub model: String,
    pub ndims: usize,
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::Gemini,
            api_keys: vec!["YOUR_API_KEY".to_string()],
            model: "text-embedding-004".to_string(),
            ndims: 768,
            max_attempts: 5,
            retry_delay_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// A match is accepted only when its cosine similarity is strictly above this value.
    pub threshold: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self { threshold: 0.7 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// Answer with the fixed irrelevance message.
    Reject,
    /// Answer with the no-match message and a few random stored questions.
    Suggest,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AskConfig {
    pub relevance_filter: bool,
    pub fallback: FallbackMode,
    pub suggestion_count: usize,
    pub greetings: Vec<String>,
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            relevance_filter: true,
            fallback: FallbackMode::Reject,
            suggestion_count: 3,
            greetings: [
                "hi",
                "hello",
                "hey",
                "greetings",
                "good morning",
                "good afternoon",
                "good evening",
            ]
            .iter()
            .map(|g| g.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MessageConfig {
    pub welcome: String,
    pub no_data: String,
    pub greeting: String,
    pub irrelevant: String,
    pub no_match: String,
    pub upload_success: String,
    pub missing_file: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            welcome: "Welcome to the chatbot API!".to_string(),
            no_data: "No Q&A data available.".to_string(),
            greeting: "Hello! How can I help you today?".to_string(),
            irrelevant: "Irrelevant. Please try a question related to Microsoft AI, such as 'What is Microsoft AI?' or 'Azure AI'.".to_string(),
            no_match: "Sorry, I couldn't find an answer to that. You could try one of these questions:".to_string(),
            upload_success: "Q&A extracted successfully!".to_string(),
            missing_file: "No file uploaded.".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}
