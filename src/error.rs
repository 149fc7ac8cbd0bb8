use thiserror::Error;

#[derive(Debug, Error)]
pub enum TavilyError {
    #[error("Configuration missing: {0}")]
    ConfigMissing(String),

    #[error("Configuration invalid: {0}")]
    ConfigInvalid(String),

    #[error("Invalid parameter: {0}")]
    Validation(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Tavily API error: {status} {status_text}")]
    Backend { status: u16, status_text: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for TavilyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TavilyError::Transport(format!("request timed out: {e}"))
        } else {
            TavilyError::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, TavilyError>;
