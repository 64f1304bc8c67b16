use slack_morphism::errors::SlackClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Could not find article: {0}")]
    ResolutionError(String),

    #[error("Failed to fetch article content: {0}")]
    FetchError(String),

    #[error("Failed to generate summary: {0}")]
    GenerationError(String),

    #[error("Failed to access summary cache: {0}")]
    StorageError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),
}

impl BotError {
    /// Short name of the pipeline stage (or adapter) that produced this error.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            BotError::ResolutionError(_) => "resolve",
            BotError::FetchError(_) => "fetch",
            BotError::GenerationError(_) => "summarize",
            BotError::StorageError(_) => "cache",
            BotError::ConfigError(_) => "config",
            BotError::ApiError(_) => "slack",
            BotError::HttpError(_) => "http",
        }
    }

    /// One-line chat reply describing the failure.
    ///
    /// Provider error bodies are often pretty-printed JSON, so every run of
    /// whitespace in the detail collapses to a single space.
    #[must_use]
    pub fn user_message(&self) -> String {
        let reply = match self {
            BotError::ResolutionError(detail) => {
                format!("Sorry, I could not find an article: {detail}")
            }
            other => format!("Sorry, something went wrong at the {} step. {other}", other.stage()),
        };
        reply.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl From<SlackClientError> for BotError {
    fn from(error: SlackClientError) -> Self {
        BotError::ApiError(error.to_string())
    }
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        BotError::HttpError(error.to_string())
    }
}

impl From<std::io::Error> for BotError {
    fn from(error: std::io::Error) -> Self {
        BotError::StorageError(error.to_string())
    }
}

impl From<anyhow::Error> for BotError {
    fn from(error: anyhow::Error) -> Self {
        BotError::ApiError(error.to_string())
    }
}
