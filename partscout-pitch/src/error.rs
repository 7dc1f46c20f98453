/// Errors that can occur while generating or voicing a pitch.
#[derive(Debug, thiserror::Error)]
pub enum PitchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Rate limited by the API")]
    RateLimit,

    #[error("API error: {0}")]
    Api(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
