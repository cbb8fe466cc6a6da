use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ANTHROPIC_API_KEY is not set")]
    MissingKey,

    #[error("could not build HTTP client: {0}")]
    Setup(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("Messages API returned {code}: {detail}")]
    Status { code: u16, detail: String },

    #[error("could not decode reply: {0}")]
    Decode(String),
}
