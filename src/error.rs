//! Failures of the generation stages.
//!
//! Every variant is fatal for the run; the orchestrator never retries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generation API returned no text")]
    EmptyResponse,

    #[error("no JSON object found in generation output: {excerpt}")]
    NoJsonObject { excerpt: String },

    #[error("generation output did not match the expected schema: {source}; output: {excerpt}")]
    Malformed {
        #[source]
        source: serde_json::Error,
        excerpt: String,
    },

    #[error("generation output has a blank {0}")]
    BlankField(&'static str),

    #[error("generation output is missing personas: {}", .0.join(", "))]
    IncompletePanel(Vec<String>),
}

/// First 500 characters of a raw model response, for diagnostics.
pub fn excerpt(raw: &str) -> String {
    raw.chars().take(500).collect()
}
