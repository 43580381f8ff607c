//! Provider failure taxonomy.
//!
//! A completion call either produces a full assistant reply or one of these
//! errors — there are no partial replies. The agent catches them and maps
//! them into `TurnResult.error`; callers above the agent never see them raw.

/// Failure of a single completion round-trip.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (connect, TLS, timeout).
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("completion endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body was not a valid chat completion.
    #[error("failed to decode completion response: {0}")]
    Decode(String),

    /// The response decoded but contained no reply text.
    #[error("completion response contained no reply")]
    EmptyReply,
}
