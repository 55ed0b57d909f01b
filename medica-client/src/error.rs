//! Client error taxonomy.
//!
//! The split follows how callers have to react: `Network`/`Http` are
//! transport problems worth retrying later, `Graphql` is a business-rule
//! rejection to show the user, and `Unauthenticated`/`Refresh` are terminal
//! session failures after which stored credentials have already been cleared
//! and the caller should route to the login flow.

use medica_model::graphql::GraphqlError;
use thiserror::Error;

/// Main error type surfaced by every SDK operation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a usable response (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Transport-level rejection outside the GraphQL envelope.
    #[error("request failed with status {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    /// GraphQL errors passed through unchanged; never mutates stored tokens.
    #[error("graphql operation failed: {}", format_errors(.0))]
    Graphql(Vec<GraphqlError>),

    /// Authentication failed with no recovery path. Stored credentials have
    /// been cleared; the original server errors are carried unchanged.
    #[error("unauthenticated: {}", format_errors(.0))]
    Unauthenticated(Vec<GraphqlError>),

    /// A token refresh was attempted and failed. Stored credentials have
    /// been cleared. Distinct from [`ClientError::Unauthenticated`] so
    /// callers can tell "session expired" from "refresh itself broke".
    #[error("session refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    /// The response envelope carried no payload under the requested field.
    #[error("response missing data for `{field}`")]
    MissingData { field: &'static str },

    /// Payload (de)serialization failed.
    #[error("payload encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Session storage could not be opened.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Why a refresh attempt failed.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("refresh request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("refresh endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    /// The response decoded but was missing one of the two tokens.
    #[error("refresh response missing a token")]
    IncompletePayload,

    /// The refresh token disappeared between failure detection and the
    /// refresh attempt (a concurrent operation already failed to refresh).
    #[error("refresh token no longer available")]
    TokenUnavailable,
}

fn format_errors(errors: &[GraphqlError]) -> String {
    if errors.is_empty() {
        return "no error detail".to_string();
    }
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ClientError>;
