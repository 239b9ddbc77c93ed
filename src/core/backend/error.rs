//! Generation and model-listing error types.

use serde::Deserialize;

/// Error codes the generation endpoint uses for failures the user can act on.
pub const QUOTA_EXCEEDED: &str = "QUOTA_EXCEEDED";
pub const BLOCKED_RESPONSE: &str = "BLOCKED_RESPONSE";

/// Failure body of the `/models` and `/generate` endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
}

/// Errors from a backend call, split the way the user sees them.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The model's free quota is used up; another model may still work.
    #[error("Quota exceeded for this model")]
    QuotaExceeded,
    /// The model returned nothing, e.g. blocked by safety filters. Holds the server's text.
    #[error("{0}")]
    Blocked(String),
    /// Any other failure the server described.
    #[error("API error: {0}")]
    Api(String),
    /// The request never got a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// A response arrived but was not the JSON we expected.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Map a structured failure body onto the error kinds.
    pub fn from_error_body(body: ErrorBody) -> Self {
        let message = body
            .error
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "Unknown error".to_string());
        match body.error_code.as_deref() {
            Some(QUOTA_EXCEEDED) => BackendError::QuotaExceeded,
            Some(BLOCKED_RESPONSE) => BackendError::Blocked(message),
            _ => BackendError::Api(message),
        }
    }

    /// The wire error code, when the failure has one.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            BackendError::QuotaExceeded => Some(QUOTA_EXCEEDED),
            BackendError::Blocked(_) => Some(BLOCKED_RESPONSE),
            BackendError::Api(_) | BackendError::Http(_) | BackendError::Decode(_) => None,
        }
    }

    /// Message for the user, with what to do next where there is something to do.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::QuotaExceeded => {
                "The free quota for the selected model is used up. Pick another model with \
                 `models --select` or `--model` and try again."
                    .to_string()
            }
            BackendError::Blocked(msg) => msg.clone(),
            BackendError::Api(msg) => format!("An error occurred: {}", msg),
            BackendError::Http(e) => format!("An error occurred: could not reach the server ({})", e),
            BackendError::Decode(msg) => {
                format!("An error occurred: the server sent an unexpected response ({})", msg)
            }
        }
    }

    /// Short status shown in place of a reply.
    pub fn status_line(&self) -> &'static str {
        match self {
            BackendError::QuotaExceeded => "Quota limit reached. Change the model.",
            BackendError::Blocked(_) => "No reply: the response was blocked.",
            BackendError::Api(_) | BackendError::Http(_) | BackendError::Decode(_) => {
                "No reply: generation failed."
            }
        }
    }
}
