//! Generation backends: list models and turn a prompt into a reply.
//!
//! Two implementations sit behind [`GenerationBackend`]:
//! - [`GeminiBackend`] calls the Generative Language REST API directly;
//! - [`ProxyBackend`] speaks the small `/models` + `/generate` JSON protocol of a
//!   server that holds the provider integration.

mod error;
mod gemini;
mod proxy;
mod tagged;

pub use error::{BackendError, ErrorBody};
pub use gemini::GeminiBackend;
pub use proxy::ProxyBackend;

use serde::{Deserialize, Serialize};

use crate::core::app;
use crate::core::config::{BackendKind, Config};

/// A generation request. Serialized as-is for the proxy protocol.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    pub api_key: String,
    pub model_name: String,
}

/// A successful generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReply {
    pub reply: String,
    #[serde(default)]
    pub citations: Vec<String>,
    /// Newline-delimited; empty when the model was not asked for any.
    #[serde(default)]
    pub additional_questions: String,
}

/// Something that can list models and generate replies.
///
/// Calls are awaited one at a time per user action; there is no client-side timeout
/// and no cancellation.
pub trait GenerationBackend {
    /// Model identifiers offered for generation, as the service names them.
    async fn list_models(&self, api_key: &str) -> Result<Vec<String>, BackendError>;

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateReply, BackendError>;
}

/// The backend chosen by configuration.
pub enum Backend {
    Gemini(GeminiBackend),
    Proxy(ProxyBackend),
}

impl Backend {
    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("{}/{}", app::NAME, app::VERSION))
            .build()?;
        Ok(match config.backend {
            BackendKind::Gemini => {
                Backend::Gemini(GeminiBackend::new(http, &config.gemini_base_url))
            }
            BackendKind::Proxy => Backend::Proxy(ProxyBackend::new(
                http,
                &config.proxy_url,
                config.proxy_auth.clone(),
            )),
        })
    }
}

impl GenerationBackend for Backend {
    async fn list_models(&self, api_key: &str) -> Result<Vec<String>, BackendError> {
        match self {
            Backend::Gemini(b) => b.list_models(api_key).await,
            Backend::Proxy(b) => b.list_models(api_key).await,
        }
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateReply, BackendError> {
        match self {
            Backend::Gemini(b) => b.generate(request).await,
            Backend::Proxy(b) => b.generate(request).await,
        }
    }
}

/// First 200 chars of a body, for error messages.
fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(MAX).collect();
    format!("{}…", cut)
}
