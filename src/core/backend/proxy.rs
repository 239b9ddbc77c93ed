//! Client for a server exposing `POST /models` and `POST /generate`.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{BackendError, ErrorBody, GenerateReply, GenerateRequest, GenerationBackend, snippet};
use crate::core::config::ProxyAuth;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelsRequest<'a> {
    api_key: &'a str,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<String>,
}

pub struct ProxyBackend {
    http: Client,
    base_url: String,
    auth: Option<ProxyAuth>,
}

impl ProxyBackend {
    pub fn new(http: Client, base_url: &str, auth: Option<ProxyAuth>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// JSON POST to `path`, with Basic credentials when configured.
    fn request<B>(&self, path: &str, body: &B) -> RequestBuilder
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}/{}", self.base_url, path);
        log::debug!("POST {}", url);
        let builder = self.http.post(&url).json(body);
        match &self.auth {
            Some(auth) => builder.basic_auth(&auth.user, auth.password.as_deref()),
            None => builder,
        }
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.request(path, body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        decode_response(status, &text)
    }
}

/// Decode a success body, or map a failure body onto [`BackendError`].
fn decode_response<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    text: &str,
) -> Result<T, BackendError> {
    if !status.is_success() {
        let body: ErrorBody = serde_json::from_str(text).map_err(|_| {
            BackendError::Decode(format!("HTTP {}: {}", status, snippet(text)))
        })?;
        return Err(BackendError::from_error_body(body));
    }
    serde_json::from_str(text).map_err(|e| BackendError::Decode(e.to_string()))
}

impl GenerationBackend for ProxyBackend {
    async fn list_models(&self, api_key: &str) -> Result<Vec<String>, BackendError> {
        let resp: ModelsResponse = self.post("models", &ModelsRequest { api_key }).await?;
        Ok(resp.models)
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateReply, BackendError> {
        self.post("generate", request).await
    }
}
