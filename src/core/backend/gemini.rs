//! Direct client for the Generative Language REST API (`v1beta`).

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::tagged::split_tagged_reply;
use super::{BackendError, GenerateReply, GenerateRequest, GenerationBackend, snippet};
use crate::core::models::NAMESPACE_PREFIX;

const API_KEY_HEADER: &str = "x-goog-api-key";
const GENERATE_METHOD: &str = "generateContent";
const PAGE_SIZE: &str = "1000";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ApiModel>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiModel {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    safety_ratings: Vec<SafetyRating>,
    #[serde(default)]
    citation_metadata: Option<CitationMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SafetyRating {
    category: String,
    probability: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CitationMetadata {
    #[serde(default, alias = "citations")]
    citation_sources: Vec<CitationSource>,
}

#[derive(Debug, Default, Deserialize)]
struct CitationSource {
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// `{"error": {"code": 429, "message": "...", "status": "RESOURCE_EXHAUSTED"}}`
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

pub struct GeminiBackend {
    http: Client,
    base_url: String,
}

impl GeminiBackend {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// `gemini-1.5-pro` → `models/gemini-1.5-pro`; already-prefixed names pass through.
fn qualified_model_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with(NAMESPACE_PREFIX) || name.starts_with("tunedModels/") {
        name.to_string()
    } else {
        format!("{}{}", NAMESPACE_PREFIX, name)
    }
}

fn map_error_status(status: StatusCode, text: &str) -> BackendError {
    let detail = serde_json::from_str::<ApiErrorEnvelope>(text)
        .ok()
        .map(|e| e.error);
    if status == StatusCode::TOO_MANY_REQUESTS
        || detail
            .as_ref()
            .is_some_and(|d| d.status == "RESOURCE_EXHAUSTED")
    {
        return BackendError::QuotaExceeded;
    }
    match detail {
        Some(d) if !d.message.is_empty() => BackendError::Api(d.message),
        _ => BackendError::Decode(format!("HTTP {}: {}", status, snippet(text))),
    }
}

fn blocked_message(resp: &GenerateContentResponse) -> String {
    let mut msg = String::from(
        "The model returned an empty response. It may have been blocked by content safety \
         filters, or the usage quota may have been exceeded.",
    );
    if let Some(candidate) = resp.candidates.first() {
        if let Some(reason) = &candidate.finish_reason {
            msg.push_str(&format!(" (Finish Reason: {})", reason));
        }
        let ratings: Vec<String> = candidate
            .safety_ratings
            .iter()
            .filter(|r| r.probability != "NEGLIGIBLE")
            .map(|r| format!("{}: {}", r.category, r.probability))
            .collect();
        if !ratings.is_empty() {
            msg.push_str(&format!(" (Safety Ratings: {})", ratings.join(", ")));
        }
    }
    if let Some(reason) = resp
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_ref())
    {
        msg.push_str(&format!(" (Block Reason: {})", reason));
    }
    msg
}

/// Turn a successful `generateContent` body into a reply, or a blocked-response error.
fn interpret(resp: GenerateContentResponse) -> Result<GenerateReply, BackendError> {
    let text: Option<String> = resp.candidates.first().and_then(|c| {
        let parts: Vec<&str> = c
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!parts.is_empty()).then(|| parts.concat())
    });
    let Some(text) = text else {
        return Err(BackendError::Blocked(blocked_message(&resp)));
    };

    let (reply, additional_questions) = split_tagged_reply(&text);
    let citations = resp
        .candidates
        .first()
        .and_then(|c| c.citation_metadata.as_ref())
        .map(|m| {
            m.citation_sources
                .iter()
                .filter_map(|s| s.uri.clone())
                .filter(|u| !u.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(GenerateReply {
        reply,
        citations,
        additional_questions,
    })
}

/// Names on one listing page that support `generateContent`, and the token of the
/// next page. A missing or empty token ends the listing.
fn generation_models(page: ListModelsResponse) -> (Vec<String>, Option<String>) {
    let names = page
        .models
        .into_iter()
        .filter(|m| {
            m.supported_generation_methods
                .iter()
                .any(|g| g == GENERATE_METHOD)
        })
        .map(|m| m.name)
        .collect();
    (names, page.next_page_token.filter(|t| !t.is_empty()))
}

impl GenerationBackend for GeminiBackend {
    async fn list_models(&self, api_key: &str) -> Result<Vec<String>, BackendError> {
        let url = format!("{}/v1beta/models", self.base_url);
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![("pageSize", PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }
            log::debug!("GET {} (page token: {:?})", url, page_token);
            let resp = self
                .http
                .get(&url)
                .header(API_KEY_HEADER, api_key)
                .query(&query)
                .send()
                .await?;
            let status = resp.status();
            let text = resp.text().await?;
            if !status.is_success() {
                return Err(map_error_status(status, &text));
            }
            let page: ListModelsResponse =
                serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))?;
            let (page_names, next) = generation_models(page);
            names.extend(page_names);
            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        log::info!("Listed {} generation model(s)", names.len());
        Ok(names)
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateReply, BackendError> {
        let url = format!(
            "{}/v1beta/{}:{}",
            self.base_url,
            qualified_model_name(&request.model_name),
            GENERATE_METHOD
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": request.prompt }] }]
        });
        log::debug!("POST {}", url);
        let resp = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &request.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            let err = map_error_status(status, &text);
            log::warn!("Generation failed: {}", err);
            return Err(err);
        }
        let parsed: GenerateContentResponse =
            serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))?;
        interpret(parsed)
    }
}
