//! One generation: validate input, build the prompt, call the backend, archive the result.

use crate::core::backend::{BackendError, GenerateRequest, GenerationBackend};
use crate::core::history::{HistoryRecord, HistoryStore};
use crate::core::kv::KeyValueStore;
use crate::core::prompt;
use crate::core::settings::Settings;

/// Errors from a generation attempt.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(
        "No API key. Pass --api-key, set GEMINI_API_KEY, or run `config set-api-key` first."
    )]
    MissingApiKey,
    #[error("No model selected. Pass --model or pick one with `models --select <NAME>`.")]
    MissingModel,
    #[error("{}", .0.user_message())]
    Backend(#[from] BackendError),
}

/// First non-empty key: command line, then environment, then the saved one.
pub fn resolve_api_key(
    cli: Option<&str>,
    env: Option<&str>,
    saved: Option<String>,
) -> Option<String> {
    [cli, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|k| !k.is_empty())
        .map(String::from)
        .or_else(|| saved.filter(|k| !k.trim().is_empty()))
}

/// Check the input that must be present before any network call.
pub fn validate(settings: &Settings, api_key: &str) -> Result<(), GenerateError> {
    if api_key.trim().is_empty() {
        return Err(GenerateError::MissingApiKey);
    }
    if settings.selected_model().trim().is_empty() {
        return Err(GenerateError::MissingModel);
    }
    Ok(())
}

/// Run one generation and push it into history. Returns the archived record.
///
/// A failed history write is logged and does not fail the generation.
pub async fn generate<B, S>(
    backend: &B,
    history: &HistoryStore<S>,
    settings: Settings,
    api_key: &str,
) -> Result<HistoryRecord, GenerateError>
where
    B: GenerationBackend,
    S: KeyValueStore,
{
    validate(&settings, api_key)?;

    let prompt = prompt::build_prompt(&settings);
    let request = GenerateRequest {
        prompt: prompt.clone(),
        api_key: api_key.trim().to_string(),
        model_name: settings.selected_model().to_string(),
    };
    log::info!(
        "Generating {} with {} ({} prompt chars)",
        settings.mode(),
        request.model_name,
        prompt.chars().count()
    );

    let reply = backend.generate(&request).await?;

    let record = HistoryRecord::now(
        settings,
        prompt,
        reply.reply,
        reply.citations,
        reply.additional_questions,
    );
    if let Err(e) = history.append(record.clone()) {
        log::warn!("Failed to save history: {}", e);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::core::backend::{ErrorBody, GenerateReply};
    use crate::core::kv::MemoryStore;
    use crate::core::settings::{QuestionSettings, ReplySettings};

    /// Fake backend: records requests and answers with a canned result.
    struct FakeBackend {
        answer: Mutex<Option<Result<GenerateReply, BackendError>>>,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl FakeBackend {
        fn answering(answer: Result<GenerateReply, BackendError>) -> Self {
            Self {
                answer: Mutex::new(Some(answer)),
                requests: Mutex::new(vec![]),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl GenerationBackend for FakeBackend {
        async fn list_models(&self, _api_key: &str) -> Result<Vec<String>, BackendError> {
            Ok(vec![])
        }

        async fn generate(&self, request: &GenerateRequest) -> Result<GenerateReply, BackendError> {
            self.requests.lock().unwrap().push(request.clone());
            self.answer
                .lock()
                .unwrap()
                .take()
                .expect("generate called more than once")
        }
    }

    fn reply_settings(model: &str) -> Settings {
        Settings::Reply(ReplySettings {
            received_message: "Lunch tomorrow?".to_string(),
            selected_model: model.to_string(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn success_is_returned_and_archived() {
        let backend = FakeBackend::answering(Ok(GenerateReply {
            reply: "Sure, noon works!".to_string(),
            citations: vec!["https://a.example".to_string()],
            additional_questions: "Which place?".to_string(),
        }));
        let history = HistoryStore::new(MemoryStore::new(), 10);

        let record = generate(&backend, &history, reply_settings("models/gemini-1.5-flash"), " key ")
            .await
            .unwrap();

        assert_eq!(record.ai_reply, "Sure, noon works!");
        assert_eq!(record.ai_citations, Some(vec!["https://a.example".to_string()]));
        assert_eq!(record.additional_questions.as_deref(), Some("Which place?"));
        assert!(record.prompt.contains("Lunch tomorrow?"));
        assert_eq!(history.list(), vec![record.clone()]);

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests[0].api_key, "key");
        assert_eq!(requests[0].model_name, "models/gemini-1.5-flash");
        assert_eq!(requests[0].prompt, record.prompt);
    }

    #[tokio::test]
    async fn missing_api_key_makes_no_call() {
        let backend = FakeBackend::answering(Ok(GenerateReply::default()));
        let history = HistoryStore::new(MemoryStore::new(), 10);
        let err = generate(&backend, &history, reply_settings("models/gemini-pro"), "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingApiKey));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn missing_model_makes_no_call() {
        let backend = FakeBackend::answering(Ok(GenerateReply::default()));
        let history = HistoryStore::new(MemoryStore::new(), 10);
        let settings = Settings::Question(QuestionSettings::default());
        let err = generate(&backend, &history, settings, "key").await.unwrap_err();
        assert!(matches!(err, GenerateError::MissingModel));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn backend_failure_is_not_archived() {
        let backend = FakeBackend::answering(Err(BackendError::from_error_body(ErrorBody {
            error: Some("Quota exceeded for this model.".to_string()),
            error_code: Some("QUOTA_EXCEEDED".to_string()),
        })));
        let history = HistoryStore::new(MemoryStore::new(), 10);
        let err = generate(&backend, &history, reply_settings("models/gemini-pro"), "key")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Backend(BackendError::QuotaExceeded)));
        assert!(err.to_string().contains("another model"));
        assert!(history.list().is_empty());
    }

    #[test]
    fn api_key_resolution_order() {
        assert_eq!(
            resolve_api_key(Some("cli"), Some("env"), Some("saved".to_string())).as_deref(),
            Some("cli")
        );
        assert_eq!(
            resolve_api_key(None, Some("env"), Some("saved".to_string())).as_deref(),
            Some("env")
        );
        assert_eq!(
            resolve_api_key(Some("  "), None, Some("saved".to_string())).as_deref(),
            Some("saved")
        );
        assert_eq!(
            resolve_api_key(Some(""), Some("env"), None).as_deref(),
            Some("env")
        );
        assert_eq!(resolve_api_key(None, None, None), None);
    }
}
