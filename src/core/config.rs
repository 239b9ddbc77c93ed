use std::env;
use std::fmt;
use std::str::FromStr;

/// Which generation service the tool talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Generative Language REST API, called directly.
    Gemini,
    /// A server exposing the `/models` and `/generate` JSON endpoints.
    Proxy,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(BackendKind::Gemini),
            "proxy" => Ok(BackendKind::Proxy),
            other => Err(ConfigError::InvalidBackend(other.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Gemini => write!(f, "gemini"),
            BackendKind::Proxy => write!(f, "proxy"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendKind,
    pub proxy_url: String,
    pub gemini_base_url: String,
    /// API key from `GEMINI_API_KEY`, if set. The persisted key is the fallback.
    pub env_api_key: Option<String>,
    pub proxy_auth: Option<ProxyAuth>,
    pub max_history: usize,
}

/// HTTP Basic credentials for a proxy that requires them.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyAuth {
    pub user: String,
    pub password: Option<String>,
}

impl fmt::Debug for ProxyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyAuth")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Credentials are used only when a user name is set.
fn proxy_auth(user: Option<String>, password: Option<String>) -> Option<ProxyAuth> {
    user.map(|user| ProxyAuth { user, password })
}

pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MAX_HISTORY: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("REPLY_FORGE_BACKEND must be `gemini` or `proxy`, got `{0}`")]
    InvalidBackend(String),
    #[error("REPLY_FORGE_MAX_HISTORY must be a positive integer, got `{0}`")]
    InvalidMaxHistory(String),
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_max_history(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ConfigError::InvalidMaxHistory(raw.to_string())),
    }
}

/// Load configuration from environment (after `.env` has been applied).
pub fn load() -> Result<Config, ConfigError> {
    let backend = match non_empty_var("REPLY_FORGE_BACKEND") {
        Some(s) => s.parse()?,
        None => BackendKind::Gemini,
    };

    let max_history = match non_empty_var("REPLY_FORGE_MAX_HISTORY") {
        Some(s) => parse_max_history(&s)?,
        None => DEFAULT_MAX_HISTORY,
    };

    Ok(Config {
        backend,
        proxy_url: non_empty_var("REPLY_FORGE_PROXY_URL")
            .unwrap_or_else(|| DEFAULT_PROXY_URL.to_string()),
        gemini_base_url: non_empty_var("GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
        env_api_key: non_empty_var("GEMINI_API_KEY"),
        proxy_auth: proxy_auth(
            non_empty_var("REPLY_FORGE_PROXY_USER"),
            non_empty_var("REPLY_FORGE_PROXY_PASSWORD"),
        ),
        max_history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_kind_parses_case_insensitively() {
        assert_eq!("Gemini".parse::<BackendKind>().unwrap(), BackendKind::Gemini);
        assert_eq!(" proxy ".parse::<BackendKind>().unwrap(), BackendKind::Proxy);
    }

    #[test]
    fn backend_kind_rejects_unknown() {
        let err = "openai".parse::<BackendKind>().unwrap_err();
        assert!(err.to_string().contains("openai"));
    }

    #[test]
    fn proxy_auth_needs_a_user() {
        assert_eq!(proxy_auth(None, Some("pass".to_string())), None);
        let auth = proxy_auth(Some("user".to_string()), None).unwrap();
        assert_eq!(auth.user, "user");
        assert_eq!(auth.password, None);
    }

    #[test]
    fn proxy_auth_debug_hides_password() {
        let auth = proxy_auth(Some("user".to_string()), Some("secret".to_string())).unwrap();
        assert!(!format!("{:?}", auth).contains("secret"));
    }

    #[test]
    fn max_history_must_be_positive() {
        assert_eq!(parse_max_history("5").unwrap(), 5);
        assert!(parse_max_history("0").is_err());
        assert!(parse_max_history("ten").is_err());
    }
}
