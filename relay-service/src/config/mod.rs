use secrecy::{ExposeSecret, Secret};
use service_core::config::{
    self as core_config, get_env, get_nonzero_env, get_optional_env, get_parsed_env, process_env, Environment,
    RateLimitConfig,
};
use service_core::error::AppError;

pub const API_KEY_PREFIX: &str = "sk-ant-";
pub const API_KEY_MIN_LEN: usize = 20;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 800;
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_TIMEOUT_SECONDS: u64 = 600;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub anthropic: AnthropicConfig,
    pub auth: RelayAuth,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub max_tokens: u32,
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// How `POST /api/claude` callers are authorized.
#[derive(Debug, Clone)]
pub enum RelayAuth {
    /// Callers must send this value in `x-api-key`.
    SharedKey(Secret<String>),
    /// Authorization happens in front of the service (platform IAM); no
    /// header check.
    Platform,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load(DEFAULT_PORT)?;
        Self::from_lookup(common, &process_env)
    }

    pub fn from_lookup<F>(common: core_config::Config, lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let anthropic = AnthropicConfig::from_lookup(lookup)?;
        let auth = RelayAuth::from_lookup(lookup, common.environment)?;
        let rate_limit = RateLimitConfig::from_lookup(lookup)?;

        Ok(RelayConfig {
            common,
            anthropic,
            auth,
            rate_limit,
        })
    }
}

impl AnthropicConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = get_optional_env(lookup, "ANTHROPIC_API_KEY").unwrap_or_default();
        validate_api_key(&api_key).map_err(|reason| AppError::ConfigError(anyhow::anyhow!(reason)))?;

        let max_tokens = get_parsed_env(lookup, "CLAUDE_MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        if max_tokens == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "CLAUDE_MAX_TOKENS must be positive"
            )));
        }

        Ok(AnthropicConfig {
            api_key: Secret::new(api_key),
            model: get_env(lookup, "CLAUDE_MODEL", Some(DEFAULT_MODEL))?,
            max_tokens,
            base_url: get_env(lookup, "ANTHROPIC_BASE_URL", Some(DEFAULT_BASE_URL))?
                .trim_end_matches('/')
                .to_string(),
            timeout_seconds: get_nonzero_env(
                lookup,
                "ANTHROPIC_TIMEOUT_SECONDS",
                DEFAULT_TIMEOUT_SECONDS,
            )?,
        })
    }
}

impl RelayAuth {
    /// An explicit `SERVICE_AUTH_MODE` wins. Without one, a configured key
    /// selects `SharedKey`; dev falls back to `Platform`, prod refuses.
    pub fn from_lookup<F>(lookup: &F, environment: Environment) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = get_optional_env(lookup, "SERVICE_API_KEY").map(Secret::new);
        let mode = get_optional_env(lookup, "SERVICE_AUTH_MODE").map(|m| m.trim().to_lowercase());

        match (mode.as_deref(), key) {
            (Some("api-key"), Some(key)) => Ok(RelayAuth::SharedKey(key)),
            (Some("api-key"), None) => Err(AppError::ConfigError(anyhow::anyhow!(
                "SERVICE_AUTH_MODE=api-key requires SERVICE_API_KEY"
            ))),
            (Some("platform"), _) => Ok(RelayAuth::Platform),
            (Some(other), _) => Err(AppError::ConfigError(anyhow::anyhow!(
                "SERVICE_AUTH_MODE must be 'api-key' or 'platform', got '{}'",
                other
            ))),
            (None, Some(key)) => Ok(RelayAuth::SharedKey(key)),
            (None, None) if environment.is_prod() => Err(AppError::ConfigError(anyhow::anyhow!(
                "SERVICE_AUTH_MODE must be set in production when SERVICE_API_KEY is absent"
            ))),
            (None, None) => Ok(RelayAuth::Platform),
        }
    }
}

/// Check the provider key format without revealing the key.
pub fn validate_api_key(key: &str) -> Result<(), &'static str> {
    if key.is_empty() {
        return Err("ANTHROPIC_API_KEY is not set");
    }
    if !key.starts_with(API_KEY_PREFIX) {
        return Err("ANTHROPIC_API_KEY must start with 'sk-ant-'");
    }
    if key.len() < API_KEY_MIN_LEN {
        return Err("ANTHROPIC_API_KEY appears too short");
    }
    Ok(())
}

/// Loggable preview of a secret: first 8 and last 4 characters plus length.
pub fn key_fingerprint(key: &Secret<String>) -> String {
    let key = key.expose_secret();
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return format!("*** len={}", chars.len());
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{} len={}", head, tail, chars.len())
}
