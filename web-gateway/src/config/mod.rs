use reqwest::Url;
use secrecy::Secret;
use service_core::config::{
    self as core_config, get_env, get_nonzero_env, get_optional_env, process_env, RateLimitConfig,
};
use service_core::error::AppError;
use std::net::IpAddr;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_METADATA_IDENTITY_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/identity";
const DEFAULT_IDENTITY_TIMEOUT_SECONDS: u64 = 3;
const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub common: core_config::Config,
    pub relay: RelaySettings,
    pub auth: UpstreamAuth,
    pub identity: IdentitySettings,
    pub static_dir: PathBuf,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone)]
pub struct RelaySettings {
    /// Base URL without a trailing slash; also the identity-token audience.
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct IdentitySettings {
    pub metadata_url: String,
    pub timeout_seconds: u64,
}

/// How outbound calls to the relay are authenticated.
#[derive(Debug, Clone)]
pub enum UpstreamAuth {
    /// Local development: send `x-api-key` when a key is configured.
    LocalStaticKey(Option<Secret<String>>),
    /// Deployed: a platform-issued identity token as a bearer credential.
    PlatformIdentityToken,
}

impl UpstreamAuth {
    /// `API_AUTH_MODE` wins; otherwise the mode is inferred from the relay
    /// host.
    pub fn from_lookup<F>(lookup: &F, relay_url: &Url) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = get_optional_env(lookup, "API_SERVICE_KEY").map(Secret::new);
        let mode = get_optional_env(lookup, "API_AUTH_MODE").map(|m| m.trim().to_lowercase());

        match mode.as_deref() {
            Some("static-key") => Ok(UpstreamAuth::LocalStaticKey(key)),
            Some("identity-token") => Ok(UpstreamAuth::PlatformIdentityToken),
            Some(other) => Err(AppError::ConfigError(anyhow::anyhow!(
                "API_AUTH_MODE must be 'static-key' or 'identity-token', got '{}'",
                other
            ))),
            None if is_loopback_url(relay_url) => Ok(UpstreamAuth::LocalStaticKey(key)),
            None => Ok(UpstreamAuth::PlatformIdentityToken),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            UpstreamAuth::LocalStaticKey(Some(_)) => "static x-api-key",
            UpstreamAuth::LocalStaticKey(None) => "unauthenticated (local)",
            UpstreamAuth::PlatformIdentityToken => "platform identity token",
        }
    }
}

/// Loopback hosts: `localhost`, `*.localhost`, `127.0.0.0/8` and `::1`.
pub fn is_loopback_url(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');

    if let Ok(ip) = host.parse::<IpAddr>() {
        return ip.is_loopback();
    }

    let host = host.to_ascii_lowercase();
    host == "localhost" || host.ends_with(".localhost")
}

fn parse_relay_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw).map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("API_CLAUDE_URL is invalid: {}", e))
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "API_CLAUDE_URL must be an absolute http(s) URL"
        )));
    }

    Ok(url)
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load(DEFAULT_PORT)?;
        Self::from_lookup(common, &process_env)
    }

    pub fn from_lookup<F>(common: core_config::Config, lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = get_env(lookup, "API_CLAUDE_URL", None)?
            .trim()
            .trim_end_matches('/')
            .to_string();
        let relay_url = parse_relay_url(&base_url)?;
        let auth = UpstreamAuth::from_lookup(lookup, &relay_url)?;

        Ok(GatewayConfig {
            common,
            relay: RelaySettings {
                base_url,
                timeout_seconds: get_nonzero_env(
                    lookup,
                    "UPSTREAM_TIMEOUT_SECONDS",
                    DEFAULT_UPSTREAM_TIMEOUT_SECONDS,
                )?,
            },
            auth,
            identity: IdentitySettings {
                metadata_url: get_env(
                    lookup,
                    "METADATA_IDENTITY_URL",
                    Some(DEFAULT_METADATA_IDENTITY_URL),
                )?,
                timeout_seconds: get_nonzero_env(
                    lookup,
                    "IDENTITY_TIMEOUT_SECONDS",
                    DEFAULT_IDENTITY_TIMEOUT_SECONDS,
                )?,
            },
            static_dir: PathBuf::from(get_env(lookup, "STATIC_DIR", Some(DEFAULT_STATIC_DIR))?),
            rate_limit: RateLimitConfig::from_lookup(lookup)?,
        })
    }
}
