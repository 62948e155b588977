use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::str::FromStr;

/// Settings every service shares: listening port, deployment environment and
/// log level.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector; spans are exported only when set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[serde(alias = "development")]
    Dev,
    #[serde(alias = "production")]
    Prod,
}

impl Environment {
    pub fn is_prod(self) -> bool {
        self == Environment::Prod
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Dev),
            "prod" | "production" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load with the given fallback port.
    ///
    /// Sources, lowest precedence first: `configuration.*` file, `APP__*`
    /// variables, then the bare `PORT`, `ENVIRONMENT`, `LOG_LEVEL` and
    /// `OTLP_ENDPOINT` variables that hosting platforms inject.
    pub fn load(default_port: u16) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::load_with(default_port, &process_env)
    }

    /// [`Config::load`] with the bare variables resolved through `lookup`.
    pub fn load_with<F>(default_port: u16, lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Cfg::builder()
            .set_default("port", i64::from(default_port))?
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .set_override_option("port", get_optional_env(lookup, "PORT"))?
            .set_override_option(
                "environment",
                get_optional_env(lookup, "ENVIRONMENT").map(|e| e.to_lowercase()),
            )?
            .set_override_option("log_level", get_optional_env(lookup, "LOG_LEVEL"))?
            .set_override_option("otlp_endpoint", get_optional_env(lookup, "OTLP_ENDPOINT"))?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// Per-IP request ceiling applied ahead of routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests: u32,
    pub window_seconds: u64,
    /// Key on the first `x-forwarded-for` hop instead of the socket peer.
    /// Only safe behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests: 30,
            window_seconds: 60,
            trust_forwarded_for: false,
        }
    }
}

impl RateLimitConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            requests: get_parsed_env(lookup, "RATE_LIMIT_REQUESTS", defaults.requests)?,
            window_seconds: get_parsed_env(
                lookup,
                "RATE_LIMIT_WINDOW_SECONDS",
                defaults.window_seconds,
            )?,
            trust_forwarded_for: get_parsed_env(
                lookup,
                "TRUST_FORWARDED_FOR",
                defaults.trust_forwarded_for,
            )?,
        };

        if config.requests == 0 || config.window_seconds == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "RATE_LIMIT_REQUESTS and RATE_LIMIT_WINDOW_SECONDS must be positive"
            )));
        }

        Ok(config)
    }
}

/// Look up `key`, falling back to `default`. A key with no default is required.
pub fn get_env<F>(lookup: &F, key: &str, default: Option<&str>) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.is_empty()) {
        Some(val) => Ok(val),
        None => default.map(str::to_string).ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!("{} is not set", key))
        }),
    }
}

/// Look up an optional value; empty strings count as unset.
pub fn get_optional_env<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.is_empty())
}

/// Look up and parse `key`, falling back to `default`.
pub fn get_parsed_env<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_optional_env(lookup, key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("{} is invalid: {}", key, e))
        }),
        None => Ok(default),
    }
}

/// [`get_parsed_env`] for values that must be non-zero.
pub fn get_nonzero_env<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    let value = get_parsed_env(lookup, key, default)?;
    if value == T::default() {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be positive",
            key
        )));
    }
    Ok(value)
}

/// Lookup backed by the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn required_key_without_default_is_an_error() {
        let lookup = lookup_from(&[]);
        let err = get_env(&lookup, "API_CLAUDE_URL", None).unwrap_err();
        assert!(err.to_string().contains("API_CLAUDE_URL is not set"));
    }

    #[test]
    fn empty_value_falls_back_to_default() {
        let lookup = lookup_from(&[("CLAUDE_MODEL", "")]);
        let model = get_env(&lookup, "CLAUDE_MODEL", Some("fallback")).unwrap();
        assert_eq!(model, "fallback");
    }

    #[test]
    fn parsed_value_reports_key_on_failure() {
        let lookup = lookup_from(&[("CLAUDE_MAX_TOKENS", "lots")]);
        let err = get_parsed_env::<_, u32>(&lookup, "CLAUDE_MAX_TOKENS", 800).unwrap_err();
        assert!(err.to_string().contains("CLAUDE_MAX_TOKENS is invalid"));
    }

    #[test]
    fn rate_limit_defaults_to_thirty_per_minute() {
        let lookup = lookup_from(&[]);
        let limits = RateLimitConfig::from_lookup(&lookup).unwrap();
        assert_eq!(
            limits,
            RateLimitConfig {
                requests: 30,
                window_seconds: 60,
                trust_forwarded_for: false,
            }
        );
    }

    #[test]
    fn forwarded_for_trust_is_opt_in() {
        let lookup = lookup_from(&[("TRUST_FORWARDED_FOR", "true")]);
        assert!(RateLimitConfig::from_lookup(&lookup).unwrap().trust_forwarded_for);

        let lookup = lookup_from(&[("TRUST_FORWARDED_FOR", "sometimes")]);
        assert!(RateLimitConfig::from_lookup(&lookup).is_err());
    }

    #[test]
    fn nonzero_values_reject_zero() {
        let lookup = lookup_from(&[("UPSTREAM_TIMEOUT_SECONDS", "0")]);
        let err = get_nonzero_env::<_, u64>(&lookup, "UPSTREAM_TIMEOUT_SECONDS", 30).unwrap_err();
        assert!(err.to_string().contains("UPSTREAM_TIMEOUT_SECONDS must be positive"));

        let lookup = lookup_from(&[]);
        assert_eq!(
            get_nonzero_env::<_, u64>(&lookup, "UPSTREAM_TIMEOUT_SECONDS", 30).unwrap(),
            30
        );
    }

    #[test]
    fn platform_variables_override_log_level_and_otlp() {
        let lookup = lookup_from(&[
            ("PORT", "9000"),
            ("LOG_LEVEL", "debug"),
            ("OTLP_ENDPOINT", "http://tempo:4317"),
        ]);
        let config = Config::load_with(3000, &lookup).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://tempo:4317"));
    }

    #[test]
    fn defaults_apply_without_platform_variables() {
        let config = Config::load_with(3000, &lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.otlp_endpoint, None);
    }

    #[test]
    fn rate_limit_rejects_zero() {
        let lookup = lookup_from(&[("RATE_LIMIT_REQUESTS", "0")]);
        assert!(RateLimitConfig::from_lookup(&lookup).is_err());
    }

    #[test]
    fn environment_parses_common_spellings() {
        assert_eq!("PROD".parse::<Environment>(), Ok(Environment::Prod));
        assert_eq!("development".parse::<Environment>(), Ok(Environment::Dev));
        assert!("staging".parse::<Environment>().is_err());
    }
}
