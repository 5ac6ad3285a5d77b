//! Provider configuration
//!
//! Every setting can come from the provider block or, when absent there,
//! from a `CDN_*` environment variable.

use crate::api::RetryConfig;
use tfadapter::types::Config;
use tfadapter::{AttributePath, Diagnostic, Diagnostics, LogLevel, ReadPolicy};

pub const ENV_ENDPOINT: &str = "CDN_ENDPOINT";
pub const ENV_API_TOKEN: &str = "CDN_API_TOKEN";
pub const ENV_INSECURE: &str = "CDN_INSECURE";
pub const ENV_TIMEOUT_SECONDS: &str = "CDN_TIMEOUT_SECONDS";
pub const ENV_MAX_RETRIES: &str = "CDN_MAX_RETRIES";
pub const ENV_SERIALIZE_READS: &str = "CDN_SERIALIZE_READS";
pub const ENV_LOG: &str = "CDN_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub api_token: String,
    pub insecure: bool,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub serialize_reads: bool,
    /// Subscriber verbosity; None leaves logging to whoever embeds the provider
    pub log_level: Option<LogLevel>,
}

impl ProviderConfig {
    /// Resolve settings from the provider block with environment fallbacks
    pub fn resolve(config: &Config) -> Result<Self, Diagnostics> {
        let mut diags = Diagnostics::new();

        let endpoint = string_setting(config, "endpoint", ENV_ENDPOINT);
        let api_token = string_setting(config, "api_token", ENV_API_TOKEN);

        let insecure = config
            .get_bool(&AttributePath::new("insecure"))
            .ok()
            .or_else(|| env_parse(ENV_INSECURE, &mut diags))
            .unwrap_or(false);
        let timeout_seconds = number_setting(config, "timeout_seconds", &mut diags)
            .or_else(|| env_parse(ENV_TIMEOUT_SECONDS, &mut diags))
            .unwrap_or(30);
        let max_retries = number_setting(config, "max_retries", &mut diags)
            .or_else(|| env_parse(ENV_MAX_RETRIES, &mut diags))
            .unwrap_or(3);
        let serialize_reads = config
            .get_bool(&AttributePath::new("serialize_reads"))
            .ok()
            .or_else(|| env_parse(ENV_SERIALIZE_READS, &mut diags))
            .unwrap_or(false);
        let log_level = string_setting(config, "log_level", ENV_LOG).and_then(|raw| {
            match raw.parse::<LogLevel>() {
                Ok(level) => Some(level),
                Err(e) => {
                    diags.push(
                        Diagnostic::error("Invalid value for log_level", e)
                            .with_attribute(AttributePath::new("log_level")),
                    );
                    None
                }
            }
        });

        if endpoint.is_none() {
            diags.push(
                Diagnostic::error(
                    format!(
                        "endpoint is required (set in provider config or {} env var)",
                        ENV_ENDPOINT
                    ),
                    "",
                )
                .with_attribute(AttributePath::new("endpoint")),
            );
        }
        if api_token.is_none() {
            diags.push(
                Diagnostic::error(
                    format!(
                        "api_token is required (set in provider config or {} env var)",
                        ENV_API_TOKEN
                    ),
                    "",
                )
                .with_attribute(AttributePath::new("api_token")),
            );
        }
        if timeout_seconds == 0 {
            diags.add_error("timeout_seconds must be greater than zero", None::<String>);
        }

        match (endpoint, api_token) {
            (Some(endpoint), Some(api_token)) if !diags.has_errors() => Ok(Self {
                endpoint,
                api_token,
                insecure,
                timeout_seconds,
                max_retries,
                serialize_reads,
                log_level,
            }),
            _ => Err(diags),
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            timeout_seconds: self.timeout_seconds,
            ..RetryConfig::default()
        }
    }

    pub fn read_policy(&self) -> ReadPolicy {
        if self.serialize_reads {
            ReadPolicy::Serialized
        } else {
            ReadPolicy::Concurrent
        }
    }
}

fn string_setting(config: &Config, attribute: &str, env: &str) -> Option<String> {
    config
        .get_string(&AttributePath::new(attribute))
        .ok()
        .or_else(|| std::env::var(env).ok())
        .filter(|value| !value.is_empty())
}

/// Whole, non-negative number from the provider block
fn number_setting<T: TryFrom<u64>>(config: &Config, attribute: &str, diags: &mut Diagnostics) -> Option<T> {
    let path = AttributePath::new(attribute);
    let value = config.get_number(&path).ok()?;
    let whole = (value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64)
        .then_some(value as u64)
        .and_then(|n| T::try_from(n).ok());
    if whole.is_none() {
        diags.push(
            Diagnostic::error(
                format!("Invalid value for {}", attribute),
                format!("expected a whole, non-negative number, got {}", value),
            )
            .with_attribute(path),
        );
    }
    whole
}

fn env_parse<T: std::str::FromStr>(env: &str, diags: &mut Diagnostics) -> Option<T> {
    let raw = std::env::var(env).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            diags.add_error(
                format!("Invalid value for {}", env),
                Some(format!("could not parse '{}'", raw)),
            );
            None
        }
    }
}
