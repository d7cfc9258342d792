//! TOML configuration and endpoint credentials.
//!
//! Settings live in an optional TOML file (`--config`, default
//! `./config/passerelle.toml`). Every section has defaults, so a missing
//! file simply yields [`Config::default`].
//!
//! Credentials are resolved separately by [`resolve_credentials`]: first
//! from the secrets file, then from the environment (after loading the env
//! file). Missing either the URL or the token is fatal.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use passerelle_core::DEFAULT_MARKER;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub header: HeaderConfig,
    #[serde(default)]
    pub examples: ExamplesConfig,
    #[serde(default)]
    pub document: DocumentConfig,
}

/// Where to find the endpoint URL and bearer token.
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    #[serde(default = "default_secrets_file")]
    pub secrets_file: PathBuf,
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
    #[serde(default = "default_url_env")]
    pub url_env: String,
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            secrets_file: default_secrets_file(),
            env_file: default_env_file(),
            url_env: default_url_env(),
            token_env: default_token_env(),
        }
    }
}

fn default_secrets_file() -> PathBuf {
    PathBuf::from("config/secrets.toml")
}
fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}
fn default_url_env() -> String {
    "API_URL".to_string()
}
fn default_token_env() -> String {
    "API_TOKEN".to_string()
}

/// Per-connective generation settings.
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_temperature")]
    pub base_temperature: f32,
    #[serde(default = "default_temperature_step")]
    pub temperature_step: f32,
    #[serde(default = "default_few_shot")]
    pub few_shot: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_generation_timeout(),
            max_attempts: default_max_attempts(),
            base_temperature: default_base_temperature(),
            temperature_step: default_temperature_step(),
            few_shot: default_few_shot(),
        }
    }
}

fn default_generation_timeout() -> u64 {
    10
}
fn default_max_attempts() -> u32 {
    3
}
fn default_base_temperature() -> f32 {
    0.7
}
fn default_temperature_step() -> f32 {
    0.2
}
fn default_few_shot() -> usize {
    passerelle_core::prompt::FEW_SHOT_COUNT
}

#[derive(Debug, Deserialize, Clone)]
pub struct HeaderConfig {
    #[serde(default = "default_header_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_header_temperature")]
    pub temperature: f32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_header_timeout(),
            temperature: default_header_temperature(),
        }
    }
}

fn default_header_timeout() -> u64 {
    30
}
fn default_header_temperature() -> f32 {
    0.5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExamplesConfig {
    #[serde(default = "default_examples_path")]
    pub path: PathBuf,
}

impl Default for ExamplesConfig {
    fn default() -> Self {
        Self {
            path: default_examples_path(),
        }
    }
}

fn default_examples_path() -> PathBuf {
    PathBuf::from("transitions.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentConfig {
    #[serde(default = "default_marker")]
    pub marker: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
        }
    }
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

/// Load and validate the configuration file.
///
/// A missing file is not an error: defaults apply.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| "Failed to parse config file")?
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Config::default()
    };

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.generation.max_attempts == 0 {
        bail!("generation.max_attempts must be >= 1");
    }
    if config.generation.timeout_secs == 0 {
        bail!("generation.timeout_secs must be > 0");
    }
    if config.header.timeout_secs == 0 {
        bail!("header.timeout_secs must be > 0");
    }
    for (name, value) in [
        ("generation.base_temperature", config.generation.base_temperature),
        ("generation.temperature_step", config.generation.temperature_step),
        ("header.temperature", config.header.temperature),
    ] {
        if !(0.0..=2.0).contains(&value) {
            bail!("{} must be in [0.0, 2.0]", name);
        }
    }
    if config.document.marker.trim().is_empty() {
        bail!("document.marker must not be empty");
    }
    Ok(())
}

/// Endpoint URL and bearer token.
#[derive(Clone)]
pub struct Credentials {
    pub url: String,
    pub token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize, Default)]
struct SecretsFile {
    #[serde(rename = "API_URL")]
    api_url: Option<String>,
    #[serde(rename = "API_TOKEN")]
    api_token: Option<String>,
}

/// Resolve the endpoint credentials.
///
/// The secrets file wins when it defines the URL; otherwise the env file is
/// loaded (without overriding variables already set) and the environment is
/// read.
pub fn resolve_credentials(endpoint: &EndpointConfig) -> Result<Credentials> {
    let secrets = read_secrets(&endpoint.secrets_file)?;

    let (url, token) = if secrets.api_url.is_some() {
        (secrets.api_url, secrets.api_token)
    } else {
        if endpoint.env_file.exists() {
            dotenv::from_path(&endpoint.env_file).with_context(|| {
                format!("Failed to load env file: {}", endpoint.env_file.display())
            })?;
        }
        (
            std::env::var(&endpoint.url_env).ok(),
            std::env::var(&endpoint.token_env).ok(),
        )
    };

    let url = url.filter(|u| !u.trim().is_empty());
    let token = token.filter(|t| !t.trim().is_empty());

    match (url, token) {
        (Some(url), Some(token)) => Ok(Credentials { url, token }),
        _ => bail!(
            "API credentials not found. Set {} and {} in {} or {}, or in the environment.",
            endpoint.url_env,
            endpoint.token_env,
            endpoint.env_file.display(),
            endpoint.secrets_file.display()
        ),
    }
}

fn read_secrets(path: &Path) -> Result<SecretsFile> {
    if !path.exists() {
        return Ok(SecretsFile::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read secrets file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse secrets file: {}", path.display()))
}
