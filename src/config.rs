//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.skillgap.toml` files, and resolving the analyzer settings
//! (endpoint, credentials, sampling parameters) used for a run.

use crate::analyzer::AnalyzerConfig;
use crate::prompt::DEFAULT_SYSTEM_PROMPT;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = ".skillgap.toml";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "AZURE_OPENAI_API_KEY";

/// Environment variable holding the chat-completion endpoint URL.
pub const ENDPOINT_ENV: &str = "AZURE_OPENAI_ENDPOINT";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Endpoint credentials. Command-line flags and environment variables
    /// take precedence.
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Path of the response file.
    #[serde(default = "default_input")]
    pub input: String,

    /// Path of the analysis output file.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_input() -> String {
    "./data.json".to_string()
}

fn default_output() -> String {
    "overall_analysis.txt".to_string()
}

/// Chat-completion request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// System role message.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Maximum tokens in response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling threshold.
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.9
}

/// Endpoint URL and API key, as found in a secrets-style config table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments (and the environment variables clap reads for them)
    /// take precedence, but only when they were actually provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input) = args.input {
            self.general.input = input.display().to_string();
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if args.verbose {
            self.general.verbose = true;
        }

        if let Some(max_tokens) = args.max_tokens {
            self.model.max_tokens = max_tokens;
        }
        if let Some(temperature) = args.temperature {
            self.model.temperature = temperature;
        }
        if let Some(top_p) = args.top_p {
            self.model.top_p = top_p;
        }

        if let Some(ref endpoint) = args.endpoint {
            self.credentials.endpoint = Some(endpoint.clone());
        }
        if let Some(ref api_key) = args.api_key {
            self.credentials.api_key = Some(api_key.clone());
        }
    }

    /// Check the sampling parameters.
    pub fn validate(&self) -> Result<()> {
        if self.model.max_tokens == 0 {
            bail!("max_tokens must be at least 1");
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            bail!("Temperature must be between 0.0 and 2.0");
        }
        if !(0.0..=1.0).contains(&self.model.top_p) {
            bail!("top_p must be between 0.0 and 1.0");
        }
        Ok(())
    }

    /// Build the analyzer configuration, failing if credentials are missing.
    pub fn analyzer_config(&self) -> Result<AnalyzerConfig> {
        let endpoint = match non_blank(&self.credentials.endpoint) {
            Some(endpoint) => endpoint,
            None => bail!(
                "Missing endpoint: set {} or [credentials].endpoint in {}",
                ENDPOINT_ENV,
                DEFAULT_CONFIG_FILE
            ),
        };
        let api_key = match non_blank(&self.credentials.api_key) {
            Some(key) => key,
            None => bail!(
                "Missing API key: set {} or [credentials].api_key in {}",
                API_KEY_ENV,
                DEFAULT_CONFIG_FILE
            ),
        };

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            bail!("Endpoint URL must start with 'http://' or 'https://'");
        }

        Ok(AnalyzerConfig {
            system_prompt: self.model.system_prompt.clone(),
            max_tokens: self.model.max_tokens,
            temperature: self.model.temperature,
            top_p: self.model.top_p,
            ..AnalyzerConfig::new(endpoint, api_key)
        })
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
