//! Configuration management using the prefer crate for discovery.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Where the verification services live and how to reach them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL shared by all services
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Document text extraction endpoint (multipart upload)
    #[serde(default = "default_extract_path")]
    pub extract_path: String,
    /// AI-generation detection endpoint
    #[serde(default = "default_ai_detection_path")]
    pub ai_detection_path: String,
    /// Plagiarism similarity endpoint
    #[serde(default = "default_plagiarism_path")]
    pub plagiarism_path: String,
    /// Timeout applied to every remote call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token sent with every request, if the deployment requires one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}
fn default_extract_path() -> String {
    "/api/upload-pdf/".to_string()
}
fn default_ai_detection_path() -> String {
    "/api/detect-ai/".to_string()
}
// The deployed service still exposes plagiarism under its scaffold name.
fn default_plagiarism_path() -> String {
    "/api/hello-world/".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!("contentverify/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            extract_path: default_extract_path(),
            ai_detection_path: default_ai_detection_path(),
            plagiarism_path: default_plagiarism_path(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ServiceConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Join the base URL and an endpoint path without doubling slashes.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `VERIFY_BASE_URL`: base URL of the services
    /// - `VERIFY_EXTRACT_PATH`, `VERIFY_AI_PATH`, `VERIFY_PLAGIARISM_PATH`: endpoint paths
    /// - `VERIFY_TIMEOUT_SECS`: request timeout
    /// - `VERIFY_API_KEY`: bearer token
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("VERIFY_BASE_URL") {
            self.base_url = val;
        }
        if let Ok(val) = std::env::var("VERIFY_EXTRACT_PATH") {
            self.extract_path = val;
        }
        if let Ok(val) = std::env::var("VERIFY_AI_PATH") {
            self.ai_detection_path = val;
        }
        if let Ok(val) = std::env::var("VERIFY_PLAGIARISM_PATH") {
            self.plagiarism_path = val;
        }
        if let Ok(val) = std::env::var("VERIFY_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.timeout_secs = n;
            }
        }
        if let Ok(val) = std::env::var("VERIFY_API_KEY") {
            if !val.is_empty() {
                self.api_key = Some(val);
            }
        }
        self
    }
}

/// Session behaviour that is not part of the service contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long a finished extraction keeps the progress indicator at 100%
    #[serde(default = "default_progress_hold_ms")]
    pub progress_hold_ms: u64,
}

fn default_progress_hold_ms() -> u64 {
    1000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            progress_hold_ms: default_progress_hold_ms(),
        }
    }
}

impl SessionConfig {
    pub fn progress_hold(&self) -> Duration {
        Duration::from_millis(self.progress_hold_ms)
    }

    /// Apply `VERIFY_PROGRESS_HOLD_MS` if set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("VERIFY_PROGRESS_HOLD_MS") {
            if let Ok(n) = val.parse() {
                self.progress_hold_ms = n;
            }
        }
        self
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub session: SessionConfig,
    /// Path the config was loaded from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer for discovery.
    /// Falls back to defaults with env overrides when no file is found or it fails to parse.
    pub async fn load() -> Self {
        match prefer::load("contentverify").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("{}; using defaults", e);
                            Self::default_with_env()
                        }
                    }
                } else {
                    Self::default_with_env()
                }
            }
            Err(_) => Self::default_with_env(),
        }
    }

    /// Defaults with environment variable overrides applied.
    pub fn default_with_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Self {
        self.service = self.service.with_env_overrides();
        self.session = self.session.with_env_overrides();
        self
    }

    /// Load configuration from a specific file path.
    /// Supports TOML, YAML and JSON based on the file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let mut config = Self::parse(path, &contents)?;
        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config.with_env_overrides())
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_err = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        match ext {
            "toml" => toml::from_str(contents).map_err(|e| parse_err(e.to_string())),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| parse_err(e.to_string())),
            _ => serde_json::from_str(contents).map_err(|e| parse_err(e.to_string())),
        }
    }
}
