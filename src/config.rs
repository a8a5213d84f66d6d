use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

const CONFIG_FILE_STEM: &str = "gitlab-manifests";
const ENV_PREFIX: &str = "GITLAB_MANIFESTS";

/// Main configuration structure for gitlab-manifests
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitLab connection and target project
    pub gitlab: GitLabConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GitLabConfig {
    /// Server URL; `/api/v4/` is appended when missing
    pub url: String,
    /// Personal access token (can be set via env var)
    pub token: Option<String>,
    /// Numeric id of the group that owns the project
    pub group_id: Option<u64>,
    /// Group path, used to address repository files
    pub group_name: String,
    /// Project the session operates on
    pub project_name: String,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or `EnvFilter` directive
    pub log_level: String,
    /// Emit JSON log lines instead of plain text
    pub json_logs: bool,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            url: "https://gitlab.com".to_string(),
            token: None, // Will be read from env var
            group_id: None,
            group_name: String::new(),
            project_name: String::new(),
            timeout_seconds: 30,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. `gitlab-manifests.toml` in the working directory
    /// 3. The explicit `path`, if given
    /// 4. Environment variables (prefixed with GITLAB_MANIFESTS_, `__` between sections)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new(&format!("{CONFIG_FILE_STEM}.toml")).exists() {
            builder = builder.add_source(File::with_name(CONFIG_FILE_STEM));
        }

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        // Fall back to the token variable GitLab tooling conventionally uses
        if app_config.gitlab.token.is_none() {
            if let Ok(token) = std::env::var("GITLAB_TOKEN") {
                app_config.gitlab.token = Some(token);
            }
        }

        Ok(app_config)
    }

    /// Copy with the access token masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.gitlab.token.is_some() {
            copy.gitlab.token = Some("********".to_string());
        }
        copy
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load .env file if it exists; returns whether one was loaded.
    ///
    /// Runs before telemetry is up, so callers log the outcome themselves.
    pub fn load_env_file() -> Result<bool> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            return Ok(true);
        }
        Ok(false)
    }
}
