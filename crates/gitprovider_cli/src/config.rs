//! Configuration file support for the gitprovider CLI.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables: `GITPROVIDER_GITLAB_HOST`, `GITPROVIDER_GITLAB_TOKEN`,
//!    and `GITPROVIDER_<SECTION>__<KEY>` for everything else
//!    (e.g., `GITPROVIDER_CLIENT__CONDITIONAL_REQUESTS=true`)
//! 3. Config file (~/.config/gitprovider/config.toml or ./gitprovider.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [gitlab]
//! host = "gitlab.com"  # or self-hosted instance
//! token = "glpat-..."  # or use GITPROVIDER_GITLAB_TOKEN env var
//!
//! [client]
//! conditional_requests = true
//! destructive_calls = false
//! retry_delay_ms = 2000
//! max_attempts = 3
//! timeout_secs = 30
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use gitprovider::platform::{ClientOptions, DEFAULT_DOMAIN};
use gitprovider::retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};
use gitprovider::RetryConfig;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitLab configuration.
    pub gitlab: GitLabConfig,
    /// Client behavior.
    pub client: ClientConfig,
}

/// GitLab configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitLabConfig {
    /// GitLab host (e.g., "gitlab.com" or "https://gitlab.example.com").
    /// Can also be set via GITPROVIDER_GITLAB_HOST environment variable.
    pub host: Option<String>,
    /// GitLab API token (personal access token).
    /// Can also be set via GITPROVIDER_GITLAB_TOKEN environment variable.
    pub token: Option<String>,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            host: Some(DEFAULT_DOMAIN.to_string()),
            token: None,
        }
    }
}

/// Client behavior shared by every command.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Revalidate repeated reads with ETags instead of refetching.
    pub conditional_requests: bool,
    /// Allow repository deletion.
    pub destructive_calls: bool,
    pub retry_delay_ms: u64,
    pub max_attempts: usize,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            conditional_requests: false,
            destructive_calls: false,
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/gitprovider/config.toml)
    /// 3. Local config file (./gitprovider.toml)
    /// 4. Environment variables with GITPROVIDER_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = Self::default_config_path()
            && path.exists()
        {
            tracing::debug!("Loading config from {:?}", path);
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let local_config = PathBuf::from("gitprovider.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./gitprovider.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // GITPROVIDER_CLIENT__MAX_ATTEMPTS -> client.max_attempts
        builder = builder.add_source(
            Environment::with_prefix("GITPROVIDER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config.with_gitlab_env(),
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default().with_gitlab_env()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default().with_gitlab_env()
            }
        }
    }

    /// Apply `GITPROVIDER_GITLAB_HOST` and `GITPROVIDER_GITLAB_TOKEN`.
    ///
    /// Single-underscore names cannot be split into sections by the
    /// environment source, so they are read directly.
    fn with_gitlab_env(mut self) -> Self {
        if let Ok(host) = std::env::var("GITPROVIDER_GITLAB_HOST") {
            self.gitlab.host = Some(host);
        }
        if let Ok(token) = std::env::var("GITPROVIDER_GITLAB_TOKEN") {
            self.gitlab.token = Some(token);
        }
        self
    }

    /// Get the GitLab host.
    pub fn gitlab_host(&self) -> String {
        self.gitlab
            .host
            .clone()
            .unwrap_or_else(|| DEFAULT_DOMAIN.to_string())
    }

    /// Get the GitLab token.
    pub fn gitlab_token(&self) -> Option<String> {
        self.gitlab.token.clone()
    }

    /// Client options for `host`.
    pub fn client_options(&self, host: String) -> ClientOptions {
        ClientOptions::default()
            .with_domain(host)
            .with_conditional_requests(self.client.conditional_requests)
            .with_destructive_calls(self.client.destructive_calls)
            .with_retry(RetryConfig::new(
                Duration::from_millis(self.client.retry_delay_ms),
                self.client.max_attempts.max(1),
            ))
            .with_timeout(Duration::from_secs(self.client.timeout_secs))
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gitprovider").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
