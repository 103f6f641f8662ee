use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub github: GitHubConfig,
    pub content: ContentConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

#[derive(Deserialize, Clone)]
pub struct GitHubConfig {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
    /// Alternative API root (GitHub Enterprise).
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub app_id: Option<u64>,
    #[serde(default)]
    pub private_key_path: Option<PathBuf>,
    #[serde(default)]
    pub installation_id: Option<u64>,
}

// Manual Debug impl to avoid leaking the token
impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("base_branch", &self.base_branch)
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("app_id", &self.app_id)
            .field("private_key_path", &self.private_key_path)
            .field("installation_id", &self.installation_id)
            .finish()
    }
}

/// How the bot authenticates against GitHub.
#[derive(Debug, Clone, Copy)]
pub enum Credential<'a> {
    /// Personal access token or a pre-minted installation token.
    Token(&'a str),
    /// GitHub App, exchanged for an installation token at startup.
    App {
        app_id: u64,
        private_key_path: &'a Path,
        installation_id: u64,
    },
}

impl GitHubConfig {
    pub fn credential(&self) -> Result<Credential<'_>> {
        if let Some(token) = self.token.as_deref().filter(|t| !t.trim().is_empty()) {
            return Ok(Credential::Token(token));
        }

        match (self.app_id, &self.private_key_path, self.installation_id) {
            (Some(app_id), Some(private_key_path), Some(installation_id)) => Ok(Credential::App {
                app_id,
                private_key_path,
                installation_id,
            }),
            (None, None, None) => Err(AppError::Config(
                "no GitHub credential: set github.token or github.app_id, github.private_key_path and github.installation_id".to_string(),
            )),
            _ => Err(AppError::Config(
                "incomplete GitHub App credential: app_id, private_key_path and installation_id are all required".to_string(),
            )),
        }
    }

    pub fn repo_full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    /// Repository directory every content item is written under.
    pub base_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub endpoint_en: String,
    pub endpoint_fr: String,
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DispatchConfig {
    /// Directory the published content is materialized into after a PR opens.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_base_branch() -> String {
    "main".to_string()
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Load from file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        } else {
            builder = builder.add_source(config::File::with_name("pr-bot").required(false));
        }

        // Environment variable overrides with PR_BOT_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("PR_BOT")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail later, after network calls began.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("github.owner", &self.github.owner),
            ("github.repo", &self.github.repo),
            ("github.base_branch", &self.github.base_branch),
            ("content.base_dir", &self.content.base_dir),
            ("source.endpoint_en", &self.source.endpoint_en),
            ("source.endpoint_fr", &self.source.endpoint_fr),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!("{key} must not be empty")));
            }
        }

        if self.content.base_dir.trim_matches('/').is_empty() {
            return Err(AppError::Config(
                "content.base_dir must name a directory inside the repository".to_string(),
            ));
        }

        for (key, endpoint) in [
            ("source.endpoint_en", &self.source.endpoint_en),
            ("source.endpoint_fr", &self.source.endpoint_fr),
        ] {
            if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
                return Err(AppError::Config(format!(
                    "{key} must be an http(s) URL, got: {endpoint}"
                )));
            }
        }

        self.github.credential()?;
        Ok(())
    }
}
