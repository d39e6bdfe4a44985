// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::config::{Config, ConfigError, ValidatedConfig};
use crate::runtime_paths::RuntimePaths;
use std::error::Error;
use std::fmt;
use std::path::Path;

pub mod config;
pub mod content;

#[derive(Debug)]
pub struct BootstrapResult {
    pub validated_config: ValidatedConfig,
    pub runtime_paths: RuntimePaths,
    pub created_config: bool,
    pub created_content: bool,
}

#[derive(Debug)]
pub enum BootstrapError {
    Config(ConfigError),
    Io(std::io::Error),
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::Config(err) => write!(f, "{}", err),
            BootstrapError::Io(err) => write!(f, "Bootstrap I/O error: {}", err),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BootstrapError::Config(err) => Some(err),
            BootstrapError::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for BootstrapError {
    fn from(err: ConfigError) -> Self {
        BootstrapError::Config(err)
    }
}

impl From<std::io::Error> for BootstrapError {
    fn from(err: std::io::Error) -> Self {
        BootstrapError::Io(err)
    }
}

pub fn bootstrap_runtime(root: &Path) -> Result<BootstrapResult, BootstrapError> {
    let created_config = config::ensure_config(root)?;

    let validated_config = Config::load_and_validate(root).map_err(BootstrapError::Config)?;

    let runtime_paths = RuntimePaths::from_root(root)?;

    let created_content = content::ensure_content(&runtime_paths)?;

    // env_logger is not up yet, so startup warnings go to stderr directly.
    for warning in startup_warnings(&validated_config) {
        log_action(warning);
    }

    Ok(BootstrapResult {
        validated_config,
        runtime_paths,
        created_config,
        created_content,
    })
}

fn startup_warnings(config: &ValidatedConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if config.auth.google_client_secret.is_empty() {
        warnings.push(
            "auth.google_client_secret is empty; the OAuth code exchange will fail".to_string(),
        );
    }
    warnings
}

pub(crate) fn log_action(message: impl AsRef<str>) {
    eprintln!("[bootstrap] {}", message.as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::PortfolioData;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn bootstrap_creates_defaults_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let result = bootstrap_runtime(tmp.path()).expect("bootstrap should succeed");

        assert!(result.created_config);
        assert!(result.created_content);

        assert_eq!(result.validated_config.server.port, 8080);
        assert_eq!(result.validated_config.admin.path, "/admin");
        assert_eq!(result.validated_config.auth.session_days, 7);

        assert!(tmp.path().join("config.yaml").is_file());
        assert!(tmp.path().join("posts").join("hello-world.md").is_file());
        assert!(tmp.path().join("data").join("intro.yaml").is_file());
        assert!(tmp.path().join("data").join("skills.yaml").is_file());
        assert!(tmp.path().join("data").join("projects.yaml").is_file());

        // The seeded data must load through the real loaders.
        let data = PortfolioData::load(&result.runtime_paths.data_dir).expect("portfolio data");
        assert!(!data.intro.name.is_empty());
        assert!(!data.skills.is_empty());
        assert!(!data.projects.is_empty());
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let tmp = TempDir::new().expect("tempdir");
        let first = bootstrap_runtime(tmp.path()).expect("bootstrap should succeed");
        assert!(first.created_config);
        assert!(first.created_content);

        let config_path = tmp.path().join("config.yaml");
        let post_path = tmp.path().join("posts").join("hello-world.md");
        let intro_path = tmp.path().join("data").join("intro.yaml");

        let config_before = fs::read_to_string(&config_path).unwrap();
        let post_before = fs::read_to_string(&post_path).unwrap();
        let intro_before = fs::read_to_string(&intro_path).unwrap();

        let second = bootstrap_runtime(tmp.path()).expect("bootstrap should succeed");
        assert!(!second.created_config);
        assert!(!second.created_content);

        assert_eq!(config_before, fs::read_to_string(&config_path).unwrap());
        assert_eq!(post_before, fs::read_to_string(&post_path).unwrap());
        assert_eq!(intro_before, fs::read_to_string(&intro_path).unwrap());
    }

    #[test]
    fn warns_when_client_secret_is_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let result = bootstrap_runtime(tmp.path()).expect("bootstrap should succeed");

        // The generated default config ships with an empty secret.
        assert!(result.validated_config.auth.google_client_secret.is_empty());
        let warnings = startup_warnings(&result.validated_config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("google_client_secret"));

        let mut config = result.validated_config;
        config.auth.google_client_secret = "secret".to_string();
        assert!(startup_warnings(&config).is_empty());
    }

    #[test]
    fn bootstrap_keeps_existing_config() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp.path().join("config.yaml");
        let config = r#"server:
  host: "127.0.0.1"
  port: 9090
  workers: 1

app:
  name: "Custom"
  description: "Custom instance"

auth:
  google_client_id: "custom-client"
  redirect_uri: "http://127.0.0.1:9090/login/google/callback"
  moderator_email: "me@example.com"
"#;
        fs::write(&config_path, config).unwrap();

        let result = bootstrap_runtime(tmp.path()).expect("bootstrap should succeed");
        assert!(!result.created_config);
        assert_eq!(result.validated_config.server.port, 9090);
        assert_eq!(config, fs::read_to_string(&config_path).unwrap());
    }
}
