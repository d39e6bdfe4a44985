// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    2
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdminConfig {
    #[serde(default = "default_admin_path")]
    pub path: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            path: default_admin_path(),
        }
    }
}

fn default_admin_path() -> String {
    "/admin".to_string()
}

/// Google OAuth settings plus the single-entry moderator allow-list.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    pub google_client_id: String,
    #[serde(default)]
    pub google_client_secret: String,
    pub redirect_uri: String,
    pub moderator_email: String,
    #[serde(default = "default_session_days")]
    pub session_days: i64,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    #[serde(default = "default_userinfo_endpoint")]
    pub userinfo_endpoint: String,
}

fn default_session_days() -> i64 {
    7
}

fn default_token_endpoint() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_userinfo_endpoint() -> String {
    "https://www.googleapis.com/oauth2/v1/userinfo".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RenderingConfig {
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            posts_per_page: default_posts_per_page(),
        }
    }
}

fn default_posts_per_page() -> usize {
    20
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub rendering: RenderingConfig,
}

/// Configuration after validation; the only form handlers ever see.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub admin: AdminConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub rendering: RenderingConfig,
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join("config.yaml");
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        let config: Config = serde_yaml::from_str(&config_content).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        Self::load(root)?.validate()
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.server.host.is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must not be 0".to_string(),
            ));
        }
        if self.server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be at least 1".to_string(),
            ));
        }

        if !self.admin.path.starts_with('/') || self.admin.path.len() < 2 {
            return Err(ConfigError::ValidationError(format!(
                "admin.path must start with '/' and name a prefix, got '{}'",
                self.admin.path
            )));
        }
        if self.admin.path == "/login" || self.admin.path.starts_with("/login/") {
            return Err(ConfigError::ValidationError(
                "admin.path must not shadow the login routes".to_string(),
            ));
        }

        if self.auth.google_client_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.google_client_id must not be empty".to_string(),
            ));
        }
        if !self.auth.redirect_uri.starts_with("http://")
            && !self.auth.redirect_uri.starts_with("https://")
        {
            return Err(ConfigError::ValidationError(format!(
                "auth.redirect_uri must be an absolute http(s) URL, got '{}'",
                self.auth.redirect_uri
            )));
        }
        if !self.auth.moderator_email.contains('@') {
            return Err(ConfigError::ValidationError(format!(
                "auth.moderator_email must be an email address, got '{}'",
                self.auth.moderator_email
            )));
        }
        if self.auth.session_days < 1 {
            return Err(ConfigError::ValidationError(
                "auth.session_days must be at least 1".to_string(),
            ));
        }
        if self.rendering.posts_per_page == 0 {
            return Err(ConfigError::ValidationError(
                "rendering.posts_per_page must be at least 1".to_string(),
            ));
        }

        Ok(ValidatedConfig {
            server: self.server,
            app: self.app,
            admin: self.admin,
            auth: self.auth,
            logging: self.logging,
            rendering: self.rendering,
        })
    }
}

impl ValidatedConfig {
    /// Whether session cookies should carry the `Secure` attribute.
    /// Follows the scheme the provider redirects back to.
    pub fn cookies_secure(&self) -> bool {
        self.auth.redirect_uri.starts_with("https://")
    }
}

#[cfg(test)]
pub fn test_config() -> ValidatedConfig {
    ValidatedConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: 1,
        },
        app: AppConfig {
            name: "Test Folio".to_string(),
            description: "Test instance".to_string(),
        },
        admin: AdminConfig::default(),
        auth: AuthConfig {
            google_client_id: "test-client".to_string(),
            google_client_secret: "test-secret".to_string(),
            redirect_uri: "http://127.0.0.1:8080/login/google/callback".to_string(),
            moderator_email: "owner@example.com".to_string(),
            session_days: 7,
            token_endpoint: default_token_endpoint(),
            userinfo_endpoint: default_userinfo_endpoint(),
        },
        logging: LoggingConfig::default(),
        rendering: RenderingConfig::default(),
    }
}
