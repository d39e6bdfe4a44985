// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{BootstrapError, log_action};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_WORKERS: u16 = 2;

pub fn ensure_config(root: &Path) -> Result<bool, BootstrapError> {
    let root_path = normalize_root(root)?;
    let config_path = root_path.join("config.yaml");

    if config_path.exists() {
        return Ok(false);
    }

    let contents = default_config_yaml();

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    log_action(format!(
        "created config.yaml (http {}); fill in the auth section before going live",
        DEFAULT_PORT
    ));

    Ok(true)
}

fn normalize_root(root: &Path) -> Result<PathBuf, BootstrapError> {
    let root_path = if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root.to_path_buf()
    };

    if root_path.exists() {
        if !root_path.is_dir() {
            return Err(BootstrapError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Runtime root is not a directory: {}", root_path.display()),
            )));
        }
        return Ok(root_path);
    }

    fs::create_dir_all(&root_path)?;
    log_action(format!(
        "created runtime root directory {}",
        root_path.display()
    ));
    Ok(root_path)
}

fn default_config_yaml() -> String {
    format!(
        "server:\n  host: \"127.0.0.1\"\n  port: {port}\n  workers: {workers}\n\napp:\n  name: \"Folio\"\n  description: \"Personal portfolio, resume and blog\"\n\nadmin:\n  path: \"/admin\"\n\nauth:\n  google_client_id: \"replace-me.apps.googleusercontent.com\"\n  google_client_secret: \"\"\n  redirect_uri: \"http://127.0.0.1:{port}/login/google/callback\"\n  moderator_email: \"you@example.com\"\n  session_days: 7\n\nlogging:\n  level: \"info\"\n\nrendering:\n  posts_per_page: 20\n",
        port = DEFAULT_PORT,
        workers = DEFAULT_WORKERS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses_and_validates() {
        let yaml = default_config_yaml();
        let config: crate::config::Config = serde_yaml::from_str(&yaml).expect("parse");
        let validated = config.validate().expect("validate");
        assert_eq!(validated.server.port, DEFAULT_PORT);
        assert_eq!(validated.auth.session_days, 7);
    }
}
