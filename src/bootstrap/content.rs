// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{BootstrapError, log_action};
use crate::portfolio::{INTRO_FILE, PROJECTS_FILE, SKILLS_FILE};
use crate::runtime_paths::RuntimePaths;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

const SAMPLE_POST_FILE: &str = "hello-world.md";

const DEFAULT_INTRO_YAML: &str = r#"name: "Your Name"
title: "Software Engineer"
tagline: "I build <sb>reliable</sb> software"
about:
  - "Replace this with a short introduction."
  - "Values here may use <sb>strong</sb>, <code>code</code> and <link href=\"https://example.com\">link</link> tags."
contacts:
  - label: "GitHub"
    href: "https://github.com/your-handle"
  - label: "Email"
    href: "mailto:you@example.com"
"#;

const DEFAULT_SKILLS_YAML: &str = r#"- category: "Languages"
  items:
    - "Rust"
    - "TypeScript"
- category: "Infrastructure"
  items:
    - "Linux"
    - "PostgreSQL"
"#;

const DEFAULT_PROJECTS_YAML: &str = r#"- title: "Folio"
  period: "2026 - present"
  summary:
    - "This site. A single binary serving a portfolio, resume and blog."
  stack:
    - "Rust"
    - "actix-web"
  links:
    - label: "Source"
      href: "https://example.com/folio"
  troubleshooting: []
  insights: []
"#;

pub fn ensure_content(runtime_paths: &RuntimePaths) -> Result<bool, BootstrapError> {
    let mut created_any = false;

    let sample_post = default_sample_post();
    created_any |= write_if_missing(
        &runtime_paths.posts_dir.join(SAMPLE_POST_FILE),
        &sample_post,
        "sample post posts/hello-world.md",
    )?;
    created_any |= write_if_missing(
        &runtime_paths.data_dir.join(INTRO_FILE),
        DEFAULT_INTRO_YAML,
        "data/intro.yaml",
    )?;
    created_any |= write_if_missing(
        &runtime_paths.data_dir.join(SKILLS_FILE),
        DEFAULT_SKILLS_YAML,
        "data/skills.yaml",
    )?;
    created_any |= write_if_missing(
        &runtime_paths.data_dir.join(PROJECTS_FILE),
        DEFAULT_PROJECTS_YAML,
        "data/projects.yaml",
    )?;

    Ok(created_any)
}

fn write_if_missing(path: &Path, contents: &str, label: &str) -> Result<bool, BootstrapError> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    log_action(format!("created {}", label));
    Ok(true)
}

fn default_sample_post() -> String {
    let today = chrono::Utc::now().date_naive();
    format!(
        "---\ntitle: Hello, world\ndate: {}\ntags:\n  - meta\npublished: true\n---\n\nWelcome to your new site. This post lives in `posts/hello-world.md`;\nedit or delete it from the admin dashboard.\n",
        today
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostStore;
    use tempfile::TempDir;

    #[test]
    fn sample_post_parses_through_the_store() {
        let tmp = TempDir::new().expect("tempdir");
        std::fs::write(
            tmp.path().join(SAMPLE_POST_FILE),
            default_sample_post(),
        )
        .expect("write");

        let store = PostStore::new(tmp.path().to_path_buf());
        let post = store.load("hello-world").expect("load sample post");
        assert_eq!(post.front.title, "Hello, world");
        assert!(post.front.published);
        assert_eq!(post.front.tags, vec!["meta"]);
    }
}
