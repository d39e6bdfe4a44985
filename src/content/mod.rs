// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

mod store;

pub use store::PostStore;

/// YAML front matter carried by every post file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

/// A full post, front matter plus markdown body.
#[derive(Debug, Clone)]
pub struct Post {
    pub slug: String,
    pub front: FrontMatter,
    pub body: String,
}

#[derive(Debug)]
pub enum ContentError {
    NotFound(String),
    InvalidSlug(String),
    InvalidFrontMatter(String),
    Io(std::io::Error),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::NotFound(slug) => write!(f, "Post not found: {}", slug),
            ContentError::InvalidSlug(slug) => write!(f, "Invalid post slug: {}", slug),
            ContentError::InvalidFrontMatter(msg) => {
                write!(f, "Invalid post front matter: {}", msg)
            }
            ContentError::Io(err) => write!(f, "Content I/O error: {}", err),
        }
    }
}

impl Error for ContentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ContentError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ContentError {
    fn from(err: std::io::Error) -> Self {
        ContentError::Io(err)
    }
}

/// Slugs double as URL segments and file stems, so the charset is strict:
/// lowercase ASCII alphanumerics and single hyphens, never at the edges.
pub fn validate_slug(slug: &str) -> Result<(), ContentError> {
    if slug.is_empty() || slug.len() > 128 {
        return Err(ContentError::InvalidSlug(slug.to_string()));
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(ContentError::InvalidSlug(slug.to_string()));
    }
    if !slug
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
    {
        return Err(ContentError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

/// Derive a slug from a post title. Returns None when nothing usable remains.
pub fn slugify(title: &str) -> Option<String> {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;
    for ch in title.chars() {
        let lowered = ch.to_ascii_lowercase();
        if lowered.is_ascii_lowercase() || lowered.is_ascii_digit() {
            slug.push(lowered);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    slug.truncate(128);
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() { None } else { Some(slug) }
}
