// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{ContentError, FrontMatter, Post, validate_slug};
use gray_matter::Matter;
use gray_matter::engine::YAML;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File-backed post store. Each post is `<slug>.md` in the posts directory,
/// YAML front matter followed by the markdown body.
#[derive(Clone)]
pub struct PostStore {
    posts_dir: PathBuf,
}

impl PostStore {
    pub fn new(posts_dir: PathBuf) -> Self {
        Self { posts_dir }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    fn post_path(&self, slug: &str) -> Result<PathBuf, ContentError> {
        validate_slug(slug)?;
        Ok(self.posts_dir.join(format!("{}.md", slug)))
    }

    pub fn exists(&self, slug: &str) -> Result<bool, ContentError> {
        Ok(self.post_path(slug)?.is_file())
    }

    pub fn load(&self, slug: &str) -> Result<Post, ContentError> {
        let path = self.post_path(slug)?;
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ContentError::NotFound(slug.to_string()));
            }
            Err(err) => return Err(ContentError::Io(err)),
        };
        parse_post(slug, &raw)
    }

    /// List posts sorted newest-first. Drafts are only included when asked for.
    pub fn list(&self, include_drafts: bool) -> Result<Vec<Post>, ContentError> {
        let mut posts = Vec::new();
        let entries = match fs::read_dir(&self.posts_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(posts),
            Err(err) => return Err(ContentError::Io(err)),
        };

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
                continue;
            }
            let slug = match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            if validate_slug(&slug).is_err() {
                log::warn!("Skipping post file with invalid slug: {}", path.display());
                continue;
            }
            let raw = fs::read_to_string(&path)?;
            match parse_post(&slug, &raw) {
                Ok(post) => {
                    if include_drafts || post.front.published {
                        posts.push(post);
                    }
                }
                Err(err) => {
                    log::warn!("Skipping unreadable post {}: {}", path.display(), err);
                }
            }
        }

        posts.sort_by(|a, b| {
            b.front
                .date
                .cmp(&a.front.date)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        Ok(posts)
    }

    /// Write a post atomically: temp file in the same directory, then rename.
    pub fn save(&self, post: &Post) -> Result<(), ContentError> {
        let path = self.post_path(&post.slug)?;
        let serialized = serialize_post(&post.front, &post.body)?;

        let tmp_name = format!(".{}.tmp-{}", post.slug, Uuid::new_v4());
        let tmp_path = self.posts_dir.join(tmp_name);
        fs::write(&tmp_path, serialized.as_bytes())?;
        if let Err(err) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ContentError::Io(err));
        }
        Ok(())
    }

    pub fn delete(&self, slug: &str) -> Result<(), ContentError> {
        let path = self.post_path(slug)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(ContentError::NotFound(slug.to_string()))
            }
            Err(err) => Err(ContentError::Io(err)),
        }
    }
}

fn parse_post(slug: &str, raw: &str) -> Result<Post, ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed = matter.parse_with_struct::<FrontMatter>(raw).ok_or_else(|| {
        ContentError::InvalidFrontMatter(format!("missing or malformed front matter in '{}'", slug))
    })?;
    Ok(Post {
        slug: slug.to_string(),
        front: parsed.data,
        body: parsed.content,
    })
}

fn serialize_post(front: &FrontMatter, body: &str) -> Result<String, ContentError> {
    let yaml = serde_yaml::to_string(front)
        .map_err(|err| ContentError::InvalidFrontMatter(err.to_string()))?;
    Ok(format!("---\n{}---\n\n{}", yaml, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn store() -> (TempDir, PostStore) {
        let tmp = TempDir::new().expect("tempdir");
        let store = PostStore::new(tmp.path().to_path_buf());
        (tmp, store)
    }

    fn sample_post(slug: &str, date: &str, published: bool) -> Post {
        Post {
            slug: slug.to_string(),
            front: FrontMatter {
                title: format!("Title for {}", slug),
                date: date.parse::<NaiveDate>().expect("date"),
                tags: vec!["rust".to_string()],
                published,
            },
            body: "Hello **world**.\n".to_string(),
        }
    }

    #[test]
    fn save_and_load_round_trip() {
        let (_tmp, store) = store();
        let post = sample_post("first-post", "2026-02-10", true);
        store.save(&post).expect("save");

        let loaded = store.load("first-post").expect("load");
        assert_eq!(loaded.front, post.front);
        assert_eq!(loaded.body.trim_end(), post.body.trim_end());
    }

    #[test]
    fn load_missing_post_is_not_found() {
        let (_tmp, store) = store();
        match store.load("nope") {
            Err(ContentError::NotFound(slug)) => assert_eq!(slug, "nope"),
            other => panic!("expected NotFound, got {:?}", other.map(|p| p.slug)),
        }
    }

    #[test]
    fn list_orders_newest_first_and_hides_drafts() {
        let (_tmp, store) = store();
        store
            .save(&sample_post("older", "2026-01-01", true))
            .expect("save older");
        store
            .save(&sample_post("newer", "2026-03-01", true))
            .expect("save newer");
        store
            .save(&sample_post("draft", "2026-04-01", false))
            .expect("save draft");

        let published = store.list(false).expect("list published");
        let slugs: Vec<&str> = published.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newer", "older"]);

        let all = store.list(true).expect("list all");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].slug, "draft");
    }

    #[test]
    fn list_skips_files_without_front_matter() {
        let (tmp, store) = store();
        fs::write(tmp.path().join("broken.md"), "no front matter here").expect("write");
        store
            .save(&sample_post("good", "2026-02-01", true))
            .expect("save");

        let posts = store.list(true).expect("list");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "good");
    }

    #[test]
    fn delete_removes_the_file() {
        let (_tmp, store) = store();
        store
            .save(&sample_post("gone-soon", "2026-02-01", true))
            .expect("save");
        store.delete("gone-soon").expect("delete");
        assert!(!store.exists("gone-soon").expect("exists"));
        assert!(matches!(
            store.delete("gone-soon"),
            Err(ContentError::NotFound(_))
        ));
    }

    #[test]
    fn path_traversal_slugs_are_rejected() {
        let (_tmp, store) = store();
        assert!(matches!(
            store.load("../../etc/passwd"),
            Err(ContentError::InvalidSlug(_))
        ));
    }
}
