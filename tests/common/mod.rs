// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::App;
use folio::app_state::AppState;
use folio::bootstrap::bootstrap_runtime;
use folio::config::ValidatedConfig;
use folio::content::{FrontMatter, Post};
use folio::headers;
use folio::login::session::{AUTH_COOKIE_NAME, EMAIL_COOKIE_NAME};
use folio::portfolio::PortfolioData;
use folio::runtime_paths::RuntimePaths;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

pub const MODERATOR_EMAIL: &str = "owner@example.com";

pub struct TestHarness {
    pub root: TempDir,
    pub config: Arc<ValidatedConfig>,
    pub runtime_paths: RuntimePaths,
    pub app_state: Arc<AppState>,
}

impl TestHarness {
    pub fn new() -> Self {
        let root = TempDir::new().expect("tempdir");
        fs::write(root.path().join("config.yaml"), test_config_yaml()).expect("config file");

        let bootstrap = bootstrap_runtime(root.path()).expect("bootstrap");
        let config = Arc::new(bootstrap.validated_config);
        let runtime_paths = bootstrap.runtime_paths;

        let portfolio = PortfolioData::load(&runtime_paths.data_dir).expect("portfolio data");
        let app_state = Arc::new(AppState::new(
            &config.app.name,
            runtime_paths.clone(),
            portfolio,
        ));

        Self {
            root,
            config,
            runtime_paths,
            app_state,
        }
    }

    /// Cookies that pass the moderator gate.
    pub fn moderator_cookies(
        &self,
    ) -> (
        actix_web::cookie::Cookie<'static>,
        actix_web::cookie::Cookie<'static>,
    ) {
        (
            actix_web::cookie::Cookie::new(AUTH_COOKIE_NAME, "test-session-token"),
            actix_web::cookie::Cookie::new(EMAIL_COOKIE_NAME, MODERATOR_EMAIL.to_string()),
        )
    }

    pub fn seed_post(&self, slug: &str, title: &str, date: &str, published: bool) {
        let post = Post {
            slug: slug.to_string(),
            front: FrontMatter {
                title: title.to_string(),
                date: date.parse().expect("date"),
                tags: vec!["test".to_string()],
                published,
            },
            body: format!("Body of *{}*.", title),
        };
        self.app_state.post_store.save(&post).expect("seed post");
    }
}

pub fn build_test_app(
    harness: &TestHarness,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let config = harness.config.clone();
    let config_for_headers = harness.config.clone();
    let app_state = harness.app_state.clone();

    App::new()
        .wrap(headers::Headers::new(config_for_headers))
        .configure(move |cfg| folio::configure_app(cfg, config, app_state))
}

fn test_config_yaml() -> String {
    format!(
        r#"server:
  host: "127.0.0.1"
  port: 8080
  workers: 1

app:
  name: "Test Folio"
  description: "Integration test instance"

auth:
  google_client_id: "test-client"
  google_client_secret: "test-secret"
  redirect_uri: "http://127.0.0.1:8080/login/google/callback"
  moderator_email: "{}"
"#,
        MODERATOR_EMAIL
    )
}
