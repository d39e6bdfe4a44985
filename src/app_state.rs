// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use crate::content::PostStore;
use crate::portfolio::PortfolioData;
use crate::public::error::ErrorRenderer;
use crate::public::markdown::HtmlSanitizer;
use crate::runtime_paths::RuntimePaths;
use crate::templates::{MiniJinjaEngine, TemplateEngine};

pub struct AppState {
    pub templates: Arc<dyn TemplateEngine>,
    pub error_renderer: ErrorRenderer,
    pub html_sanitizer: HtmlSanitizer,
    pub post_store: PostStore,
    pub portfolio: PortfolioData,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(app_name: &str, runtime_paths: RuntimePaths, portfolio: PortfolioData) -> Self {
        Self {
            templates: Arc::new(MiniJinjaEngine::new()),
            error_renderer: ErrorRenderer::new(app_name.to_string()),
            html_sanitizer: HtmlSanitizer::new(),
            post_store: PostStore::new(runtime_paths.posts_dir),
            portfolio,
            http_client: reqwest::Client::new(),
        }
    }
}
