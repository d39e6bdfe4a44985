// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use minijinja::{Environment, Value, default_auto_escape_callback};
use serde::Serialize;

pub trait TemplateEngine: Send + Sync {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error>;
}

pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);
        env.set_loader(embedded_template_loader);
        env.add_filter("format_text", crate::markup::format_text_filter);
        Self { env }
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template_name)?;
        tmpl.render(context)
    }
}

/// Template loader for minijinja that loads from embedded sources
fn embedded_template_loader(name: &str) -> Result<Option<String>, minijinja::Error> {
    let template_content = match name {
        // Error pages
        "error_404.html" => Some(include_str!("public/templates/error_404.html")),
        "error_500.html" => Some(include_str!("public/templates/error_500.html")),

        // Public pages
        "base.html" => Some(include_str!("public/templates/base.html")),
        "public/portfolio.html" => Some(include_str!("public/templates/portfolio.html")),
        "public/resume.html" => Some(include_str!("public/templates/resume.html")),
        "public/blog_index.html" => Some(include_str!("public/templates/blog_index.html")),
        "public/blog_post.html" => Some(include_str!("public/templates/blog_post.html")),

        // Login
        "login/login_page.html" => Some(include_str!("login/templates/login_page.html")),

        // Admin editor
        "admin/dashboard.html" => Some(include_str!("admin/templates/dashboard.html")),
        "admin/post_form.html" => Some(include_str!("admin/templates/post_form.html")),

        _ => None,
    };

    Ok(template_content.map(|s| s.to_string()))
}

/// Render a minijinja template with the given context
pub fn render_minijinja_template(
    engine: &dyn TemplateEngine,
    template_name: &str,
    context: Value,
) -> Result<String, minijinja::Error> {
    engine.render(template_name, context)
}

#[derive(Serialize)]
pub struct ErrorPageContext {
    pub app_name: String,
}

impl ErrorPageContext {
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        Value::from_serialize(self)
    }
}
