// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::app_state::AppState;
use crate::config::ValidatedConfig;
use crate::login::session::is_authorized_moderator;
use crate::public::error::{serve_404, serve_500};
use crate::public::markdown::render_markdown;
use actix_web::{HttpRequest, HttpResponse, Result, web};
use minijinja::context;
use serde::Deserialize;

pub async fn portfolio(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
) -> Result<HttpResponse> {
    let context = context! {
        app_name => config.app.name.clone(),
        admin_path => config.admin.path.clone(),
        intro => app_state.portfolio.intro.clone(),
        skills => app_state.portfolio.skills.clone(),
        projects => app_state.portfolio.projects.clone(),
        is_moderator => is_authorized_moderator(&req, &config),
    };

    render_page(&app_state, "public/portfolio.html", context)
}

pub async fn resume(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
) -> Result<HttpResponse> {
    let context = context! {
        app_name => config.app.name.clone(),
        admin_path => config.admin.path.clone(),
        intro => app_state.portfolio.intro.clone(),
        skills => app_state.portfolio.skills.clone(),
        projects => app_state.portfolio.projects.clone(),
        is_moderator => is_authorized_moderator(&req, &config),
    };

    render_page(&app_state, "public/resume.html", context)
}

#[derive(Deserialize)]
pub struct BlogIndexQuery {
    #[serde(default)]
    page: Option<usize>,
}

pub async fn blog_index(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    query: web::Query<BlogIndexQuery>,
) -> Result<HttpResponse> {
    let posts = match app_state.post_store.list(false) {
        Ok(posts) => posts,
        Err(err) => {
            log::error!("Failed to list posts: {}", err);
            return serve_500(
                &app_state.error_renderer,
                Some(app_state.templates.as_ref()),
            );
        }
    };

    let per_page = config.rendering.posts_per_page;
    let page = query.page.unwrap_or(1).max(1);
    let total_pages = posts.len().div_ceil(per_page).max(1);
    let page = page.min(total_pages);
    let start = (page - 1) * per_page;
    let page_posts: Vec<_> = posts
        .iter()
        .skip(start)
        .take(per_page)
        .map(|post| {
            context! {
                slug => post.slug.clone(),
                title => post.front.title.clone(),
                date => post.front.date.to_string(),
                tags => post.front.tags.clone(),
            }
        })
        .collect();

    let context = context! {
        app_name => config.app.name.clone(),
        admin_path => config.admin.path.clone(),
        posts => page_posts,
        page => page,
        total_pages => total_pages,
        has_prev => page > 1,
        has_next => page < total_pages,
        is_moderator => is_authorized_moderator(&req, &config),
    };

    render_page(&app_state, "public/blog_index.html", context)
}

pub async fn blog_post(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let slug = path.into_inner();
    let is_moderator = is_authorized_moderator(&req, &config);

    let post = match app_state.post_store.load(&slug) {
        Ok(post) => post,
        Err(crate::content::ContentError::NotFound(_))
        | Err(crate::content::ContentError::InvalidSlug(_)) => {
            return serve_404(
                &app_state.error_renderer,
                Some(app_state.templates.as_ref()),
            );
        }
        Err(err) => {
            log::error!("Failed to load post '{}': {}", slug, err);
            return serve_500(
                &app_state.error_renderer,
                Some(app_state.templates.as_ref()),
            );
        }
    };

    // Drafts stay invisible to everyone but the moderator.
    if !post.front.published && !is_moderator {
        return serve_404(
            &app_state.error_renderer,
            Some(app_state.templates.as_ref()),
        );
    }

    let body_html = match render_markdown(&post.body, &app_state.html_sanitizer) {
        Ok(html) => html,
        Err(err) => {
            log::error!("Failed to render post '{}': {}", slug, err);
            return serve_500(
                &app_state.error_renderer,
                Some(app_state.templates.as_ref()),
            );
        }
    };

    let context = context! {
        app_name => config.app.name.clone(),
        admin_path => config.admin.path.clone(),
        slug => post.slug.clone(),
        title => post.front.title.clone(),
        date => post.front.date.to_string(),
        tags => post.front.tags.clone(),
        published => post.front.published,
        body_html => minijinja::Value::from_safe_string(body_html),
        is_moderator => is_moderator,
    };

    render_page(&app_state, "public/blog_post.html", context)
}

pub async fn not_found(app_state: web::Data<AppState>) -> Result<HttpResponse> {
    serve_404(
        &app_state.error_renderer,
        Some(app_state.templates.as_ref()),
    )
}

fn render_page(
    app_state: &AppState,
    template_name: &str,
    context: minijinja::Value,
) -> Result<HttpResponse> {
    match app_state.templates.render(template_name, context) {
        Ok(html) => Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html)),
        Err(err) => {
            log::error!("Failed to render template '{}': {}", template_name, err);
            serve_500(
                &app_state.error_renderer,
                Some(app_state.templates.as_ref()),
            )
        }
    }
}
