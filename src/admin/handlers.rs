// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::app_state::AppState;
use crate::config::ValidatedConfig;
use crate::content::{ContentError, FrontMatter, Post, slugify, validate_slug};
use crate::public::error::{serve_404, serve_500};
use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, Result, web};
use chrono::NaiveDate;
use minijinja::context;
use serde::Deserialize;

pub async fn dashboard(
    app_state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
) -> Result<HttpResponse> {
    let posts = match app_state.post_store.list(true) {
        Ok(posts) => posts,
        Err(err) => {
            log::error!("Failed to list posts for dashboard: {}", err);
            return serve_500(
                &app_state.error_renderer,
                Some(app_state.templates.as_ref()),
            );
        }
    };

    let post_rows: Vec<_> = posts
        .iter()
        .map(|post| {
            context! {
                slug => post.slug.clone(),
                title => post.front.title.clone(),
                date => post.front.date.to_string(),
                published => post.front.published,
            }
        })
        .collect();

    let context = context! {
        app_name => config.app.name.clone(),
        admin_path => config.admin.path.clone(),
        is_moderator => true,
        posts => post_rows,
    };

    render_admin_page(&app_state, "admin/dashboard.html", context)
}

pub async fn post_create_form(
    app_state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
) -> Result<HttpResponse> {
    let context = context! {
        app_name => config.app.name.clone(),
        admin_path => config.admin.path.clone(),
        is_moderator => true,
        is_new => true,
        slug => "",
        title => "",
        date => chrono::Utc::now().date_naive().to_string(),
        tags => "",
        published => false,
        body => "",
        error_message => minijinja::Value::from(()),
    };

    render_admin_page(&app_state, "admin/post_form.html", context)
}

pub async fn post_edit_form(
    app_state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let slug = path.into_inner();
    let post = match app_state.post_store.load(&slug) {
        Ok(post) => post,
        Err(ContentError::NotFound(_)) | Err(ContentError::InvalidSlug(_)) => {
            return serve_404(
                &app_state.error_renderer,
                Some(app_state.templates.as_ref()),
            );
        }
        Err(err) => {
            log::error!("Failed to load post '{}' for editing: {}", slug, err);
            return serve_500(
                &app_state.error_renderer,
                Some(app_state.templates.as_ref()),
            );
        }
    };

    let context = context! {
        app_name => config.app.name.clone(),
        admin_path => config.admin.path.clone(),
        is_moderator => true,
        is_new => false,
        slug => post.slug.clone(),
        title => post.front.title.clone(),
        date => post.front.date.to_string(),
        tags => post.front.tags.join(", "),
        published => post.front.published,
        body => post.body.clone(),
        error_message => minijinja::Value::from(()),
    };

    render_admin_page(&app_state, "admin/post_form.html", context)
}

#[derive(Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub slug: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub tags: String,
    // HTML checkboxes submit a value only when checked.
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub body: String,
}

pub async fn post_save(
    app_state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    form: web::Form<PostForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();

    let slug = if form.slug.trim().is_empty() {
        match slugify(&form.title) {
            Some(slug) => slug,
            None => {
                return form_error(&app_state, &config, &form, "Title produces an empty slug.");
            }
        }
    } else {
        form.slug.trim().to_string()
    };
    if validate_slug(&slug).is_err() {
        return form_error(
            &app_state,
            &config,
            &form,
            "Slug may only contain lowercase letters, digits and single hyphens.",
        );
    }

    let date = match form.date.parse::<NaiveDate>() {
        Ok(date) => date,
        Err(_) => {
            return form_error(&app_state, &config, &form, "Date must be YYYY-MM-DD.");
        }
    };

    let tags: Vec<String> = form
        .tags
        .split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();

    let post = Post {
        slug: slug.clone(),
        front: FrontMatter {
            title: form.title.trim().to_string(),
            date,
            tags,
            published: form.published.is_some(),
        },
        body: form.body,
    };

    if post.front.title.is_empty() {
        return form_error(&app_state, &config, &post_to_form(&post), "Title is required.");
    }

    if let Err(err) = app_state.post_store.save(&post) {
        log::error!("Failed to save post '{}': {}", slug, err);
        return serve_500(
            &app_state.error_renderer,
            Some(app_state.templates.as_ref()),
        );
    }

    log::info!("Saved post '{}'", slug);
    Ok(HttpResponse::Found()
        .insert_header((LOCATION, config.admin.path.clone()))
        .finish())
}

#[derive(Deserialize)]
pub struct DeleteForm {
    pub slug: String,
}

pub async fn post_delete(
    app_state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    form: web::Form<DeleteForm>,
) -> Result<HttpResponse> {
    match app_state.post_store.delete(&form.slug) {
        Ok(()) => {
            log::info!("Deleted post '{}'", form.slug);
        }
        Err(ContentError::NotFound(_)) | Err(ContentError::InvalidSlug(_)) => {
            return serve_404(
                &app_state.error_renderer,
                Some(app_state.templates.as_ref()),
            );
        }
        Err(err) => {
            log::error!("Failed to delete post '{}': {}", form.slug, err);
            return serve_500(
                &app_state.error_renderer,
                Some(app_state.templates.as_ref()),
            );
        }
    }

    Ok(HttpResponse::Found()
        .insert_header((LOCATION, config.admin.path.clone()))
        .finish())
}

fn post_to_form(post: &Post) -> PostForm {
    PostForm {
        slug: post.slug.clone(),
        title: post.front.title.clone(),
        date: post.front.date.to_string(),
        tags: post.front.tags.join(", "),
        published: post.front.published.then(|| "on".to_string()),
        body: post.body.clone(),
    }
}

/// Re-render the form with the submitted values and a validation message.
fn form_error(
    app_state: &AppState,
    config: &ValidatedConfig,
    form: &PostForm,
    message: &str,
) -> Result<HttpResponse> {
    let context = context! {
        app_name => config.app.name.clone(),
        admin_path => config.admin.path.clone(),
        is_moderator => true,
        is_new => form.slug.trim().is_empty(),
        slug => form.slug.clone(),
        title => form.title.clone(),
        date => form.date.clone(),
        tags => form.tags.clone(),
        published => form.published.is_some(),
        body => form.body.clone(),
        error_message => message,
    };

    match app_state.templates.render("admin/post_form.html", context) {
        Ok(html) => Ok(HttpResponse::UnprocessableEntity()
            .content_type("text/html; charset=utf-8")
            .body(html)),
        Err(err) => {
            log::error!("Failed to render post form: {}", err);
            serve_500(
                &app_state.error_renderer,
                Some(app_state.templates.as_ref()),
            )
        }
    }
}

fn render_admin_page(
    app_state: &AppState,
    template_name: &str,
    context: minijinja::Value,
) -> Result<HttpResponse> {
    match app_state.templates.render(template_name, context) {
        Ok(html) => Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
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
