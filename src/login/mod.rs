// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::app_state::AppState;
use crate::config::ValidatedConfig;
use crate::public::error::serve_500;
use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, Result, web};
use minijinja::context;
use serde::Deserialize;
use std::sync::Arc;

pub mod google;
pub mod session;

pub fn configure(cfg: &mut web::ServiceConfig, _config: &Arc<ValidatedConfig>) {
    cfg.service(
        web::scope("/login")
            .route("", web::get().to(login_page))
            .route("/google", web::get().to(google_redirect))
            .route("/google/callback", web::get().to(google_callback))
            .route("/logout", web::post().to(logout)),
    );
}

#[derive(Deserialize)]
pub struct LoginPageQuery {
    #[serde(default)]
    error: Option<String>,
}

fn error_message(code: &str) -> &'static str {
    match code {
        "no_code" => "Google did not return an authorization code. Please try again.",
        "invalid_token" => "The sign-in could not be verified. Please try again.",
        "auth_failed" => "Google sign-in failed. Please try again.",
        "unauthorized" => "This account is not allowed to manage this site.",
        _ => "Sign-in failed. Please try again.",
    }
}

async fn login_page(
    app_state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    query: web::Query<LoginPageQuery>,
) -> Result<HttpResponse> {
    let context = context! {
        app_name => config.app.name.clone(),
        error_message => query.error.as_deref().map(error_message),
        google_url => "/login/google",
    };

    match app_state.templates.render("login/login_page.html", context) {
        Ok(html) => Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
            .body(html)),
        Err(err) => {
            log::error!("Failed to render login page: {}", err);
            serve_500(
                &app_state.error_renderer,
                Some(app_state.templates.as_ref()),
            )
        }
    }
}

async fn google_redirect(config: web::Data<ValidatedConfig>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, google::authorization_url(&config)))
        .finish()
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

async fn google_callback(
    app_state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    query: web::Query<CallbackQuery>,
) -> HttpResponse {
    if let Some(provider_error) = &query.error {
        log::warn!("Google callback returned an error: {}", provider_error);
        return login_error_redirect("no_code");
    }
    let code = match &query.code {
        Some(code) if !code.is_empty() => code,
        _ => return login_error_redirect("no_code"),
    };

    let tokens = match google::exchange_code(&app_state.http_client, &config, code).await {
        Ok(tokens) => tokens,
        Err(err) => {
            log::warn!("OAuth code exchange failed: {}", err);
            return login_error_redirect("invalid_token");
        }
    };

    let userinfo =
        match google::fetch_userinfo(&app_state.http_client, &config, &tokens.access_token).await {
            Ok(userinfo) => userinfo,
            Err(err) => {
                log::warn!("OAuth userinfo lookup failed: {}", err);
                return login_error_redirect("auth_failed");
            }
        };

    if userinfo.email != config.auth.moderator_email {
        log::warn!("Rejected sign-in for non-moderator account");
        return login_error_redirect("unauthorized");
    }

    let token = session::issue_token();
    let (auth_cookie, email_cookie) =
        session::build_session_cookies(&token, &userinfo.email, &config);

    log::info!("Moderator signed in: {}", userinfo.email);
    HttpResponse::Found()
        .insert_header((LOCATION, config.admin.path.clone()))
        .cookie(auth_cookie)
        .cookie(email_cookie)
        .finish()
}

async fn logout() -> HttpResponse {
    let (auth_cookie, email_cookie) = session::clear_session_cookies();
    HttpResponse::Found()
        .insert_header((LOCATION, "/"))
        .cookie(auth_cookie)
        .cookie(email_cookie)
        .finish()
}

fn login_error_redirect(code: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, format!("/login?error={}", code)))
        .finish()
}
