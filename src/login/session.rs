// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::config::ValidatedConfig;
use actix_web::HttpRequest;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use uuid::Uuid;

pub const AUTH_COOKIE_NAME: &str = "auth_token";
pub const EMAIL_COOKIE_NAME: &str = "user_email";

/// Opaque session credential. The gate only ever checks for its presence
/// alongside the allow-listed email; nothing is stored server-side.
pub fn issue_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

pub fn build_session_cookies(
    token: &str,
    email: &str,
    config: &ValidatedConfig,
) -> (Cookie<'static>, Cookie<'static>) {
    let max_age = Duration::days(config.auth.session_days);
    let secure = config.cookies_secure();

    let auth_cookie = Cookie::build(AUTH_COOKIE_NAME, token.to_string())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .finish();

    // Readable by page scripts so the UI can show who is signed in.
    let email_cookie = Cookie::build(EMAIL_COOKIE_NAME, email.to_string())
        .path("/")
        .http_only(false)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .finish();

    (auth_cookie, email_cookie)
}

pub fn clear_session_cookies() -> (Cookie<'static>, Cookie<'static>) {
    let auth_cookie = Cookie::build(AUTH_COOKIE_NAME, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .finish();
    let email_cookie = Cookie::build(EMAIL_COOKIE_NAME, "")
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .finish();
    (auth_cookie, email_cookie)
}

/// The session gate: both cookies present and the email matches the
/// single-entry allow-list.
pub fn is_authorized_moderator(req: &HttpRequest, config: &ValidatedConfig) -> bool {
    let token = match req.cookie(AUTH_COOKIE_NAME) {
        Some(cookie) => cookie.value().to_string(),
        None => return false,
    };
    if token.is_empty() {
        return false;
    }

    let email = match req.cookie(EMAIL_COOKIE_NAME) {
        Some(cookie) => cookie.value().to_string(),
        None => return false,
    };

    email == config.auth.moderator_email
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use actix_web::test::TestRequest;

    #[test]
    fn issued_tokens_are_unique() {
        let a = issue_token();
        let b = issue_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn session_cookies_carry_expiry_and_flags() {
        let config = test_config();
        let (auth, email) = build_session_cookies("tok", "owner@example.com", &config);

        assert_eq!(auth.name(), AUTH_COOKIE_NAME);
        assert_eq!(auth.max_age(), Some(Duration::days(7)));
        assert_eq!(auth.http_only(), Some(true));
        assert_eq!(auth.same_site(), Some(SameSite::Lax));
        assert_eq!(auth.path(), Some("/"));

        assert_eq!(email.name(), EMAIL_COOKIE_NAME);
        assert_eq!(email.value(), "owner@example.com");
        assert_ne!(email.http_only(), Some(true));
    }

    #[test]
    fn https_redirect_uri_makes_cookies_secure() {
        let mut config = test_config();
        config.auth.redirect_uri = "https://example.com/login/google/callback".to_string();
        let (auth, email) = build_session_cookies("tok", "owner@example.com", &config);
        assert_eq!(auth.secure(), Some(true));
        assert_eq!(email.secure(), Some(true));
    }

    #[test]
    fn gate_requires_both_cookies() {
        let config = test_config();

        let none = TestRequest::get().to_http_request();
        assert!(!is_authorized_moderator(&none, &config));

        let token_only = TestRequest::get()
            .cookie(Cookie::new(AUTH_COOKIE_NAME, "tok"))
            .to_http_request();
        assert!(!is_authorized_moderator(&token_only, &config));

        let email_only = TestRequest::get()
            .cookie(Cookie::new(EMAIL_COOKIE_NAME, "owner@example.com"))
            .to_http_request();
        assert!(!is_authorized_moderator(&email_only, &config));
    }

    #[test]
    fn gate_rejects_other_emails() {
        let config = test_config();
        let req = TestRequest::get()
            .cookie(Cookie::new(AUTH_COOKIE_NAME, "tok"))
            .cookie(Cookie::new(EMAIL_COOKIE_NAME, "intruder@example.com"))
            .to_http_request();
        assert!(!is_authorized_moderator(&req, &config));
    }

    #[test]
    fn gate_accepts_the_moderator() {
        let config = test_config();
        let req = TestRequest::get()
            .cookie(Cookie::new(AUTH_COOKIE_NAME, "tok"))
            .cookie(Cookie::new(EMAIL_COOKIE_NAME, "owner@example.com"))
            .to_http_request();
        assert!(is_authorized_moderator(&req, &config));
    }

    #[test]
    fn gate_rejects_empty_token() {
        let config = test_config();
        let req = TestRequest::get()
            .cookie(Cookie::new(AUTH_COOKIE_NAME, ""))
            .cookie(Cookie::new(EMAIL_COOKIE_NAME, "owner@example.com"))
            .to_http_request();
        assert!(!is_authorized_moderator(&req, &config));
    }
}
