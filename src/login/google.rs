// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::config::ValidatedConfig;
use serde::Deserialize;
use std::error::Error;
use std::fmt;

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const OAUTH_SCOPES: &str =
    "https://www.googleapis.com/auth/userinfo.profile https://www.googleapis.com/auth/userinfo.email";

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserInfo {
    pub email: String,
    #[serde(default)]
    pub verified_email: bool,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug)]
pub enum OAuthError {
    Http(reqwest::Error),
    Provider { status: u16, body: String },
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OAuthError::Http(err) => write!(f, "OAuth request failed: {}", err),
            OAuthError::Provider { status, body } => {
                write!(f, "OAuth provider returned {}: {}", status, body)
            }
        }
    }
}

impl Error for OAuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            OAuthError::Http(err) => Some(err),
            OAuthError::Provider { .. } => None,
        }
    }
}

impl From<reqwest::Error> for OAuthError {
    fn from(err: reqwest::Error) -> Self {
        OAuthError::Http(err)
    }
}

/// Build the Google consent screen URL the login page sends the browser to.
pub fn authorization_url(config: &ValidatedConfig) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
        AUTHORIZATION_ENDPOINT,
        urlencoding::encode(&config.auth.google_client_id),
        urlencoding::encode(&config.auth.redirect_uri),
        urlencoding::encode(OAUTH_SCOPES),
    )
}

/// Exchange the authorization code for tokens at the token endpoint.
pub async fn exchange_code(
    client: &reqwest::Client,
    config: &ValidatedConfig,
    code: &str,
) -> Result<TokenResponse, OAuthError> {
    let params = [
        ("code", code),
        ("client_id", config.auth.google_client_id.as_str()),
        ("client_secret", config.auth.google_client_secret.as_str()),
        ("redirect_uri", config.auth.redirect_uri.as_str()),
        ("grant_type", "authorization_code"),
    ];

    let response = client
        .post(&config.auth.token_endpoint)
        .form(&params)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(OAuthError::Provider { status, body });
    }

    Ok(response.json::<TokenResponse>().await?)
}

/// Look up the account behind an access token.
pub async fn fetch_userinfo(
    client: &reqwest::Client,
    config: &ValidatedConfig,
    access_token: &str,
) -> Result<UserInfo, OAuthError> {
    let response = client
        .get(&config.auth.userinfo_endpoint)
        .bearer_auth(access_token)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(OAuthError::Provider { status, body });
    }

    Ok(response.json::<UserInfo>().await?)
}
