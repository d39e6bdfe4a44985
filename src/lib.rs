// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod admin;
pub mod app_state;
pub mod bootstrap;
pub mod config;
pub mod content;
pub mod headers;
pub mod login;
pub mod markup;
pub mod portfolio;
pub mod public;
pub mod runtime_paths;
pub mod templates;

use crate::app_state::AppState;
use crate::config::ValidatedConfig;
use actix_web::web;
use std::sync::Arc;

/// Register routes and shared state on an actix `App`.
/// Used by the server factory in `main` and by the integration tests.
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
    config: Arc<ValidatedConfig>,
    app_state: Arc<AppState>,
) {
    let admin_path = config.admin.path.clone();
    let config_for_admin = config.clone();
    let config_for_login = config.clone();

    cfg.app_data(web::Data::from(config))
        .app_data(web::Data::from(app_state));
    admin::configure(cfg, &admin_path, &config_for_admin);
    login::configure(cfg, &config_for_login);
    public::configure(cfg);
    cfg.default_service(web::route().to(public::handlers::not_found));
}
