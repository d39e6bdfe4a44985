// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::config::ValidatedConfig;
use actix_web::web;
use std::sync::Arc;

pub mod handlers;
pub mod middleware;

pub use middleware::ModeratorGate;

pub fn configure(cfg: &mut web::ServiceConfig, admin_path: &str, config: &Arc<ValidatedConfig>) {
    cfg.service(
        web::scope(admin_path)
            .wrap(ModeratorGate::new(config.clone()))
            .route("", web::get().to(handlers::dashboard))
            .route("/post/create", web::get().to(handlers::post_create_form))
            .route("/post/edit/{slug}", web::get().to(handlers::post_edit_form))
            .route("/post/save", web::post().to(handlers::post_save))
            .route("/post/delete", web::post().to(handlers::post_delete)),
    );
}
