// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use actix_web::web;

pub mod error;
pub mod handlers;
pub mod markdown;

pub use markdown::HtmlSanitizer;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::portfolio))
        .route("/resume", web::get().to(handlers::resume))
        .route("/blog", web::get().to(handlers::blog_index))
        .route("/blog/post/{slug}", web::get().to(handlers::blog_post));
}
