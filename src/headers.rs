// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::config::ValidatedConfig;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{
    CACHE_CONTROL, CONTENT_SECURITY_POLICY, HeaderName, HeaderValue, PRAGMA,
    X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
};
use actix_web::Error;
use futures_util::future::{Ready, ok};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

const DYNAMIC_CACHE_CONTROL: &str = "no-cache, no-store, must-revalidate";

pub struct Headers {
    config: Arc<ValidatedConfig>,
}

impl Headers {
    pub fn new(config: Arc<ValidatedConfig>) -> Self {
        Headers { config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Headers
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = HeadersMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(HeadersMiddleware {
            service: Arc::new(service),
            config: self.config.clone(),
        })
    }
}

pub struct HeadersMiddleware<S> {
    service: Arc<S>,
    config: Arc<ValidatedConfig>,
}

impl<S, B> Service<ServiceRequest> for HeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(
        &self,
        cx: &mut core::task::Context<'_>,
    ) -> core::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);
        let config = self.config.clone();

        Box::pin(async move {
            let mut res = fut.await?;

            res.headers_mut()
                .insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
            res.headers_mut()
                .insert(X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
            res.headers_mut().insert(
                HeaderName::from_static("referrer-policy"),
                HeaderValue::from_static("strict-origin-when-cross-origin"),
            );
            res.headers_mut().insert(
                HeaderName::from_static("permissions-policy"),
                HeaderValue::from_static(
                    "accelerometer=(), camera=(), geolocation=(), gyroscope=(), magnetometer=(), microphone=(), payment=(), usb=(), xr-spatial-tracking=()",
                ),
            );
            res.headers_mut().insert(
                CONTENT_SECURITY_POLICY,
                HeaderValue::from_static(
                    "default-src 'self'; img-src 'self' data:; style-src 'self' 'unsafe-inline'; object-src 'none'; frame-ancestors 'self'; base-uri 'self'; form-action 'self';",
                ),
            );

            // Admin and login pages must never be cached by intermediaries.
            let path = res.request().path();
            if path_in_scope(path, &config.admin.path) || path_in_scope(path, "/login") {
                res.headers_mut().insert(
                    CACHE_CONTROL,
                    HeaderValue::from_static(DYNAMIC_CACHE_CONTROL),
                );
                res.headers_mut()
                    .insert(PRAGMA, HeaderValue::from_static("no-cache"));
            }

            Ok(res)
        })
    }
}

/// Segment-aware prefix check: `/admin` covers `/admin` and `/admin/...`,
/// never siblings like `/administrator`.
fn path_in_scope(path: &str, scope: &str) -> bool {
    match path.strip_prefix(scope) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
