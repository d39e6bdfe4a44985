// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::config::ValidatedConfig;
use crate::login::session::is_authorized_moderator;
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::LOCATION,
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::sync::Arc;

/// Middleware guarding the admin scope. Requests without a valid moderator
/// session are redirected to the login page.
pub struct ModeratorGate {
    config: Arc<ValidatedConfig>,
}

impl ModeratorGate {
    pub fn new(config: Arc<ValidatedConfig>) -> Self {
        Self { config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ModeratorGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ModeratorGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ModeratorGateService {
            service,
            config: self.config.clone(),
        }))
    }
}

pub struct ModeratorGateService<S> {
    service: S,
    config: Arc<ValidatedConfig>,
}

impl<S, B> Service<ServiceRequest> for ModeratorGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !is_authorized_moderator(req.request(), &self.config) {
            let (req, _) = req.into_parts();

            let response = HttpResponse::Found()
                .insert_header((LOCATION, "/login"))
                .finish()
                .map_into_right_body();

            return Box::pin(async move { Ok(ServiceResponse::new(req, response)) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
