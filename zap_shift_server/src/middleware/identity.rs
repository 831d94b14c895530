//! Bearer credential middleware for the Zap Shift server.
//! This middleware can be placed on any route or scope.
//!
//! It reads the `Authorization: Bearer <token>` header, asks the configured [`IdentityVerifier`] who the token belongs
//! to, and stores the resulting [`VerifiedIdentity`] in the request extensions, where handlers pick it up as an
//! extractor. Requests without a valid credential are answered with a 401 before the handler runs.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error,
    HttpMessage,
};
use futures::{
    future::{ok, Ready},
    Future,
};
use log::*;

use crate::{
    auth::{bearer_token, IdentityVerifier, VerifiedIdentity},
    errors::ServerError,
};

pub struct IdentityMiddlewareFactory<V> {
    verifier: Rc<V>,
}

impl<V> IdentityMiddlewareFactory<V> {
    pub fn new(verifier: V) -> Self {
        Self { verifier: Rc::new(verifier) }
    }
}

impl<S, B, V> Transform<S, ServiceRequest> for IdentityMiddlewareFactory<V>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    V: IdentityVerifier + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = IdentityMiddlewareService<S, V>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(IdentityMiddlewareService { verifier: Rc::clone(&self.verifier), service: Rc::new(service) })
    }
}

pub struct IdentityMiddlewareService<S, V> {
    verifier: Rc<V>,
    service: Rc<S>,
}

impl<S, B, V> Service<ServiceRequest> for IdentityMiddlewareService<S, V>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    V: IdentityVerifier + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let verifier = Rc::clone(&self.verifier);
        Box::pin(async move {
            let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()).map(str::to_string);
            let verified = match bearer_token(header.as_deref()) {
                Ok(token) => verifier.verify_token(token).await,
                Err(e) => Err(e),
            };
            match verified {
                Ok(identity) => {
                    trace!("🔐️ Request to {} authenticated as {}", req.path(), identity.email);
                    req.extensions_mut().insert::<VerifiedIdentity>(identity);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                },
                Err(e) => {
                    debug!("🔐️ Refusing request to {}. {e}", req.path());
                    let err = ServerError::AuthenticationError(e);
                    Ok(req.error_response(err).map_into_right_body())
                },
            }
        })
    }
}
