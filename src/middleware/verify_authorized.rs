//! Middleware that fails any handled request whose handler skipped authorization.

use std::future::{Ready, ready};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;
use tracing::error;

use crate::auth::AuthorizationVerified;
use crate::error::AppError;

/// Replaces the response with a 500 when a matched route returns without
/// having called `Authorizer::authorize`.
///
/// Responses produced before any handler could run (401, 405, 413) are left
/// alone.
pub struct VerifyAuthorized;

impl<S, B> Transform<S, ServiceRequest> for VerifyAuthorized
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = VerifyAuthorizedMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(VerifyAuthorizedMiddleware { service }))
    }
}

pub struct VerifyAuthorizedMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for VerifyAuthorizedMiddleware<S>
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
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;

            let verified = res.request().extensions().contains::<AuthorizationVerified>();
            let matched = res.request().match_pattern().is_some();
            let rejected_early = matches!(
                res.status(),
                StatusCode::UNAUTHORIZED
                    | StatusCode::METHOD_NOT_ALLOWED
                    | StatusCode::PAYLOAD_TOO_LARGE
            );
            if verified || !matched || rejected_early {
                return Ok(res.map_into_left_body());
            }

            let path = res.request().path().to_string();
            error!(
                method = %res.request().method(),
                path = %path,
                status = res.status().as_u16(),
                "Handler completed without an authorization check"
            );

            let (req, _) = res.into_parts();
            let response = AppError::AuthorizationNotVerified(path)
                .error_response()
                .map_into_right_body();
            Ok(ServiceResponse::new(req, response))
        })
    }
}
