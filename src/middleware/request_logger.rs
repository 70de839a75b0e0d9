//! Request logging middleware.

use std::future::{Ready, ready};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use futures_util::future::LocalBoxFuture;
use tracing::{info, warn};

use crate::config::{ADMIN_KEY_HEADER, API_KEY_HEADER};

/// Characters of the API key shown in logs.
const LOGGED_KEY_CHARS: usize = 8;

/// Describe the credential on a request without revealing it.
fn credential_label(req: &ServiceRequest) -> String {
    if req.headers().contains_key(ADMIN_KEY_HEADER) {
        return "admin-key".to_string();
    }

    match req.headers().get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        Some(k) if k.chars().count() > LOGGED_KEY_CHARS => {
            format!("{}...", k.chars().take(LOGGED_KEY_CHARS).collect::<String>())
        }
        Some(_) => "malformed".to_string(),
        None => "none".to_string(),
    }
}

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let remote_addr = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();
        let credential = credential_label(&req);

        info!(
            target: "api",
            method = %method,
            path = %path,
            query = %req.query_string(),
            remote_addr = %remote_addr,
            credential = %credential,
            "Request started"
        );

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let status = res.status();
            let duration_ms = start.elapsed().as_millis();

            if status.is_success() || status.is_redirection() {
                info!(
                    target: "api",
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    duration_ms = %duration_ms,
                    "Request completed"
                );
            } else {
                warn!(
                    target: "api",
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    duration_ms = %duration_ms,
                    server_error = status.is_server_error(),
                    "Request failed"
                );
            }

            Ok(res)
        })
    }
}
