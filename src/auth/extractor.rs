//! Actix-web extractors for authentication and authorization.
//!
//! Header secrets are wrapped in `SecretString` as soon as they are read and
//! never logged.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError, web};
use futures_util::future::LocalBoxFuture;
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use super::AdminKey;
use super::policy::{AuthorizationVerified, CourtReportAction, CourtReportPolicy};
use crate::config::{ADMIN_KEY_HEADER, API_KEY_HEADER};
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::models::{ApiKey, CurrentUser};
use crate::services::UserDirectory;
use crate::services::api_key;

/// Read a header as a secret. Missing or non-UTF-8 headers yield `None`.
fn extract_secret_header(req: &HttpRequest, header_name: &str) -> Option<SecretString> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(|s| SecretString::from(s.to_string()))
}

/// Authentication failure, always a 401.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl AuthError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Extractor that requires an authenticated caller.
///
/// ```ignore
/// async fn handler(auth: ApiKeyAuth) -> impl Responder {
///     // auth.user is the caller
/// }
/// ```
pub struct ApiKeyAuth {
    pub user: CurrentUser,
    /// Key the caller presented; `None` for the bootstrap admin.
    key: Option<ApiKey>,
}

impl FromRequest for ApiKeyAuth {
    type Error = AuthError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let directory = req.app_data::<web::Data<dyn UserDirectory>>().cloned();
        let stored_admin_key = req.app_data::<web::Data<AdminKey>>().cloned();
        let provided_api_key = extract_secret_header(req, API_KEY_HEADER);
        let provided_admin_key = extract_secret_header(req, ADMIN_KEY_HEADER);

        Box::pin(async move {
            // Bootstrap admin key takes precedence.
            if let Some(provided) = provided_admin_key
                && let Some(stored) = stored_admin_key
                && stored.verify(provided.expose_secret())
            {
                return Ok(ApiKeyAuth {
                    user: CurrentUser::bootstrap_admin(),
                    key: None,
                });
            }

            let Some(key) = provided_api_key else {
                return Err(AuthError::new(format!(
                    "Missing API key. Provide {} header.",
                    API_KEY_HEADER
                )));
            };

            let Some(directory) = directory else {
                return Err(AuthError::new("Internal configuration error"));
            };

            match api_key::verify_key(directory.get_ref(), key.expose_secret()).await {
                Ok(owner) => Ok(ApiKeyAuth {
                    user: owner.user,
                    key: Some(owner.key),
                }),
                Err(AppError::Unauthorized(msg)) => Err(AuthError::new(msg)),
                Err(e) => {
                    warn!("API key verification failed: {}", e);
                    Err(AuthError::new("Unable to verify API key"))
                }
            }
        })
    }
}

/// Extractor giving handlers access to the court report policy.
///
/// Every call to [`Authorizer::authorize`] marks the request as checked,
/// whatever the decision. The caller's key is stamped as used only when the
/// action is permitted.
pub struct Authorizer {
    req: HttpRequest,
    policy: web::Data<dyn CourtReportPolicy>,
    directory: Option<web::Data<dyn UserDirectory>>,
}

impl Authorizer {
    /// Ask the policy whether the caller may perform `action`.
    pub async fn authorize(&self, auth: &ApiKeyAuth, action: CourtReportAction) -> AppResult<()> {
        let user = &auth.user;
        let previous = self
            .req
            .extensions_mut()
            .insert(AuthorizationVerified(action));
        if let Some(AuthorizationVerified(earlier)) = previous {
            warn!(earlier = %earlier, action = %action, "Authorization checked more than once");
        }

        if !self.policy.permits(user, action) {
            warn!(
                user_id = %user.id,
                role = %user.role,
                admin = user.is_admin(),
                action = %action,
                "Court report action denied"
            );
            return Err(AppError::Forbidden(format!(
                "Not allowed to {} court reports",
                action
            )));
        }

        if let Some(key) = &auth.key
            && let Some(directory) = &self.directory
        {
            api_key::record_use(directory.get_ref(), key).await;
        }

        Ok(())
    }
}

impl FromRequest for Authorizer {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.app_data::<web::Data<dyn CourtReportPolicy>>() {
            Some(policy) => ready(Ok(Authorizer {
                req: req.clone(),
                policy: policy.clone(),
                directory: req.app_data::<web::Data<dyn UserDirectory>>().cloned(),
            })),
            None => ready(Err(AppError::AuthorizationNotVerified(format!(
                "{} (no policy configured)",
                req.path()
            )))),
        }
    }
}
