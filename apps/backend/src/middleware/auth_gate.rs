//! Request gate for protected routes.
//!
//! Extracts the bearer token from the `Authorization` header, verifies its
//! signature and temporal claims, consults the revocation registry, and
//! (optionally) enforces a required role. On success the verified `Claims`
//! and derived `Principal` are stored in request extensions for handlers
//! and extractors; on failure the request terminates immediately with a
//! classified `AppError`.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::jwt::verify_access_token;
use crate::auth::roles::Role;
use crate::error::AppError;
use crate::logging::security;
use crate::state::app_state::AppState;

pub struct RequireAuth {
    required_role: Option<Role>,
}

impl RequireAuth {
    /// Gate that accepts any valid, non-revoked token.
    pub fn new() -> Self {
        Self {
            required_role: None,
        }
    }

    /// Gate that additionally requires `role` (or a superset of it).
    pub fn role(role: Role) -> Self {
        Self {
            required_role: Some(role),
        }
    }
}

impl Default for RequireAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware {
            service,
            required_role: self.required_role,
        }))
    }
}

pub struct RequireAuthMiddleware<S> {
    service: S,
    required_role: Option<Role>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
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
        let token = match extract_bearer(req.headers().get(header::AUTHORIZATION)) {
            Ok(token) => token,
            Err(err) => {
                security::token_rejected("missing_or_malformed_bearer");
                return Box::pin(async move { Err(err.into()) });
            }
        };

        let app_state = match req.app_data::<web::Data<AppState>>().cloned() {
            Some(state) => state,
            None => {
                return Box::pin(async {
                    Err(AppError::internal("AppState not available".to_string()).into())
                });
            }
        };

        let claims = match verify_access_token(&token, &app_state.security) {
            Ok(claims) => claims,
            Err(err) => {
                security::token_rejected(&err.to_string());
                return Box::pin(async move { Err(err.into()) });
            }
        };

        if app_state
            .revocations
            .is_revoked(&claims.jti, &claims.sub, claims.iat)
        {
            security::token_rejected("revoked");
            return Box::pin(async {
                Err(AppError::unauthorized_revoked_token().into())
            });
        }

        if let Some(required) = self.required_role {
            if !claims.role.satisfies(required) {
                return Box::pin(async { Err(AppError::forbidden().into()) });
            }
        }

        // Store the verified identity BEFORE calling the service
        req.extensions_mut().insert(claims.principal());
        req.extensions_mut().insert(claims);

        let fut = self.service.call(req);
        Box::pin(fut)
    }
}

/// Parse `Authorization: Bearer <token>` exactly. Any other scheme, shape,
/// or absence is an authentication failure, never a crash.
fn extract_bearer(header_value: Option<&header::HeaderValue>) -> Result<String, AppError> {
    let auth_value = header_value.ok_or_else(AppError::unauthorized_missing_bearer)?;

    let auth_str = auth_value
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;

    let parts: Vec<&str> = auth_str.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(AppError::unauthorized_missing_bearer());
    }

    let token = parts[1];
    if token.is_empty() {
        return Err(AppError::unauthorized_missing_bearer());
    }

    Ok(token.to_string())
}
