use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Classified application errors.
///
/// The classification is internal: every 401 variant renders the same
/// generic response body so that clients cannot distinguish why a token or
/// a credential pair was rejected. The precise variant is logged with the
/// request's trace_id instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Bad request: {detail}")]
    BadRequest { code: &'static str, detail: String },
    #[error("Unauthorized: missing bearer")]
    UnauthorizedMissingBearer,
    #[error("Unauthorized: malformed token")]
    UnauthorizedMalformedToken,
    #[error("Unauthorized: bad signature")]
    UnauthorizedBadSignature,
    #[error("Unauthorized: algorithm rejected")]
    UnauthorizedAlgorithmRejected,
    #[error("Unauthorized: token not yet valid")]
    UnauthorizedNotYetValid,
    #[error("Unauthorized: token expired")]
    UnauthorizedExpiredToken,
    #[error("Unauthorized: token revoked")]
    UnauthorizedRevokedToken,
    #[error("Forbidden")]
    Forbidden,
    #[error("Directory unavailable: {detail}")]
    DirectoryUnavailable { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    /// Internal error code, for logs only.
    fn log_code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::BadRequest { code, .. } => code,
            AppError::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            AppError::UnauthorizedMalformedToken => "UNAUTHORIZED_MALFORMED_TOKEN",
            AppError::UnauthorizedBadSignature => "UNAUTHORIZED_BAD_SIGNATURE",
            AppError::UnauthorizedAlgorithmRejected => "UNAUTHORIZED_ALGORITHM_REJECTED",
            AppError::UnauthorizedNotYetValid => "UNAUTHORIZED_NOT_YET_VALID",
            AppError::UnauthorizedExpiredToken => "UNAUTHORIZED_EXPIRED_TOKEN",
            AppError::UnauthorizedRevokedToken => "UNAUTHORIZED_REVOKED_TOKEN",
            AppError::Forbidden => "FORBIDDEN",
            AppError::DirectoryUnavailable { .. } => "DIRECTORY_UNAVAILABLE",
            AppError::Internal { .. } => "INTERNAL",
            AppError::Config { .. } => "CONFIG_ERROR",
        }
    }

    /// Error code exposed in the response body. All authentication failures
    /// collapse to `UNAUTHORIZED` so the body never leaks the rejection
    /// reason.
    fn public_code(&self) -> &'static str {
        match self.status() {
            StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
            _ => self.log_code(),
        }
    }

    /// Client-visible detail. Generic for everything security-sensitive.
    fn public_detail(&self) -> String {
        match self {
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::Forbidden => "Access denied".to_string(),
            AppError::DirectoryUnavailable { .. } => {
                "Service temporarily unavailable".to_string()
            }
            AppError::Internal { .. } | AppError::Config { .. } => {
                "Internal server error".to_string()
            }
            // InvalidCredentials and every token rejection
            _ => "Authentication required".to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::UnauthorizedMissingBearer
            | AppError::UnauthorizedMalformedToken
            | AppError::UnauthorizedBadSignature
            | AppError::UnauthorizedAlgorithmRejected
            | AppError::UnauthorizedNotYetValid
            | AppError::UnauthorizedExpiredToken
            | AppError::UnauthorizedRevokedToken => StatusCode::UNAUTHORIZED,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::DirectoryUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } | AppError::Config { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn method_not_allowed() -> Self {
        Self::MethodNotAllowed
    }

    pub fn bad_request(code: &'static str, detail: String) -> Self {
        Self::BadRequest { code, detail }
    }

    pub fn unauthorized_missing_bearer() -> Self {
        Self::UnauthorizedMissingBearer
    }

    pub fn unauthorized_malformed_token() -> Self {
        Self::UnauthorizedMalformedToken
    }

    pub fn unauthorized_bad_signature() -> Self {
        Self::UnauthorizedBadSignature
    }

    pub fn unauthorized_algorithm_rejected() -> Self {
        Self::UnauthorizedAlgorithmRejected
    }

    pub fn unauthorized_not_yet_valid() -> Self {
        Self::UnauthorizedNotYetValid
    }

    pub fn unauthorized_expired_token() -> Self {
        Self::UnauthorizedExpiredToken
    }

    pub fn unauthorized_revoked_token() -> Self {
        Self::UnauthorizedRevokedToken
    }

    pub fn forbidden() -> Self {
        Self::Forbidden
    }

    pub fn directory_unavailable(detail: String) -> Self {
        Self::DirectoryUnavailable { detail }
    }

    pub fn internal(detail: String) -> Self {
        Self::Internal { detail }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::config(format!("env var error: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.public_code();
        let trace_id = trace_ctx::trace_id();

        // The classified reason goes to the log, never to the client.
        warn!(
            code = self.log_code(),
            http.status_code = status.as_u16(),
            %trace_id,
            "request rejected"
        );

        let problem_details = ProblemDetails {
            type_: format!("https://gatehouse.dev/errors/{code}"),
            title: Self::humanize_code(code),
            status: status.as_u16(),
            detail: self.public_detail(),
            code: code.to_string(),
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}
