//! Security-relevant audit events.
//!
//! These carry the internal rejection classification that is deliberately
//! withheld from HTTP responses.

use tracing::{info, warn};

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// A login attempt was rejected.
pub fn login_failed(reason: &str, email: Option<&str>) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %email.map(Redacted).unwrap_or(Redacted("")),
        reason,
        "Authentication failure"
    );
}

/// A bearer token presented to the request gate was rejected.
pub fn token_rejected(reason: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        reason,
        "Token rejected"
    );
}

/// A logout revoked one token or a whole subject.
pub fn token_revoked(scope: &str, sub: &str) {
    let trace_id = trace_ctx::trace_id();

    info!(
        event = "SECURITY_TOKEN_REVOKED",
        %trace_id,
        scope,
        sub = %Redacted(sub),
        "Token revoked"
    );
}
