//! Claims carried inside backend-issued access tokens.

use serde::{Deserialize, Serialize};

use crate::auth::roles::Role;

/// Claims included in our backend-issued access tokens.
///
/// Timestamps are unix seconds. `jti` is a fresh UUID v4 per token so that
/// individual tokens can be revoked by id.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject identifier (the account's email in the default directory)
    pub sub: String,
    pub role: Role,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Not-before; always equal to `iat` at issuance
    pub nbf: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Token identifier, unique per issued token
    pub jti: String,
}

impl Claims {
    /// Principal reconstructed from verified claims.
    pub fn principal(&self) -> Principal {
        Principal {
            sub: self.sub.clone(),
            role: self.role,
        }
    }
}

/// Identity of an authenticated caller, derived from the user directory at
/// login and from verified claims on protected requests.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Principal {
    pub sub: String,
    pub role: Role,
}
