//! Credential verification against the user directory.

use std::time::Duration;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::auth::claims::Principal;
use crate::auth::directory::{hash_password, UserDirectory, UserRecord};
use crate::error::AppError;
use crate::logging::security;

/// Upper bound on the directory lookup. On timeout the login fails closed
/// with a 503, never silently authenticating.
pub const DIRECTORY_TIMEOUT: Duration = Duration::from_secs(3);

/// Digest compared against when no account matches, so the unknown-email
/// path costs the same as a wrong password.
static DUMMY_HASH: Lazy<blake3::Hash> =
    Lazy::new(|| hash_password("gatehouse-dummy-password-for-timing"));

/// Submitted login credentials. Exists only for the duration of the request
/// and is never logged in clear.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Verify a credential pair and return the matching principal.
///
/// Unknown email, wrong password, and disabled accounts are
/// indistinguishable to the caller: all return `InvalidCredentials`.
pub async fn verify_credentials(
    directory: &dyn UserDirectory,
    credentials: &Credentials,
) -> Result<Principal, AppError> {
    verify_credentials_with_timeout(directory, credentials, DIRECTORY_TIMEOUT).await
}

pub async fn verify_credentials_with_timeout(
    directory: &dyn UserDirectory,
    credentials: &Credentials,
    timeout: Duration,
) -> Result<Principal, AppError> {
    if credentials.email.is_empty() || credentials.password.is_empty() {
        security::login_failed("empty_credentials", None);
        return Err(AppError::invalid_credentials());
    }

    let lookup = tokio::time::timeout(timeout, directory.find_by_email(&credentials.email));
    let record = match lookup.await {
        Err(_) => {
            security::login_failed("directory_timeout", Some(&credentials.email));
            return Err(AppError::directory_unavailable(
                "directory lookup timed out".to_string(),
            ));
        }
        Ok(Err(e)) => {
            security::login_failed("directory_error", Some(&credentials.email));
            return Err(AppError::directory_unavailable(e.to_string()));
        }
        Ok(Ok(record)) => record,
    };

    // blake3::Hash equality is constant-time, and the miss path compares
    // against a dummy digest so both failures take the same work.
    let submitted = hash_password(&credentials.password);
    match record {
        Some(UserRecord {
            sub,
            role,
            password_hash,
            enabled,
            ..
        }) => {
            let matches = submitted == password_hash;
            if !matches {
                security::login_failed("wrong_password", Some(&credentials.email));
                return Err(AppError::invalid_credentials());
            }
            if !enabled {
                security::login_failed("account_disabled", Some(&credentials.email));
                return Err(AppError::invalid_credentials());
            }
            Ok(Principal { sub, role })
        }
        None => {
            let _ = submitted == *DUMMY_HASH;
            security::login_failed("unknown_email", Some(&credentials.email));
            Err(AppError::invalid_credentials())
        }
    }
}
