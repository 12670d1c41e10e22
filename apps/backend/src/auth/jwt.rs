//! Access-token issuance and verification.
//!
//! Tokens are compact HS256 JWS. The signing algorithm is pinned in
//! `SecurityConfig` and the token's own `alg` header is checked against it
//! before any signature verification, so an attacker-supplied algorithm
//! (including `"none"`) can never select the verification path.

use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, Principal};
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Mint a signed access token for `principal`, valid from `now` until
/// `now + access_ttl`.
///
/// Issuance is pure given (principal, now, key): no state is recorded for
/// the new token. `nbf` is computed from `now`, never a constant, and `jti`
/// is a fresh UUID v4.
pub fn mint_access_token(
    principal: &Principal,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("failed to get current time".to_string()))?
        .as_secs() as i64;

    let claims = Claims {
        sub: principal.sub.clone(),
        role: principal.role,
        iat,
        nbf: iat,
        exp: iat + security.access_ttl_secs,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("failed to encode JWT: {e}")))
}

/// Verify a bearer token and return its claims.
///
/// Checks, in order: encoding (→ `UnauthorizedMalformedToken`), algorithm
/// header against the pinned server algorithm (→
/// `UnauthorizedAlgorithmRejected`, before any signature work), then
/// signature and temporal claims via `jsonwebtoken` with zero leeway
/// (→ `UnauthorizedBadSignature` / `UnauthorizedExpiredToken` /
/// `UnauthorizedNotYetValid`).
///
/// Revocation is the gate's concern and is checked after this returns.
pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    let alg = token_algorithm(token)?;
    match Algorithm::from_str(&alg) {
        Ok(parsed) if parsed == security.algorithm => {}
        // Unknown names ("none" included) and known-but-different
        // algorithms are both downgrade attempts.
        _ => return Err(AppError::unauthorized_algorithm_rejected()),
    }

    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::unauthorized_expired_token()
        }
        jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
            AppError::unauthorized_not_yet_valid()
        }
        jsonwebtoken::errors::ErrorKind::InvalidSignature => {
            AppError::unauthorized_bad_signature()
        }
        jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => {
            AppError::unauthorized_algorithm_rejected()
        }
        _ => AppError::unauthorized_malformed_token(),
    })
}

/// Read the `alg` field out of the (unverified) token header.
fn token_algorithm(token: &str) -> Result<String, AppError> {
    let header_b64 = token
        .split('.')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(AppError::unauthorized_malformed_token)?;

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_b64)
        .map_err(|_| AppError::unauthorized_malformed_token())?;

    let header: serde_json::Value = serde_json::from_slice(&header_bytes)
        .map_err(|_| AppError::unauthorized_malformed_token())?;

    header
        .get("alg")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .ok_or_else(AppError::unauthorized_malformed_token)
}
