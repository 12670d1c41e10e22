use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::http::header;
use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use crate::auth::jwt::mint_access_token;
use crate::auth::verifier::{verify_credentials, Credentials};
use crate::error::AppError;
use crate::extractors::TokenClaims;
use crate::logging::security;
use crate::middleware::RequireAuth;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Verify submitted credentials and issue an access token.
///
/// The token travels both as the `Authorization: Bearer <token>` response
/// header and in the JSON body.
async fn login(
    credentials: web::Json<Credentials>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let principal = verify_credentials(app_state.directory.as_ref(), &credentials).await?;

    let token = mint_access_token(&principal, SystemTime::now(), &app_state.security)?;

    Ok(HttpResponse::Ok()
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .json(LoginResponse { token }))
}

/// Revoke the presented token by id. The token stays cryptographically
/// valid until expiry; the revocation registry is what gives logout an
/// observable effect.
async fn logout(
    claims: TokenClaims,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let claims = claims.0;
    app_state.revocations.revoke_token(&claims.jti, claims.exp);
    security::token_revoked("token", &claims.sub);

    Ok(HttpResponse::NoContent().finish())
}

/// "Log out everywhere": set a subject-wide watermark revoking every token
/// issued before now, including the one presented.
async fn logout_all(
    claims: TokenClaims,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let claims = claims.0;
    let now = unix_now()?;
    // The presented token is revoked by id as well; its iat may equal the
    // watermark, which the strict comparison would let through.
    app_state.revocations.revoke_token(&claims.jti, claims.exp);
    app_state.revocations.revoke_subject(&claims.sub, now);
    security::token_revoked("subject", &claims.sub);

    Ok(HttpResponse::NoContent().finish())
}

/// Login accepts POST only; reads are refused before any verification.
async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::method_not_allowed())
}

fn unix_now() -> Result<i64, AppError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|_| AppError::internal("failed to get current time".to_string()))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/login")
            .route(web::post().to(login))
            .route(web::route().to(method_not_allowed)),
    );
    cfg.service(
        web::scope("/logout")
            .wrap(RequireAuth::new())
            .service(
                web::resource("/all")
                    .route(web::post().to(logout_all))
                    .route(web::route().to(method_not_allowed)),
            )
            .service(
                web::resource("")
                    .route(web::post().to(logout))
                    .route(web::route().to(method_not_allowed)),
            ),
    );
}
