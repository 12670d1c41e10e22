use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::auth::claims::Claims;
use crate::error::AppError;

/// Full verified claims of the presented token, as stored in request
/// extensions by the request gate. Logout uses this to learn the token's
/// `jti` and expiry.
#[derive(Debug, Clone)]
pub struct TokenClaims(pub Claims);

impl FromRequest for TokenClaims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();

        ready(
            claims
                .map(TokenClaims)
                .ok_or_else(AppError::unauthorized_missing_bearer),
        )
    }
}
