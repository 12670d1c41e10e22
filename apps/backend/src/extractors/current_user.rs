use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;

use crate::auth::claims::Principal;
use crate::auth::roles::Role;
use crate::error::AppError;

/// The authenticated caller, read from the `Principal` the request gate
/// stored in request extensions. Only resolvable behind `RequireAuth`.
#[derive(Debug, Serialize, Clone)]
pub struct CurrentUser {
    pub sub: String,
    pub role: Role,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let principal = req.extensions().get::<Principal>().cloned();

        ready(
            principal
                .map(|p| CurrentUser {
                    sub: p.sub,
                    role: p.role,
                })
                .ok_or_else(AppError::unauthorized_missing_bearer),
        )
    }
}
