use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use crate::auth::roles::Role;
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::middleware::RequireAuth;

#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    pub sub: String,
    pub role: Role,
    pub message: &'static str,
}

/// Protected resource; any valid, non-revoked token may read it.
async fn protected(auth: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(ResourceResponse {
        sub: auth.sub,
        role: auth.role,
        message: "protected resource",
    }))
}

/// Admin-only resource; the gate enforces the role before this runs.
async fn admin(auth: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(ResourceResponse {
        sub: auth.sub,
        role: auth.role,
        message: "admin resource",
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/protected")
            .wrap(RequireAuth::new())
            .service(web::resource("").route(web::get().to(protected))),
    );
    cfg.service(
        web::scope("/admin")
            .wrap(RequireAuth::role(Role::Admin))
            .service(web::resource("").route(web::get().to(admin))),
    );
}
