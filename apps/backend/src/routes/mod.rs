use actix_web::web;

use crate::error::AppError;

pub mod auth;
pub mod health;
pub mod protected;

/// Configure application routes, including the auth gates wrapped around
/// protected scopes. `main.rs` adds the outer middleware (CORS, tracing,
/// structured logging) on top of this.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    health::configure_routes(cfg);

    // Auth routes: /login, /logout, /logout/all
    auth::configure_routes(cfg);

    // Gated resources: /protected, /admin
    protected::configure_routes(cfg);
}

/// JSON body handling shared by the server and tests: an unparsable body is
/// a 400 with a problem+json payload, not a default actix error page.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|_err, _req| {
        AppError::bad_request(
            "MALFORMED_BODY",
            "Request body could not be parsed".to_string(),
        )
        .into()
    })
}
