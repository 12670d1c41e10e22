use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use backend::auth::directory::{InMemoryDirectory, SeedUser};
use backend::auth::revocation::RevocationRegistry;
use backend::auth::roles::Role;
use backend::routes;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes())
}

/// State with a seeded directory:
/// - a@b.com / "p"   (user)
/// - root@b.com / "p" (admin)
/// - gone@b.com / "p" (disabled)
pub fn seeded_state(security: SecurityConfig) -> AppState {
    let directory = InMemoryDirectory::from_seed(vec![
        SeedUser {
            email: "a@b.com".to_string(),
            password: "p".to_string(),
            sub: None,
            role: Role::User,
            enabled: true,
        },
        SeedUser {
            email: "root@b.com".to_string(),
            password: "p".to_string(),
            sub: None,
            role: Role::Admin,
            enabled: true,
        },
        SeedUser {
            email: "gone@b.com".to_string(),
            password: "p".to_string(),
            sub: None,
            role: Role::User,
            enabled: false,
        },
    ]);

    AppState::new(
        security,
        Arc::new(directory),
        Arc::new(RevocationRegistry::new()),
    )
}

/// Build the app with the production route tree (gates included) but
/// without the outer CORS/logging middleware.
pub async fn init_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(routes::json_config())
            .configure(routes::configure),
    )
    .await
}
