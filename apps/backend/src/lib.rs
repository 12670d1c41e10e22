#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod trace_ctx;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use auth::claims::{Claims, Principal};
pub use auth::directory::{InMemoryDirectory, SeedUser, UserDirectory, UserRecord};
pub use auth::jwt::{mint_access_token, verify_access_token};
pub use auth::revocation::RevocationRegistry;
pub use auth::roles::Role;
pub use auth::verifier::{verify_credentials, Credentials};
pub use error::AppError;
pub use extractors::{CurrentUser, TokenClaims};
pub use middleware::{cors_middleware, RequestTrace, RequireAuth, StructuredLogger};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Prelude for test convenience
pub mod prelude {
    pub use super::auth::claims::*;
    pub use super::auth::directory::*;
    pub use super::auth::jwt::*;
    pub use super::auth::revocation::*;
    pub use super::auth::roles::*;
    pub use super::auth::verifier::*;
    pub use super::error::*;
    pub use super::extractors::*;
    pub use super::middleware::*;
    pub use super::state::app_state::*;
    pub use super::state::security_config::*;
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
