use std::sync::Arc;

use crate::auth::directory::UserDirectory;
use crate::auth::revocation::RevocationRegistry;

use super::security_config::SecurityConfig;

/// Application state containing shared resources.
///
/// Everything here is read-only after startup except the revocation
/// registry, which supports concurrent readers and writers internally.
#[derive(Clone)]
pub struct AppState {
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// User directory consulted at login (external collaborator)
    pub directory: Arc<dyn UserDirectory>,
    /// Revocation registry consulted on every protected request
    pub revocations: Arc<RevocationRegistry>,
}

impl AppState {
    pub fn new(
        security: SecurityConfig,
        directory: Arc<dyn UserDirectory>,
        revocations: Arc<RevocationRegistry>,
    ) -> Self {
        Self {
            security,
            directory,
            revocations,
        }
    }
}
