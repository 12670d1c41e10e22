//! User directory abstraction.
//!
//! User records are supplied by an external directory; the service never
//! owns account storage. `UserDirectory` is the seam: production deployments
//! can back it with a remote service, while the bundled `InMemoryDirectory`
//! serves seeded records for small deployments and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use thiserror::Error;

use crate::auth::roles::Role;

/// An account record as returned by the directory.
///
/// Passwords are never stored: the record carries a blake3 digest and the
/// verifier compares digests, not plaintext.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub sub: String,
    pub email: String,
    pub password_hash: blake3::Hash,
    pub role: Role,
    pub enabled: bool,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory lookup failed: {0}")]
    Lookup(String),
}

/// External collaborator consulted at login.
///
/// Lookups are treated as bounded external calls; the verifier wraps them
/// in a timeout and fails closed when the directory does not answer.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError>;
}

/// Digest a password for storage or comparison.
pub fn hash_password(password: &str) -> blake3::Hash {
    blake3::hash(password.as_bytes())
}

/// Seed entry accepted by `InMemoryDirectory::from_seed` (and the
/// `BACKEND_USERS` environment variable, as a JSON array).
#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_role() -> Role {
    Role::User
}

fn default_enabled() -> bool {
    true
}

/// Process-local directory keyed by email.
pub struct InMemoryDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_seed(seed: Vec<SeedUser>) -> Self {
        let directory = Self::new();
        for user in seed {
            let sub = user.sub.unwrap_or_else(|| user.email.clone());
            directory.insert(UserRecord {
                sub,
                email: user.email,
                password_hash: hash_password(&user.password),
                role: user.role,
                enabled: user.enabled,
            });
        }
        directory
    }

    pub fn insert(&self, record: UserRecord) {
        self.users.write().insert(record.email.clone(), record);
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self.users.read().get(email).cloned())
    }
}
