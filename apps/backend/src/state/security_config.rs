use jsonwebtoken::Algorithm;

/// Default access-token lifetime: 15 minutes.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;

/// Configuration for JWT security settings.
///
/// There is deliberately no `Default` implementation: the signing key must
/// always be supplied explicitly (in production it comes from
/// `BACKEND_JWT_SECRET`, and a missing value is startup-fatal).
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// JWT secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm; fixed server-side, never taken from the token
    pub algorithm: Algorithm,
    /// Access-token lifetime in seconds
    pub access_ttl_secs: i64,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret and HS256.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
        }
    }

    pub fn with_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.access_ttl_secs = ttl_secs;
        self
    }
}
