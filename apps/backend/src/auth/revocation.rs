//! Revocation registry: the one piece of server-side state in an otherwise
//! stateless token design.
//!
//! Logout records the presented token's `jti`; "log out everywhere" records
//! a per-subject watermark that invalidates every token issued strictly
//! before it. Reads happen on the hot path of every protected request, so
//! both maps are `DashMap`s: readers never block on the (rare) logout
//! writes.

use dashmap::DashMap;

use crate::state::security_config::DEFAULT_ACCESS_TTL_SECS;

#[derive(Debug, Clone, Copy)]
struct RevokedToken {
    /// Expiry of the revoked token; once past, expiry alone rejects it and
    /// the entry can be pruned.
    token_exp: i64,
}

pub struct RevocationRegistry {
    tokens: DashMap<String, RevokedToken>,
    subjects: DashMap<String, i64>,
    /// Longest lifetime any token could have had, bounding how long a
    /// subject watermark stays useful.
    max_ttl_secs: i64,
}

impl RevocationRegistry {
    pub fn new() -> Self {
        Self::with_max_ttl(DEFAULT_ACCESS_TTL_SECS)
    }

    pub fn with_max_ttl(max_ttl_secs: i64) -> Self {
        Self {
            tokens: DashMap::new(),
            subjects: DashMap::new(),
            max_ttl_secs,
        }
    }

    /// Revoke a single token by id.
    pub fn revoke_token(&self, jti: &str, token_exp: i64) {
        self.tokens
            .insert(jti.to_string(), RevokedToken { token_exp });
    }

    /// Revoke every token of `sub` issued strictly before `at`. A later call
    /// never moves the watermark backwards.
    pub fn revoke_subject(&self, sub: &str, at: i64) {
        self.subjects
            .entry(sub.to_string())
            .and_modify(|watermark| *watermark = (*watermark).max(at))
            .or_insert(at);
    }

    /// True if the token identified by (`jti`, `sub`, `iat`) has been
    /// revoked, either individually or by a subject watermark.
    pub fn is_revoked(&self, jti: &str, sub: &str, iat: i64) -> bool {
        if self.tokens.contains_key(jti) {
            return true;
        }
        self.subjects
            .get(sub)
            .map(|watermark| iat < *watermark)
            .unwrap_or(false)
    }

    /// Drop entries that can no longer affect any live token. Housekeeping
    /// only: correctness never depends on pruning running.
    pub fn prune(&self, now: i64) {
        self.tokens.retain(|_, entry| entry.token_exp > now);
        let max_ttl = self.max_ttl_secs;
        self.subjects
            .retain(|_, watermark| *watermark + max_ttl > now);
    }

    pub fn len(&self) -> usize {
        self.tokens.len() + self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.subjects.is_empty()
    }
}

impl Default for RevocationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::RevocationRegistry;

    #[test]
    fn revoked_jti_is_reported() {
        let registry = RevocationRegistry::new();
        registry.revoke_token("jti-1", 1_000_900);

        assert!(registry.is_revoked("jti-1", "a@b.com", 1_000_000));
        assert!(!registry.is_revoked("jti-2", "a@b.com", 1_000_000));
    }

    #[test]
    fn watermark_revokes_only_earlier_tokens() {
        let registry = RevocationRegistry::new();
        registry.revoke_subject("a@b.com", 1_000_500);

        // Issued before the watermark
        assert!(registry.is_revoked("jti-old", "a@b.com", 1_000_000));
        // Issued at or after the watermark survives, so a fresh login right
        // after "log out everywhere" works
        assert!(!registry.is_revoked("jti-same", "a@b.com", 1_000_500));
        assert!(!registry.is_revoked("jti-new", "a@b.com", 1_000_501));
        // Other subjects unaffected
        assert!(!registry.is_revoked("jti-old", "c@d.com", 1_000_000));
    }

    #[test]
    fn watermark_never_moves_backwards() {
        let registry = RevocationRegistry::new();
        registry.revoke_subject("a@b.com", 1_000_500);
        registry.revoke_subject("a@b.com", 1_000_100);

        assert!(registry.is_revoked("jti", "a@b.com", 1_000_400));
    }

    #[test]
    fn prune_drops_expired_entries() {
        let registry = RevocationRegistry::with_max_ttl(900);
        registry.revoke_token("jti-1", 1_000_900);
        registry.revoke_subject("a@b.com", 1_000_000);
        assert_eq!(registry.len(), 2);

        // Nothing prunable yet
        registry.prune(1_000_800);
        assert_eq!(registry.len(), 2);

        // Token expired; watermark older than any token it could cover
        registry.prune(1_001_000);
        assert!(registry.is_empty());
        assert!(!registry.is_revoked("jti-1", "a@b.com", 1_000_000));
    }
}
