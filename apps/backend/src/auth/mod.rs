pub mod claims;
pub mod directory;
pub mod jwt;
pub mod revocation;
pub mod roles;
pub mod verifier;
