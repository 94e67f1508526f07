//! Password and token primitives.
//!
//! Defined in aftergame-core so the account service can hash passwords and
//! mint tokens without coupling to a specific algorithm. The argon2 and
//! SHA-256 adapters live in aftergame-infra.

use aftergame_types::error::AccountError;

/// One-way password hashing with verification.
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash (salt and parameters included).
    fn hash_password(&self, password: &str) -> Result<String, AccountError>;

    /// Whether `password` matches `hash`. Malformed hashes never match.
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}

/// Generation and digesting of opaque bearer tokens.
pub trait TokenIssuer: Send + Sync {
    /// A fresh random plaintext token.
    fn generate(&self) -> String;

    /// Stable digest used as the lookup key for a plaintext token.
    fn digest(&self, token: &str) -> String;
}
