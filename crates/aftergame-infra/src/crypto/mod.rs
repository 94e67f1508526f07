//! Credential primitives.
//!
//! - `password`: argon2id hashing behind the core `PasswordHasher` trait
//! - `token`: random bearer tokens and their SHA-256 lookup digests

pub mod password;
pub mod token;
