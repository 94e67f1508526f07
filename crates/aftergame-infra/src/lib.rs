//! Infrastructure layer for Aftergame.
//!
//! Contains implementations of the ports defined in `aftergame-core`:
//! SQLite storage, the HTTP clients for the completion gateway and the chat
//! relay, configuration loading, and credential primitives (argon2 password
//! hashing, SHA-256 token digests).

pub mod config;
pub mod crypto;
pub mod http;
pub mod sqlite;
