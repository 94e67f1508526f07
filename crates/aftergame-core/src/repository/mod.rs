//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (aftergame-infra) implements. The core crate never depends on any
//! specific storage technology. All of them use native async fn in traits
//! (RPITIT, Rust 2024 edition).

pub mod account;
pub mod career;
pub mod conversation;
pub mod journal;
pub mod profile;
pub mod story;
