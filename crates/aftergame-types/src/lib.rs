//! Shared domain types for Aftergame.
//!
//! This crate contains the domain types used across the Aftergame platform:
//! chat messages and conversation records, accounts and request identity,
//! journal entries, career explorations, success stories, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod career;
pub mod chat;
pub mod config;
pub mod conversation;
pub mod error;
pub mod event;
pub mod identity;
pub mod journal;
pub mod llm;
pub mod profile;
pub mod story;
