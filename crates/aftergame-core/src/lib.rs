//! Business logic and repository trait definitions for Aftergame.
//!
//! This crate defines the "ports" (repository, gateway and transport traits)
//! that the infrastructure layer implements, plus the chat pipeline itself:
//! request validation, the relay, the stream decoder, the turn runner and
//! the sentiment scorer. It depends only on `aftergame-types` -- never on
//! `aftergame-infra` or any database/IO crate.

pub mod auth;
pub mod chat;
pub mod event;
pub mod llm;
pub mod repository;
pub mod sentiment;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;
