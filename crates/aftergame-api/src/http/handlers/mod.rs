//! HTTP request handlers for the REST API and the chat relay.

pub mod auth;
pub mod career;
pub mod changes;
pub mod chat;
pub mod conversation;
pub mod dashboard;
pub mod journal;
pub mod profile;
pub mod story;
