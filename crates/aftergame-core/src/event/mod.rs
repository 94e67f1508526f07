//! Change feed for live updates.
//!
//! Provides a `ChangeFeed` that distributes `ChangeEvent` messages to
//! filtered subscribers via a `tokio::sync::broadcast` channel.

pub mod feed;

pub use feed::{ChangeFeed, Subscription};
