//! The AI coaching chat pipeline.
//!
//! Server side: `validate` and `relay` turn an inbound request into an
//! authenticated pass-through of the gateway's event stream.
//! Client side: `decoder`, `transcript` and `turn` consume that stream,
//! assemble the assistant's reply and hand the finished turn to persistence.

pub mod decoder;
pub mod prompt;
pub mod relay;
pub mod transcript;
pub mod transport;
pub mod turn;
pub mod validate;
