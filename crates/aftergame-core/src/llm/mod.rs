//! Upstream AI gateway abstractions for Aftergame.
//!
//! - `CompletionGateway`: RPITIT trait implemented by the HTTP adapter in
//!   aftergame-infra
//! - `map_upstream_status`: the shared translation of gateway status codes
//!   into the chat error taxonomy

pub mod gateway;

pub use gateway::{
    ByteStream, CompletionGateway, GatewayError, GatewayReply, GatewayResponse,
    map_upstream_status,
};
