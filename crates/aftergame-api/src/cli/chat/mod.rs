//! Interactive CLI chat with the coach.
//!
//! Streams replies from a running relay, renders deltas as they arrive and
//! persists each completed turn through the REST API. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod loop_runner;
pub mod renderer;
