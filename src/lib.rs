//! llm-relay: a single HTTP relay across interchangeable LLM backends
//!
//! Accepts a normalized chat/completion request, forwards it to exactly one
//! configured backend (selected by static priority), and returns a
//! normalized text response. When nothing is configured, a deterministic
//! mock responder answers so the endpoint never hard-fails on missing
//! configuration.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod messages;
pub mod providers;
pub mod router;
pub mod server;

// Re-exports for convenience
pub use error::{AdapterError, RelayError, Result};
